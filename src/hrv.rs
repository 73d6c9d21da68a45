//! HRV status assembly

use crate::error::ParseError;
use crate::labels::{resolve_label, LabelTable, HRV_STATUS};
use crate::pools::MessagePools;
use crate::schema::MessageKind;
use crate::types::{HrvSample, HrvSession};

/// Build the HRV session using the standard status table
pub fn assemble(pools: &MessagePools) -> Result<HrvSession, ParseError> {
    assemble_with(pools, &HRV_STATUS)
}

/// Build the HRV session resolving status codes through `statuses`
pub fn assemble_with(pools: &MessagePools, statuses: &LabelTable) -> Result<HrvSession, ParseError> {
    let summary = match pools.hrv_summaries.as_slice() {
        [summary] => summary,
        [] => {
            return Err(ParseError::NotFound {
                kind: MessageKind::HrvStatusSummary,
            })
        }
        many => {
            return Err(ParseError::expected_one(
                MessageKind::HrvStatusSummary,
                many.len(),
            ))
        }
    };

    if pools.hrv_values.is_empty() {
        return Err(ParseError::NotFound {
            kind: MessageKind::HrvValue,
        });
    }

    Ok(HrvSession {
        timestamp: summary.timestamp,
        weekly_average: summary.weekly_average,
        last_night_average: summary.last_night_average,
        last_night_5_min_high: summary.last_night_5_min_high,
        baseline_low_upper: summary.baseline_low_upper,
        baseline_balanced_lower: summary.baseline_balanced_lower,
        baseline_balanced_upper: summary.baseline_balanced_upper,
        status: resolve_label(&summary.status, statuses),
        values: pools
            .hrv_values
            .iter()
            .filter_map(|v| {
                Some(HrvSample {
                    timestamp: v.timestamp,
                    value: v.value?,
                })
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoopDiagnostics;
    use crate::pools::ParseTarget;
    use crate::schema::MessageRecord;
    use crate::testing::at;

    fn summary(status: i64) -> MessageRecord {
        MessageRecord::new("hrv_status_summary")
            .with("timestamp", at(6, 30, 0))
            .with("weekly_average", 47.0)
            .with("last_night_average", 52.0)
            .with("last_night_5_min_high", 81.0)
            .with("baseline_low_upper", 38.0)
            .with("baseline_balanced_lower", 42.0)
            .with("baseline_balanced_upper", 58.0)
            .with("status", status)
    }

    fn value(minute: u32, value: Option<f64>) -> MessageRecord {
        MessageRecord::new("hrv_value")
            .with("timestamp", at(1, minute, 0))
            .with("value", value)
    }

    fn pools(messages: &[MessageRecord]) -> MessagePools {
        MessagePools::collect(messages, ParseTarget::Hrv, &NoopDiagnostics).unwrap()
    }

    #[test]
    fn test_assemble_drops_null_values() {
        let messages = vec![
            summary(4),
            value(0, Some(48.0)),
            value(5, None),
            value(10, Some(55.0)),
        ];
        let session = assemble(&pools(&messages)).unwrap();
        assert_eq!(session.status, "balanced");
        assert_eq!(session.last_night_average, 52.0);
        let values: Vec<f64> = session.values.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![48.0, 55.0]);
    }

    #[test]
    fn test_status_resolved_through_given_table() {
        let messages = vec![summary(2), value(0, Some(48.0))];
        let only_none = LabelTable(&[(0, "none")]);
        let session = assemble_with(&pools(&messages), &only_none).unwrap();
        assert_eq!(session.status, "none");
    }

    #[test]
    fn test_summary_count() {
        assert_eq!(
            assemble(&pools(&[value(0, Some(40.0))])),
            Err(ParseError::NotFound {
                kind: MessageKind::HrvStatusSummary
            })
        );

        let err = assemble(&pools(&[summary(1), summary(1), value(0, Some(40.0))])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected 'hrv_status_summary' data: expected one message per file but got 2 messages"
        );
    }

    #[test]
    fn test_values_required() {
        assert_eq!(
            assemble(&pools(&[summary(3)])),
            Err(ParseError::NotFound {
                kind: MessageKind::HrvValue
            })
        );
    }
}
