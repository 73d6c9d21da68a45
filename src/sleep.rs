//! Sleep assessment assembly

use std::collections::BTreeSet;

use crate::error::ParseError;
use crate::labels::{resolve_label, LabelTable, SLEEP_LEVEL};
use crate::pools::MessagePools;
use crate::schema::MessageKind;
use crate::types::{SleepLevelSample, SleepScores, SleepSession};

pub fn assemble(pools: &MessagePools) -> Result<SleepSession, ParseError> {
    assemble_with(pools, &SLEEP_LEVEL)
}

/// Build the sleep session resolving level codes through `levels`
pub fn assemble_with(pools: &MessagePools, levels: &LabelTable) -> Result<SleepSession, ParseError> {
    let assessment = match pools.sleep_assessments.as_slice() {
        [assessment] => assessment,
        [] => {
            return Err(ParseError::NotFound {
                kind: MessageKind::SleepAssessment,
            })
        }
        many => {
            return Err(ParseError::expected_one(
                MessageKind::SleepAssessment,
                many.len(),
            ))
        }
    };

    if pools.sleep_levels.is_empty() {
        return Err(ParseError::NotFound {
            kind: MessageKind::SleepLevel,
        });
    }

    let samples: Vec<SleepLevelSample> = pools
        .sleep_levels
        .iter()
        .filter_map(|level| {
            Some(SleepLevelSample {
                timestamp: level.timestamp,
                level: resolve_label(level.sleep_level.as_ref()?, levels),
            })
        })
        .collect();

    let dates: BTreeSet<_> = samples.iter().map(|s| s.timestamp.date_naive()).collect();

    Ok(SleepSession {
        dates: dates.into_iter().collect(),
        scores: SleepScores {
            combined_awake_score: assessment.combined_awake_score,
            awake_time_score: assessment.awake_time_score,
            awakenings_count_score: assessment.awakenings_count_score,
            deep_sleep_score: assessment.deep_sleep_score,
            sleep_duration_score: assessment.sleep_duration_score,
            light_sleep_score: assessment.light_sleep_score,
            overall_sleep_score: assessment.overall_sleep_score,
            sleep_quality_score: assessment.sleep_quality_score,
            sleep_recovery_score: assessment.sleep_recovery_score,
            rem_sleep_score: assessment.rem_sleep_score,
            sleep_restlessness_score: assessment.sleep_restlessness_score,
            awakenings_count: assessment.awakenings_count,
            interruptions_score: assessment.interruptions_score,
            average_stress_during_sleep: assessment.average_stress_during_sleep,
        },
        levels: samples,
    })
}
