//! Monitoring day aggregation
//!
//! Monitoring files hold one `monitoring_info` anchoring the day plus many
//! samples. Samples logged at exactly local midnight are daily logs: they
//! carry the cumulative totals of the previous day. Intraday samples carry
//! only a second offset (`timestamp_16`) from the start of the day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};

use crate::config::ParseOptions;
use crate::error::ParseError;
use crate::pools::MessagePools;
use crate::schema::{MessageKind, MonitoringMessage};
use crate::types::*;

/// Wall-clock time of `timestamp` at `offset`
pub fn local_time(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveDateTime {
    timestamp.with_timezone(&offset).naive_local()
}

/// True when `timestamp` falls on local midnight, to the second
pub fn is_daily_log(timestamp: DateTime<Utc>, offset: FixedOffset) -> bool {
    let local = local_time(timestamp, offset);
    local.hour() == 0 && local.minute() == 0 && local.second() == 0
}

/// Local day a sample describes; daily logs belong to the day before
pub fn monitoring_day(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    let day = local_time(timestamp, offset).date();
    if is_daily_log(timestamp, offset) {
        day.pred_opt().unwrap_or(day)
    } else {
        day
    }
}

/// `day` at midnight plus `offset_secs`
pub fn relative_time(day: NaiveDate, offset_secs: i64) -> Option<NaiveDateTime> {
    day.and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_seconds(offset_secs)?)
}

/// Build the monitoring day from validated monitoring pools
pub fn aggregate(
    pools: &MessagePools,
    options: &ParseOptions,
) -> Result<MonitoringSession, ParseError> {
    let info = match pools.monitoring_infos.as_slice() {
        [info] => info,
        [] => {
            return Err(ParseError::NotFound {
                kind: MessageKind::MonitoringInfo,
            })
        }
        many => return Err(ParseError::expected_one(MessageKind::MonitoringInfo, many.len())),
    };

    let offset = options.utc_offset;
    let day = local_time(info.timestamp, offset).date();
    let samples: Vec<MonitoringSample> = pools
        .monitorings
        .iter()
        .map(|m| sample(m, offset))
        .collect();

    let steps = step_totals(&samples);

    let active = samples
        .iter()
        .filter(|s| s.daily_log)
        .map(sample_calories)
        .sum::<i64>();
    let metabolic = info.resting_metabolic_rate.unwrap_or(0);

    let heart_rates = samples
        .iter()
        .filter_map(|s| {
            let bpm = s.heart_rate?;
            let local_time = relative_time(day, s.offset_secs?)?;
            Some(HeartRateSample { local_time, bpm })
        })
        .collect();

    let intensities: Vec<IntensitySample> = samples
        .iter()
        .filter(|s| s.moderate_activity_minutes.is_some() || s.vigorous_activity_minutes.is_some())
        .filter_map(|s| {
            Some(IntensitySample {
                local_time: relative_time(day, s.offset_secs?)?,
                moderate: s.moderate_activity_minutes.unwrap_or(0),
                vigorous: s.vigorous_activity_minutes.unwrap_or(0),
            })
        })
        .collect();
    let intensity_minutes = IntensityMinutes {
        moderate: intensities.iter().map(|i| i.moderate).sum(),
        vigorous: intensities.iter().map(|i| i.vigorous).sum(),
    };

    let resting_heart_rate = pools
        .hr_data
        .iter()
        .find(|hr| is_daily_log(hr.timestamp, offset))
        .map(|hr| hr.resting_heart_rate);

    Ok(MonitoringSession {
        timestamp: info.timestamp,
        day,
        activities: info.activity_type.clone(),
        resting_metabolic_rate: info.resting_metabolic_rate,
        samples,
        steps,
        heart_rates,
        resting_heart_rate,
        intensities,
        intensity_minutes,
        calories: CalorieTotals {
            metabolic,
            active,
            total: metabolic + active,
        },
        respiration_rates: pools
            .respiration_rates
            .iter()
            .map(|r| RespirationSample {
                timestamp: r.timestamp,
                breaths_per_minute: r.respiration_rate,
            })
            .collect(),
        stress_levels: pools
            .stress_levels
            .iter()
            .map(|s| StressSample {
                timestamp: s.stress_level_time,
                value: s.stress_level_value,
            })
            .collect(),
    })
}

fn sample(message: &MonitoringMessage, offset: FixedOffset) -> MonitoringSample {
    MonitoringSample {
        timestamp: message.timestamp,
        day: message.timestamp.map(|ts| monitoring_day(ts, offset)),
        daily_log: message.timestamp.is_some_and(|ts| is_daily_log(ts, offset)),
        offset_secs: message.timestamp_16,
        steps: message.steps,
        distance: message.distance,
        cycles: message.cycles,
        strokes: message.strokes,
        calories: message.calories,
        active_calories: message.active_calories,
        active_time: message.active_time,
        activity_type: message.activity_type.clone(),
        activity_subtype: message.activity_subtype.clone(),
        activity_level: message.activity_level.clone(),
        heart_rate: message.heart_rate,
        intensity: message.intensity,
        duration_min: message.duration_min,
        duration: message.duration,
        ascent: message.ascent,
        descent: message.descent,
        moderate_activity_minutes: message.moderate_activity_minutes,
        vigorous_activity_minutes: message.vigorous_activity_minutes,
    }
}

fn sample_calories(sample: &MonitoringSample) -> i64 {
    sample.active_calories.or(sample.calories).unwrap_or(0)
}

/// Daily logs with zero steps carry no totals and are skipped
fn step_totals(samples: &[MonitoringSample]) -> Option<StepTotals> {
    let daily: Vec<&MonitoringSample> = samples
        .iter()
        .filter(|s| s.daily_log && s.steps.is_some_and(|n| n != 0))
        .collect();
    let first = daily.first()?;

    Some(StepTotals {
        day: first.day,
        steps: daily.iter().filter_map(|s| s.steps).sum(),
        distance: daily.iter().filter_map(|s| s.distance).sum(),
        calories: daily.iter().map(|s| sample_calories(s)).sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoopDiagnostics;
    use crate::pools::ParseTarget;
    use crate::schema::{FieldValue, MessageRecord};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn utc(d: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn plus_two() -> ParseOptions {
        ParseOptions::new(FixedOffset::east_opt(2 * 3600).unwrap())
    }

    fn pools(messages: &[MessageRecord]) -> MessagePools {
        MessagePools::collect(messages, ParseTarget::Monitoring, &NoopDiagnostics).unwrap()
    }

    #[test]
    fn test_daily_log_is_local_midnight() {
        let utc0 = FixedOffset::east_opt(0).unwrap();
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();

        assert!(is_daily_log(utc(5, 0, 0, 0), utc0));
        assert!(!is_daily_log(utc(5, 0, 0, 1), utc0));
        assert!(!is_daily_log(utc(5, 0, 0, 0), cest));
        assert!(is_daily_log(utc(4, 22, 0, 0), cest));
    }

    #[test]
    fn test_monitoring_day_correction() {
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        // local midnight of the 5th describes the 4th
        assert_eq!(monitoring_day(utc(4, 22, 0, 0), cest), date(4));
        assert_eq!(monitoring_day(utc(4, 22, 15, 0), cest), date(5));
        assert_eq!(monitoring_day(utc(4, 21, 59, 0), cest), date(4));
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(
            relative_time(date(4), 3_661),
            date(4).and_hms_opt(1, 1, 1)
        );
        assert_eq!(relative_time(date(4), i64::MAX), None);
    }

    #[test]
    fn test_requires_exactly_one_info() {
        let options = ParseOptions::default();
        assert_eq!(
            aggregate(&MessagePools::default(), &options),
            Err(ParseError::NotFound {
                kind: MessageKind::MonitoringInfo
            })
        );

        let info = MessageRecord::new("monitoring_info").with("timestamp", utc(4, 6, 0, 0));
        let err = aggregate(&pools(&[info.clone(), info]), &options).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedCount {
                kind: MessageKind::MonitoringInfo,
                ..
            }
        ));
    }

    #[test]
    fn test_aggregate_day() {
        let messages = vec![
            MessageRecord::new("monitoring_info")
                .with("timestamp", utc(4, 6, 0, 0))
                .with("resting_metabolic_rate", 1650)
                .with("activity_type", vec!["walking", "running"]),
            // daily log at local midnight of the 5th
            MessageRecord::new("monitoring")
                .with("timestamp", utc(4, 22, 0, 0))
                .with("steps", 8000)
                .with("distance", 6100.5)
                .with("active_calories", 420)
                .with("calories", 2100),
            MessageRecord::new("monitoring")
                .with("timestamp", utc(4, 22, 0, 0))
                .with("steps", 2000)
                .with("distance", 1500.0)
                .with("calories", 80),
            MessageRecord::new("monitoring")
                .with("timestamp", utc(4, 22, 0, 0))
                .with("calories", 15),
            MessageRecord::new("monitoring")
                .with("timestamp", utc(4, 9, 15, 0))
                .with("steps", 300),
            MessageRecord::new("monitoring")
                .with("timestamp_16", 3_600)
                .with("heart_rate", 61),
            MessageRecord::new("monitoring")
                .with("heart_rate", 70),
            MessageRecord::new("monitoring")
                .with("timestamp_16", 7_200)
                .with("moderate_activity_minutes", 12),
            MessageRecord::new("monitoring")
                .with("timestamp_16", 9_000)
                .with("vigorous_activity_minutes", 5)
                .with("moderate_activity_minutes", FieldValue::Null),
            MessageRecord::new("monitoring_hr_data")
                .with("timestamp", utc(4, 10, 0, 0))
                .with("resting_heart_rate", 58)
                .with("current_day_resting_heart_rate", 60),
            MessageRecord::new("monitoring_hr_data")
                .with("timestamp", utc(4, 22, 0, 0))
                .with("resting_heart_rate", 55)
                .with("current_day_resting_heart_rate", 57),
            MessageRecord::new("stress_level")
                .with("stress_level_time", utc(4, 7, 0, 0))
                .with("stress_level_value", -1),
            MessageRecord::new("respiration_rate")
                .with("timestamp", utc(4, 7, 0, 0))
                .with("respiration_rate", 14.5),
        ];

        let day = aggregate(&pools(&messages), &plus_two()).unwrap();

        assert_eq!(day.day, date(4));
        assert_eq!(day.activities, vec!["walking", "running"]);
        assert_eq!(
            day.steps,
            Some(StepTotals {
                day: Some(date(4)),
                steps: 10_000,
                distance: 7_600.5,
                calories: 500,
            })
        );
        assert_eq!(
            day.calories,
            CalorieTotals {
                metabolic: 1650,
                active: 515,
                total: 2165,
            }
        );
        assert_eq!(day.samples[0].day, Some(date(4)));
        assert!(day.samples[0].daily_log);
        assert_eq!(day.samples[3].day, Some(date(4)));
        assert!(!day.samples[3].daily_log);

        assert_eq!(
            day.heart_rates,
            vec![HeartRateSample {
                local_time: date(4).and_hms_opt(1, 0, 0).unwrap(),
                bpm: 61,
            }]
        );
        assert_eq!(day.intensities.len(), 2);
        assert_eq!(day.intensities[1].moderate, 0);
        assert_eq!(
            day.intensity_minutes,
            IntensityMinutes {
                moderate: 12,
                vigorous: 5,
            }
        );
        assert_eq!(day.resting_heart_rate, Some(55));
        assert_eq!(day.stress_levels[0].value, -1);
        assert_eq!(day.respiration_rates[0].breaths_per_minute, 14.5);
    }

    #[test]
    fn test_zero_step_daily_log_is_not_counted() {
        let messages = vec![
            MessageRecord::new("monitoring_info").with("timestamp", utc(3, 6, 0, 0)),
            MessageRecord::new("monitoring")
                .with("timestamp", utc(3, 22, 0, 0))
                .with("steps", 0)
                .with("distance", 40.0)
                .with("calories", 900),
            MessageRecord::new("monitoring")
                .with("timestamp", utc(4, 22, 0, 0))
                .with("steps", 6400)
                .with("distance", 4800.0)
                .with("active_calories", 310),
        ];

        let day = aggregate(&pools(&messages), &plus_two()).unwrap();
        assert_eq!(
            day.steps,
            Some(StepTotals {
                day: Some(date(4)),
                steps: 6400,
                distance: 4800.0,
                calories: 310,
            })
        );

        let only_zero = &messages[..2];
        assert_eq!(aggregate(&pools(only_zero), &plus_two()).unwrap().steps, None);
    }

    #[test]
    fn test_sample_carries_activity_fields() {
        let messages = vec![
            MessageRecord::new("monitoring_info").with("timestamp", utc(4, 6, 0, 0)),
            MessageRecord::new("monitoring")
                .with("timestamp", utc(4, 12, 30, 0))
                .with("activity_type", "swimming")
                .with("activity_subtype", "lap_swimming")
                .with("cycles", 412.5)
                .with("strokes", 825)
                .with("duration_min", 35)
                .with("duration", 2_100),
        ];

        let day = aggregate(&pools(&messages), &plus_two()).unwrap();
        let sample = &day.samples[0];
        assert_eq!(sample.cycles, Some(412.5));
        assert_eq!(sample.strokes, Some(825));
        assert_eq!(sample.activity_type.as_deref(), Some("swimming"));
        assert_eq!(sample.activity_subtype.as_deref(), Some("lap_swimming"));
        assert_eq!(sample.duration_min, Some(35));
        assert_eq!(sample.duration, Some(2_100));
        assert!(!sample.daily_log);
    }
}
