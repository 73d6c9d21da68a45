//! Message kinds and their required-field contracts

use serde::{Deserialize, Serialize};
use std::fmt;

/// FIT message kinds understood by the assembler.
///
/// Names follow the FIT SDK profile (`SESSION`, `MONITORING_HR_DATA`, ...) and
/// are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    FileId,
    Session,
    Record,
    Lap,
    Split,
    Set,
    Workout,
    WorkoutStep,
    MonitoringInfo,
    Monitoring,
    MonitoringHrData,
    StressLevel,
    RespirationRate,
    HrvStatusSummary,
    HrvValue,
    SleepAssessment,
    SleepLevel,
}

impl MessageKind {
    pub const ALL: [MessageKind; 17] = [
        MessageKind::FileId,
        MessageKind::Session,
        MessageKind::Record,
        MessageKind::Lap,
        MessageKind::Split,
        MessageKind::Set,
        MessageKind::Workout,
        MessageKind::WorkoutStep,
        MessageKind::MonitoringInfo,
        MessageKind::Monitoring,
        MessageKind::MonitoringHrData,
        MessageKind::StressLevel,
        MessageKind::RespirationRate,
        MessageKind::HrvStatusSummary,
        MessageKind::HrvValue,
        MessageKind::SleepAssessment,
        MessageKind::SleepLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::FileId => "file_id",
            MessageKind::Session => "session",
            MessageKind::Record => "record",
            MessageKind::Lap => "lap",
            MessageKind::Split => "split",
            MessageKind::Set => "set",
            MessageKind::Workout => "workout",
            MessageKind::WorkoutStep => "workout_step",
            MessageKind::MonitoringInfo => "monitoring_info",
            MessageKind::Monitoring => "monitoring",
            MessageKind::MonitoringHrData => "monitoring_hr_data",
            MessageKind::StressLevel => "stress_level",
            MessageKind::RespirationRate => "respiration_rate",
            MessageKind::HrvStatusSummary => "hrv_status_summary",
            MessageKind::HrvValue => "hrv_value",
            MessageKind::SleepAssessment => "sleep_assessment",
            MessageKind::SleepLevel => "sleep_level",
        }
    }

    /// Look up a kind by its profile name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Fields that must be present and non-null for a message of this kind
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            MessageKind::FileId => &["file_type"],
            MessageKind::Session => &[
                "message_index",
                "timestamp",
                "start_time",
                "total_elapsed_time",
                "total_timer_time",
                "sport",
                "sub_sport",
            ],
            MessageKind::Record => &["timestamp"],
            MessageKind::Lap => &["message_index", "timestamp"],
            MessageKind::Split => &[
                "split_type",
                "total_elapsed_time",
                "total_timer_time",
                "start_time",
            ],
            MessageKind::Set => &["timestamp"],
            MessageKind::Workout => &["message_index"],
            MessageKind::WorkoutStep => &["message_index"],
            MessageKind::MonitoringInfo => &["timestamp"],
            MessageKind::Monitoring => &[],
            MessageKind::MonitoringHrData => &[
                "timestamp",
                "resting_heart_rate",
                "current_day_resting_heart_rate",
            ],
            MessageKind::StressLevel => &["stress_level_value", "stress_level_time"],
            MessageKind::RespirationRate => &["timestamp", "respiration_rate"],
            MessageKind::HrvStatusSummary => &[
                "timestamp",
                "weekly_average",
                "last_night_average",
                "last_night_5_min_high",
                "baseline_low_upper",
                "baseline_balanced_lower",
                "baseline_balanced_upper",
                "status",
            ],
            MessageKind::HrvValue => &["timestamp"],
            MessageKind::SleepAssessment => &[
                "combined_awake_score",
                "awake_time_score",
                "awakenings_count_score",
                "deep_sleep_score",
                "sleep_duration_score",
                "light_sleep_score",
                "overall_sleep_score",
                "sleep_quality_score",
                "sleep_recovery_score",
                "rem_sleep_score",
                "sleep_restlessness_score",
                "awakenings_count",
                "interruptions_score",
                "average_stress_during_sleep",
            ],
            MessageKind::SleepLevel => &["timestamp"],
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(MessageKind::from_name("SESSION"), Some(MessageKind::Session));
        assert_eq!(
            MessageKind::from_name("monitoring_hr_data"),
            Some(MessageKind::MonitoringHrData)
        );
        assert_eq!(MessageKind::from_name("device_info"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_session_contract() {
        let required = MessageKind::Session.required_fields();
        assert_eq!(required.len(), 7);
        assert!(required.contains(&"sub_sport"));
        assert!(MessageKind::Monitoring.required_fields().is_empty());
    }
}
