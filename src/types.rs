//! Assembled models
//!
//! This module defines what a parse produces: activities of every sport
//! family, monitoring days, HRV and sleep sessions, and the single
//! [`ParseOutcome`] wrapping one of them or the collected failures.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

// Shared statistic shapes

/// Timing of a session, lap, split or set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeStat {
    /// When the message was logged
    pub timestamp: Option<DateTime<Utc>>,
    /// When the user pressed start
    pub start_time: Option<DateTime<Utc>>,
    /// Seconds from start to end including pauses
    pub elapsed: Option<f64>,
    /// Seconds of running timer, excluding pauses
    pub timer: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxAvg {
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxMinAvg {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
}

/// Altitude range in meters plus cumulative gain and loss
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AltitudeStat {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub gain: Option<f64>,
    pub loss: Option<f64>,
}

/// Position in semicircles as reported by the device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub lat: Option<i64>,
    pub lon: Option<i64>,
}

// Activities

/// Planned workout attached to an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub steps: Vec<WorkoutStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStep {
    pub message_index: i64,
    pub name: Option<String>,
    pub duration_type: Option<String>,
    pub duration_value: Option<i64>,
    /// Seconds
    pub duration_time: Option<f64>,
    /// Meters
    pub duration_distance: Option<f64>,
    pub duration_reps: Option<i64>,
    pub repeat_steps: Option<i64>,
    pub target_type: Option<String>,
    pub target_value: Option<i64>,
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub exercise_category: Option<String>,
    pub exercise_weight: Option<f64>,
}

/// Recording device, from the file's `file_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub manufacturer: Option<String>,
    pub product: Option<i64>,
    pub garmin_product: Option<String>,
    pub serial_number: Option<i64>,
    pub time_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingEffect {
    pub aerobic: Option<f64>,
    pub anaerobic: Option<f64>,
    pub load_peak: Option<f64>,
}

/// Session-level statistics common to every activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub name: String,
    pub sport: String,
    pub sub_sport: String,
    pub sport_profile_name: Option<String>,
    pub time: TimeStat,
    pub hr: MaxAvg,
    pub temperature: MaxMinAvg,
    pub total_calories: Option<f64>,
    pub total_cycles: Option<i64>,
    pub first_lap_index: Option<i64>,
    pub num_laps: Option<i64>,
    pub training_effect: TrainingEffect,
    pub device: Option<Device>,
    pub workout: Option<Workout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub message_index: i64,
    pub timestamp: DateTime<Utc>,
    pub time: TimeStat,
    pub total_distance: Option<f64>,
    pub speed: MaxAvg,
    pub hr: MaxAvg,
    pub altitude: AltitudeStat,
    pub total_calories: Option<f64>,
    pub cadence: MaxAvg,
    pub total_strides: Option<i64>,
    pub start_location: Location,
    pub end_location: Location,
}

/// One record sample on the activity track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    pub altitude: Option<f64>,
    pub distance: Option<f64>,
    pub speed: Option<f64>,
    pub heart_rate: Option<i64>,
    pub cadence: Option<i64>,
    pub power: Option<i64>,
    pub temperature: Option<i64>,
}

/// Running, walking, hiking or cycling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceActivity {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    /// Meters
    pub total_distance: Option<f64>,
    /// Meters per second
    pub speed: MaxAvg,
    pub cadence: MaxAvg,
    pub altitude: AltitudeStat,
    pub total_strides: Option<i64>,
    pub start_location: Location,
    pub end_location: Location,
    pub laps: Vec<Lap>,
    pub records: Vec<TrackPoint>,
}

/// Split types of the FIT profile; anything else reads as `Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    AscentSplit,
    DescentSplit,
    IntervalActive,
    IntervalRest,
    IntervalWarmup,
    IntervalCooldown,
    IntervalRecovery,
    IntervalOther,
    ClimbActive,
    ClimbRest,
    SurfActive,
    RunActive,
    RunRest,
    WorkoutRound,
    RwdRun,
    RwdWalk,
    WindsurfActive,
    RwdStand,
    Transition,
    SkiLiftSplit,
    SkiRunSplit,
    Unknown,
}

impl SplitType {
    pub const ALL: [SplitType; 22] = [
        SplitType::AscentSplit,
        SplitType::DescentSplit,
        SplitType::IntervalActive,
        SplitType::IntervalRest,
        SplitType::IntervalWarmup,
        SplitType::IntervalCooldown,
        SplitType::IntervalRecovery,
        SplitType::IntervalOther,
        SplitType::ClimbActive,
        SplitType::ClimbRest,
        SplitType::SurfActive,
        SplitType::RunActive,
        SplitType::RunRest,
        SplitType::WorkoutRound,
        SplitType::RwdRun,
        SplitType::RwdWalk,
        SplitType::WindsurfActive,
        SplitType::RwdStand,
        SplitType::Transition,
        SplitType::SkiLiftSplit,
        SplitType::SkiRunSplit,
        SplitType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::AscentSplit => "ascent_split",
            SplitType::DescentSplit => "descent_split",
            SplitType::IntervalActive => "interval_active",
            SplitType::IntervalRest => "interval_rest",
            SplitType::IntervalWarmup => "interval_warmup",
            SplitType::IntervalCooldown => "interval_cooldown",
            SplitType::IntervalRecovery => "interval_recovery",
            SplitType::IntervalOther => "interval_other",
            SplitType::ClimbActive => "climb_active",
            SplitType::ClimbRest => "climb_rest",
            SplitType::SurfActive => "surf_active",
            SplitType::RunActive => "run_active",
            SplitType::RunRest => "run_rest",
            SplitType::WorkoutRound => "workout_round",
            SplitType::RwdRun => "rwd_run",
            SplitType::RwdWalk => "rwd_walk",
            SplitType::WindsurfActive => "windsurf_active",
            SplitType::RwdStand => "rwd_stand",
            SplitType::Transition => "transition",
            SplitType::SkiLiftSplit => "ski_lift_split",
            SplitType::SkiRunSplit => "ski_run_split",
            SplitType::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .unwrap_or(SplitType::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbResult {
    Completed,
    Attempted,
    Discarded,
}

impl ClimbResult {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(3) => ClimbResult::Completed,
            Some(2) => ClimbResult::Attempted,
            _ => ClimbResult::Discarded,
        }
    }
}

/// One route attempt of a climbing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climb {
    pub time: TimeStat,
    pub split_type: SplitType,
    pub hr: MaxAvg,
    pub total_calories: Option<i64>,
    pub difficulty: Option<i64>,
    pub result: ClimbResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbActivity {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    pub climbs: Vec<Climb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthSet {
    pub order: Option<i64>,
    /// First exercise category, else the set type
    pub exercise: Option<String>,
    pub time: TimeStat,
    pub repetitions: Option<i64>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetActivity {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    pub sets: Vec<StrengthSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultisportActivity {
    pub device: Option<Device>,
    /// Sub-activities in session order
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    Distance(DistanceActivity),
    Climb(ClimbActivity),
    Set(SetActivity),
    Transition(ActivitySummary),
    /// Session statistics only, for non-distance legs of a multisport file
    Generic(ActivitySummary),
    Multisport(MultisportActivity),
}

impl Activity {
    /// Session statistics, `None` for the multisport container
    pub fn summary(&self) -> Option<&ActivitySummary> {
        match self {
            Activity::Distance(a) => Some(&a.summary),
            Activity::Climb(a) => Some(&a.summary),
            Activity::Set(a) => Some(&a.summary),
            Activity::Transition(s) | Activity::Generic(s) => Some(s),
            Activity::Multisport(_) => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Activity::Distance(_) => "distance",
            Activity::Climb(_) => "climb",
            Activity::Set(_) => "set",
            Activity::Transition(_) => "transition",
            Activity::Generic(_) => "generic",
            Activity::Multisport(_) => "multisport",
        }
    }
}

// Monitoring

/// One monitoring sample with its day attribution resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSample {
    pub timestamp: Option<DateTime<Utc>>,
    /// Local day the sample describes, after daily-log correction
    pub day: Option<NaiveDate>,
    pub daily_log: bool,
    /// Seconds from the start of the monitoring day
    pub offset_secs: Option<i64>,
    pub steps: Option<i64>,
    pub distance: Option<f64>,
    pub cycles: Option<f64>,
    pub strokes: Option<i64>,
    pub calories: Option<i64>,
    pub active_calories: Option<i64>,
    pub active_time: Option<f64>,
    pub activity_type: Option<String>,
    pub activity_subtype: Option<String>,
    pub activity_level: Option<String>,
    pub heart_rate: Option<i64>,
    pub intensity: Option<i64>,
    pub duration_min: Option<i64>,
    /// Seconds
    pub duration: Option<i64>,
    pub ascent: Option<f64>,
    pub descent: Option<f64>,
    pub moderate_activity_minutes: Option<i64>,
    pub vigorous_activity_minutes: Option<i64>,
}

/// Daily totals taken from the daily-log samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTotals {
    pub day: Option<NaiveDate>,
    pub steps: i64,
    pub distance: f64,
    pub calories: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub local_time: NaiveDateTime,
    pub bpm: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySample {
    pub local_time: NaiveDateTime,
    pub moderate: i64,
    pub vigorous: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityMinutes {
    pub moderate: i64,
    pub vigorous: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieTotals {
    pub metabolic: i64,
    pub active: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressSample {
    pub timestamp: DateTime<Utc>,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespirationSample {
    pub timestamp: DateTime<Utc>,
    pub breaths_per_minute: f64,
}

/// One monitoring day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSession {
    pub timestamp: DateTime<Utc>,
    pub day: NaiveDate,
    pub activities: Vec<String>,
    pub resting_metabolic_rate: Option<i64>,
    pub samples: Vec<MonitoringSample>,
    pub steps: Option<StepTotals>,
    pub heart_rates: Vec<HeartRateSample>,
    pub resting_heart_rate: Option<i64>,
    pub intensities: Vec<IntensitySample>,
    pub intensity_minutes: IntensityMinutes,
    pub calories: CalorieTotals,
    pub respiration_rates: Vec<RespirationSample>,
    pub stress_levels: Vec<StressSample>,
}

// HRV and sleep

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrvSample {
    pub timestamp: DateTime<Utc>,
    /// 5 minute RMSSD in milliseconds
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrvSession {
    pub timestamp: DateTime<Utc>,
    pub weekly_average: f64,
    pub last_night_average: f64,
    pub last_night_5_min_high: f64,
    pub baseline_low_upper: f64,
    pub baseline_balanced_lower: f64,
    pub baseline_balanced_upper: f64,
    pub status: String,
    pub values: Vec<HrvSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepScores {
    pub combined_awake_score: i64,
    pub awake_time_score: i64,
    pub awakenings_count_score: i64,
    pub deep_sleep_score: i64,
    pub sleep_duration_score: i64,
    pub light_sleep_score: i64,
    pub overall_sleep_score: i64,
    pub sleep_quality_score: i64,
    pub sleep_recovery_score: i64,
    pub rem_sleep_score: i64,
    pub sleep_restlessness_score: i64,
    pub awakenings_count: i64,
    pub interruptions_score: i64,
    pub average_stress_during_sleep: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLevelSample {
    pub timestamp: DateTime<Utc>,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    /// Distinct UTC dates spanned by the level samples, ascending
    pub dates: Vec<NaiveDate>,
    pub scores: SleepScores,
    pub levels: Vec<SleepLevelSample>,
}

/// Result of one parse: exactly one assembled model or the failures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", content = "data", rename_all = "snake_case")]
pub enum ParseOutcome {
    Activity(Activity),
    Monitoring(MonitoringSession),
    Hrv(HrvSession),
    Sleep(SleepSession),
    Error(Vec<ParseError>),
}

impl ParseOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ParseOutcome::Error(_))
    }

    /// Collected failures; empty on success
    pub fn errors(&self) -> &[ParseError] {
        match self {
            ParseOutcome::Error(errors) => errors,
            _ => &[],
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            ParseOutcome::Activity(_) => "activity",
            ParseOutcome::Monitoring(_) => "monitoring",
            ParseOutcome::Hrv(_) => "hrv",
            ParseOutcome::Sleep(_) => "sleep",
            ParseOutcome::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MessageKind;

    #[test]
    fn test_split_type_fallback() {
        assert_eq!(SplitType::from_name("climb_active"), SplitType::ClimbActive);
        assert_eq!(SplitType::from_name("ski_run_split"), SplitType::SkiRunSplit);
        assert_eq!(SplitType::from_name("rappel"), SplitType::Unknown);
        assert_eq!(SplitType::from_name("CLIMB_ACTIVE"), SplitType::Unknown);
    }

    #[test]
    fn test_climb_result_codes() {
        assert_eq!(ClimbResult::from_code(Some(3)), ClimbResult::Completed);
        assert_eq!(ClimbResult::from_code(Some(2)), ClimbResult::Attempted);
        assert_eq!(ClimbResult::from_code(Some(0)), ClimbResult::Discarded);
        assert_eq!(ClimbResult::from_code(None), ClimbResult::Discarded);
    }

    #[test]
    fn test_activity_serializes_flat_with_type_tag() {
        let summary = ActivitySummary {
            name: "Transition".to_string(),
            sport: "transition".to_string(),
            sub_sport: "generic".to_string(),
            sport_profile_name: None,
            time: TimeStat::default(),
            hr: MaxAvg::default(),
            temperature: MaxMinAvg::default(),
            total_calories: Some(12.0),
            total_cycles: None,
            first_lap_index: None,
            num_laps: None,
            training_effect: TrainingEffect::default(),
            device: None,
            workout: None,
        };
        let json = serde_json::to_value(Activity::Transition(summary)).unwrap();
        assert_eq!(json["type"], "transition");
        assert_eq!(json["name"], "Transition");
        assert_eq!(json["total_calories"], 12.0);
    }

    #[test]
    fn test_error_outcome_serialization() {
        let outcome = ParseOutcome::Error(vec![ParseError::NotFound {
            kind: MessageKind::SleepLevel,
        }]);
        assert!(outcome.is_error());
        assert_eq!(outcome.errors().len(), 1);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "error");
        assert_eq!(json["data"][0]["error"], "not_found");
        assert_eq!(json["data"][0]["kind"], "sleep_level");
    }
}
