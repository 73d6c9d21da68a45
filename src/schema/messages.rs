//! Typed FIT messages
//!
//! Every message kind has one struct whose required fields are plain values
//! and whose optional fields are `Option`s. [`FitMessage::from_fields`] is the
//! single validating factory: it enforces the required-field contract from
//! [`MessageKind::required_fields`] and copies the remaining fields,
//! tolerating absent or mistyped optional values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::{resolve, FieldKey, FieldMap, FieldValue, KeyRef};
use super::MessageKind;
use crate::error::ParseError;

/// Alternate keys for fields, in priority order.
///
/// Split messages recorded by Garmin climbing activities carry heart rate,
/// calories and climb result under undocumented field numbers; decoders
/// report them either as the decimal string or as the integer.
const FIELD_ALIASES: &[(MessageKind, &str, &[KeyRef])] = &[
    (
        MessageKind::FileId,
        "file_type",
        &[KeyRef::Name("type"), KeyRef::Name("file_type")],
    ),
    (
        MessageKind::Split,
        "avg_hr",
        &[KeyRef::Name("15"), KeyRef::Number(15), KeyRef::Name("avg_hr")],
    ),
    (
        MessageKind::Split,
        "max_hr",
        &[KeyRef::Name("16"), KeyRef::Number(16), KeyRef::Name("max_hr")],
    ),
    (
        MessageKind::Split,
        "total_calories",
        &[KeyRef::Name("28"), KeyRef::Number(28), KeyRef::Name("total_calories")],
    ),
    (
        MessageKind::Split,
        "difficulty",
        &[KeyRef::Name("70"), KeyRef::Number(70), KeyRef::Name("difficulty")],
    ),
    (
        MessageKind::Split,
        "result",
        &[KeyRef::Name("71"), KeyRef::Number(71), KeyRef::Name("result")],
    ),
    (
        MessageKind::Split,
        "discarded",
        &[KeyRef::Name("80"), KeyRef::Number(80), KeyRef::Name("discarded")],
    ),
];

/// A message kind that can be validated out of a raw field map
pub trait FitMessage: Sized {
    const KIND: MessageKind;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError>;
}

/// Read access to a field map on behalf of one message kind
pub(crate) struct FieldReader<'a> {
    kind: MessageKind,
    fields: &'a FieldMap,
}

impl<'a> FieldReader<'a> {
    /// Enforce the required-field contract of `kind`, reporting every
    /// missing field at once.
    pub(crate) fn checked(kind: MessageKind, fields: &'a FieldMap) -> Result<Self, ParseError> {
        let reader = Self { kind, fields };
        let missing: Vec<String> = kind
            .required_fields()
            .iter()
            .filter(|name| reader.value(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(reader)
        } else {
            Err(ParseError::MissingField {
                kind,
                fields: missing,
            })
        }
    }

    fn value(&self, name: &str) -> Option<&'a FieldValue> {
        let aliases = FIELD_ALIASES
            .iter()
            .find(|(kind, field, _)| *kind == self.kind && *field == name);

        match aliases {
            Some((_, _, candidates)) => resolve(self.fields, candidates),
            None => self
                .fields
                .get(&FieldKey::from(name))
                .filter(|value| !value.is_null()),
        }
    }

    fn required<T>(
        &self,
        name: &str,
        convert: impl Fn(&FieldValue) -> Option<T>,
    ) -> Result<T, ParseError> {
        match self.value(name) {
            Some(value) => convert(value).ok_or_else(|| ParseError::InvalidField {
                kind: self.kind,
                field: name.to_string(),
            }),
            None => Err(ParseError::MissingField {
                kind: self.kind,
                fields: vec![name.to_string()],
            }),
        }
    }

    fn time(&self, name: &str) -> Result<DateTime<Utc>, ParseError> {
        self.required(name, FieldValue::as_timestamp)
    }

    fn float(&self, name: &str) -> Result<f64, ParseError> {
        self.required(name, FieldValue::as_f64)
    }

    fn int(&self, name: &str) -> Result<i64, ParseError> {
        self.required(name, FieldValue::as_i64)
    }

    fn text(&self, name: &str) -> Result<String, ParseError> {
        self.required(name, FieldValue::as_label)
    }

    fn code_or_label(&self, name: &str) -> Result<CodeOrLabel, ParseError> {
        self.required(name, CodeOrLabel::from_value)
    }

    fn opt_time(&self, name: &str) -> Option<DateTime<Utc>> {
        self.value(name).and_then(FieldValue::as_timestamp)
    }

    fn opt_float(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(FieldValue::as_f64)
    }

    fn opt_int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(FieldValue::as_i64)
    }

    fn opt_text(&self, name: &str) -> Option<String> {
        self.value(name).and_then(FieldValue::as_label)
    }

    fn opt_code_or_label(&self, name: &str) -> Option<CodeOrLabel> {
        self.value(name).and_then(CodeOrLabel::from_value)
    }

    /// Label lists; a single label is read as a one-element list
    fn labels(&self, name: &str) -> Vec<String> {
        match self.value(name) {
            Some(FieldValue::Array(items)) => items.iter().filter_map(FieldValue::as_label).collect(),
            Some(value) => value.as_label().into_iter().collect(),
            None => Vec::new(),
        }
    }
}

/// Enumerated field reported either as its raw code or as a resolved label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeOrLabel {
    Code(i64),
    Label(String),
}

impl CodeOrLabel {
    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(label) => Some(CodeOrLabel::Label(label.clone())),
            other => other.as_i64().map(CodeOrLabel::Code),
        }
    }
}

// Activity files

#[derive(Debug, Clone, PartialEq)]
pub struct FileIdMessage {
    pub file_type: String,
    pub serial_number: Option<i64>,
    pub time_created: Option<DateTime<Utc>>,
    pub manufacturer: Option<String>,
    pub product: Option<i64>,
    pub garmin_product: Option<String>,
}

impl FileIdMessage {
    pub fn is_activity(&self) -> bool {
        self.file_type.eq_ignore_ascii_case("activity")
    }
}

impl FitMessage for FileIdMessage {
    const KIND: MessageKind = MessageKind::FileId;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            file_type: r.text("file_type")?,
            serial_number: r.opt_int("serial_number"),
            time_created: r.opt_time("time_created"),
            manufacturer: r.opt_text("manufacturer"),
            product: r.opt_int("product"),
            garmin_product: r.opt_text("garmin_product"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionMessage {
    pub message_index: i64,
    pub timestamp: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub total_elapsed_time: f64,
    pub total_timer_time: f64,
    pub sport: String,
    pub sub_sport: String,

    pub sport_profile_name: Option<String>,
    pub start_position_lat: Option<i64>,
    pub start_position_long: Option<i64>,
    pub end_position_lat: Option<i64>,
    pub end_position_long: Option<i64>,
    pub first_lap_index: Option<i64>,
    pub num_laps: Option<i64>,

    pub total_distance: Option<f64>,
    pub total_cycles: Option<i64>,
    pub total_strides: Option<i64>,
    pub enhanced_avg_speed: Option<f64>,
    pub avg_speed: Option<f64>,
    pub enhanced_max_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub avg_running_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    pub max_running_cadence: Option<f64>,
    pub total_calories: Option<f64>,
    pub total_ascent: Option<f64>,
    pub total_descent: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,

    pub training_load_peak: Option<f64>,
    pub total_training_effect: Option<f64>,
    pub total_anaerobic_training_effect: Option<f64>,
}

impl FitMessage for SessionMessage {
    const KIND: MessageKind = MessageKind::Session;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            message_index: r.int("message_index")?,
            timestamp: r.time("timestamp")?,
            start_time: r.time("start_time")?,
            total_elapsed_time: r.float("total_elapsed_time")?,
            total_timer_time: r.float("total_timer_time")?,
            sport: r.text("sport")?,
            sub_sport: r.text("sub_sport")?,
            sport_profile_name: r.opt_text("sport_profile_name"),
            start_position_lat: r.opt_int("start_position_lat"),
            start_position_long: r.opt_int("start_position_long"),
            end_position_lat: r.opt_int("end_position_lat"),
            end_position_long: r.opt_int("end_position_long"),
            first_lap_index: r.opt_int("first_lap_index"),
            num_laps: r.opt_int("num_laps"),
            total_distance: r.opt_float("total_distance"),
            total_cycles: r.opt_int("total_cycles"),
            total_strides: r.opt_int("total_strides"),
            enhanced_avg_speed: r.opt_float("enhanced_avg_speed"),
            avg_speed: r.opt_float("avg_speed"),
            enhanced_max_speed: r.opt_float("enhanced_max_speed"),
            max_speed: r.opt_float("max_speed"),
            avg_heart_rate: r.opt_float("avg_heart_rate"),
            max_heart_rate: r.opt_float("max_heart_rate"),
            avg_cadence: r.opt_float("avg_cadence"),
            avg_running_cadence: r.opt_float("avg_running_cadence"),
            max_cadence: r.opt_float("max_cadence"),
            max_running_cadence: r.opt_float("max_running_cadence"),
            total_calories: r.opt_float("total_calories"),
            total_ascent: r.opt_float("total_ascent"),
            total_descent: r.opt_float("total_descent"),
            avg_temperature: r.opt_float("avg_temperature"),
            max_temperature: r.opt_float("max_temperature"),
            min_temperature: r.opt_float("min_temperature"),
            training_load_peak: r.opt_float("training_load_peak"),
            total_training_effect: r.opt_float("total_training_effect"),
            total_anaerobic_training_effect: r.opt_float("total_anaerobic_training_effect"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordMessage {
    pub timestamp: DateTime<Utc>,
    pub position_lat: Option<i64>,
    pub position_long: Option<i64>,
    pub altitude: Option<f64>,
    pub enhanced_altitude: Option<f64>,
    pub heart_rate: Option<i64>,
    pub cadence: Option<i64>,
    pub distance: Option<f64>,
    pub enhanced_distance: Option<f64>,
    pub speed: Option<f64>,
    pub enhanced_speed: Option<f64>,
    pub power: Option<i64>,
    pub temperature: Option<i64>,
    pub calories: Option<i64>,
    pub respiration_rate: Option<f64>,
    pub enhanced_respiration_rate: Option<f64>,
}

impl FitMessage for RecordMessage {
    const KIND: MessageKind = MessageKind::Record;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            position_lat: r.opt_int("position_lat"),
            position_long: r.opt_int("position_long"),
            altitude: r.opt_float("altitude"),
            enhanced_altitude: r.opt_float("enhanced_altitude"),
            heart_rate: r.opt_int("heart_rate"),
            cadence: r.opt_int("cadence"),
            distance: r.opt_float("distance"),
            enhanced_distance: r.opt_float("enhanced_distance"),
            speed: r.opt_float("speed"),
            enhanced_speed: r.opt_float("enhanced_speed"),
            power: r.opt_int("power"),
            temperature: r.opt_int("temperature"),
            calories: r.opt_int("calories"),
            respiration_rate: r.opt_float("respiration_rate"),
            enhanced_respiration_rate: r.opt_float("enhanced_respiration_rate"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LapMessage {
    pub message_index: i64,
    pub timestamp: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub total_elapsed_time: Option<f64>,
    pub total_timer_time: Option<f64>,
    pub total_distance: Option<f64>,

    pub start_position_lat: Option<i64>,
    pub start_position_long: Option<i64>,
    pub end_position_lat: Option<i64>,
    pub end_position_long: Option<i64>,

    pub avg_speed: Option<f64>,
    pub enhanced_avg_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub enhanced_max_speed: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub avg_running_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    pub max_running_cadence: Option<f64>,

    pub total_ascent: Option<f64>,
    pub total_descent: Option<f64>,
    pub max_altitude: Option<f64>,
    pub enhanced_max_altitude: Option<f64>,
    pub min_altitude: Option<f64>,
    pub enhanced_min_altitude: Option<f64>,

    pub total_calories: Option<f64>,
    pub total_strides: Option<i64>,
    pub total_strokes: Option<i64>,
}

impl FitMessage for LapMessage {
    const KIND: MessageKind = MessageKind::Lap;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            message_index: r.int("message_index")?,
            timestamp: r.time("timestamp")?,
            start_time: r.opt_time("start_time"),
            total_elapsed_time: r.opt_float("total_elapsed_time"),
            total_timer_time: r.opt_float("total_timer_time"),
            total_distance: r.opt_float("total_distance"),
            start_position_lat: r.opt_int("start_position_lat"),
            start_position_long: r.opt_int("start_position_long"),
            end_position_lat: r.opt_int("end_position_lat"),
            end_position_long: r.opt_int("end_position_long"),
            avg_speed: r.opt_float("avg_speed"),
            enhanced_avg_speed: r.opt_float("enhanced_avg_speed"),
            max_speed: r.opt_float("max_speed"),
            enhanced_max_speed: r.opt_float("enhanced_max_speed"),
            avg_heart_rate: r.opt_float("avg_heart_rate"),
            max_heart_rate: r.opt_float("max_heart_rate"),
            avg_cadence: r.opt_float("avg_cadence"),
            avg_running_cadence: r.opt_float("avg_running_cadence"),
            max_cadence: r.opt_float("max_cadence"),
            max_running_cadence: r.opt_float("max_running_cadence"),
            total_ascent: r.opt_float("total_ascent"),
            total_descent: r.opt_float("total_descent"),
            max_altitude: r.opt_float("max_altitude"),
            enhanced_max_altitude: r.opt_float("enhanced_max_altitude"),
            min_altitude: r.opt_float("min_altitude"),
            enhanced_min_altitude: r.opt_float("enhanced_min_altitude"),
            total_calories: r.opt_float("total_calories"),
            total_strides: r.opt_int("total_strides"),
            total_strokes: r.opt_int("total_strokes"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitMessage {
    pub split_type: String,
    pub total_elapsed_time: f64,
    pub total_timer_time: f64,
    pub start_time: DateTime<Utc>,
    pub avg_hr: Option<i64>,
    pub max_hr: Option<i64>,
    pub total_calories: Option<i64>,
    pub difficulty: Option<i64>,
    /// 3 when the climb was completed, 2 when attempted
    pub result: Option<i64>,
    pub discarded: Option<i64>,
}

impl FitMessage for SplitMessage {
    const KIND: MessageKind = MessageKind::Split;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            split_type: r.text("split_type")?,
            total_elapsed_time: r.float("total_elapsed_time")?,
            total_timer_time: r.float("total_timer_time")?,
            start_time: r.time("start_time")?,
            avg_hr: r.opt_int("avg_hr"),
            max_hr: r.opt_int("max_hr"),
            total_calories: r.opt_int("total_calories"),
            difficulty: r.opt_int("difficulty"),
            result: r.opt_int("result"),
            discarded: r.opt_int("discarded"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetMessage {
    pub timestamp: DateTime<Utc>,
    pub duration: Option<f64>,
    pub repetitions: Option<i64>,
    pub weight: Option<f64>,
    pub set_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub category: Vec<String>,
    pub weight_display_unit: Option<String>,
    pub message_index: Option<i64>,
    pub wkt_step_index: Option<i64>,
}

impl FitMessage for SetMessage {
    const KIND: MessageKind = MessageKind::Set;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            duration: r.opt_float("duration"),
            repetitions: r.opt_int("repetitions"),
            weight: r.opt_float("weight"),
            set_type: r.opt_text("set_type"),
            start_time: r.opt_time("start_time"),
            category: r.labels("category"),
            weight_display_unit: r.opt_text("weight_display_unit"),
            message_index: r.opt_int("message_index"),
            wkt_step_index: r.opt_int("wkt_step_index"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutMessage {
    pub message_index: i64,
    pub sport: Option<String>,
    pub sub_sport: Option<String>,
    pub num_valid_steps: Option<i64>,
    pub wkt_name: Option<String>,
}

impl FitMessage for WorkoutMessage {
    const KIND: MessageKind = MessageKind::Workout;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            message_index: r.int("message_index")?,
            sport: r.opt_text("sport"),
            sub_sport: r.opt_text("sub_sport"),
            num_valid_steps: r.opt_int("num_valid_steps"),
            wkt_name: r.opt_text("wkt_name"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutStepMessage {
    pub message_index: i64,
    pub wkt_step_name: Option<String>,
    pub duration_type: Option<String>,
    pub duration_value: Option<i64>,
    pub duration_time: Option<f64>,
    pub duration_distance: Option<f64>,
    pub duration_reps: Option<i64>,
    pub target_type: Option<String>,
    pub target_value: Option<i64>,
    pub repeat_steps: Option<i64>,
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub exercise_category: Option<String>,
    pub exercise_weight: Option<f64>,
}

impl FitMessage for WorkoutStepMessage {
    const KIND: MessageKind = MessageKind::WorkoutStep;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            message_index: r.int("message_index")?,
            wkt_step_name: r.opt_text("wkt_step_name"),
            duration_type: r.opt_text("duration_type"),
            duration_value: r.opt_int("duration_value"),
            duration_time: r.opt_float("duration_time"),
            duration_distance: r.opt_float("duration_distance"),
            duration_reps: r.opt_int("duration_reps"),
            target_type: r.opt_text("target_type"),
            target_value: r.opt_int("target_value"),
            repeat_steps: r.opt_int("repeat_steps"),
            intensity: r.opt_text("intensity"),
            notes: r.opt_text("notes"),
            exercise_category: r.opt_text("exercise_category"),
            exercise_weight: r.opt_float("exercise_weight"),
        })
    }
}

// Monitoring files

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringInfoMessage {
    pub timestamp: DateTime<Utc>,
    pub local_timestamp: Option<i64>,
    pub activity_type: Vec<String>,
    pub resting_metabolic_rate: Option<i64>,
}

impl FitMessage for MonitoringInfoMessage {
    const KIND: MessageKind = MessageKind::MonitoringInfo;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            local_timestamp: r.opt_int("local_timestamp"),
            activity_type: r.labels("activity_type"),
            resting_metabolic_rate: r.opt_int("resting_metabolic_rate"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringMessage {
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds relative to the monitoring day, used by intraday samples
    pub timestamp_16: Option<i64>,
    pub calories: Option<i64>,
    pub active_calories: Option<i64>,
    pub distance: Option<f64>,
    pub cycles: Option<f64>,
    pub strokes: Option<i64>,
    pub steps: Option<i64>,
    pub active_time: Option<f64>,
    pub activity_type: Option<String>,
    pub activity_subtype: Option<String>,
    pub activity_level: Option<String>,
    pub heart_rate: Option<i64>,
    pub intensity: Option<i64>,
    pub duration_min: Option<i64>,
    pub duration: Option<i64>,
    pub ascent: Option<f64>,
    pub descent: Option<f64>,
    pub moderate_activity_minutes: Option<i64>,
    pub vigorous_activity_minutes: Option<i64>,
}

impl FitMessage for MonitoringMessage {
    const KIND: MessageKind = MessageKind::Monitoring;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.opt_time("timestamp"),
            timestamp_16: r.opt_int("timestamp_16"),
            calories: r.opt_int("calories"),
            active_calories: r.opt_int("active_calories"),
            distance: r.opt_float("distance"),
            cycles: r.opt_float("cycles"),
            strokes: r.opt_int("strokes"),
            steps: r.opt_int("steps"),
            active_time: r.opt_float("active_time"),
            activity_type: r.opt_text("activity_type"),
            activity_subtype: r.opt_text("activity_subtype"),
            activity_level: r.opt_text("activity_level"),
            heart_rate: r.opt_int("heart_rate"),
            intensity: r.opt_int("intensity"),
            duration_min: r.opt_int("duration_min"),
            duration: r.opt_int("duration"),
            ascent: r.opt_float("ascent"),
            descent: r.opt_float("descent"),
            moderate_activity_minutes: r.opt_int("moderate_activity_minutes"),
            vigorous_activity_minutes: r.opt_int("vigorous_activity_minutes"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HrDataMessage {
    pub timestamp: DateTime<Utc>,
    pub resting_heart_rate: i64,
    pub current_day_resting_heart_rate: i64,
}

impl FitMessage for HrDataMessage {
    const KIND: MessageKind = MessageKind::MonitoringHrData;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            resting_heart_rate: r.int("resting_heart_rate")?,
            current_day_resting_heart_rate: r.int("current_day_resting_heart_rate")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StressLevelMessage {
    pub stress_level_value: i64,
    pub stress_level_time: DateTime<Utc>,
}

impl FitMessage for StressLevelMessage {
    const KIND: MessageKind = MessageKind::StressLevel;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            stress_level_value: r.int("stress_level_value")?,
            stress_level_time: r.time("stress_level_time")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RespirationRateMessage {
    pub timestamp: DateTime<Utc>,
    /// Breaths per minute
    pub respiration_rate: f64,
}

impl FitMessage for RespirationRateMessage {
    const KIND: MessageKind = MessageKind::RespirationRate;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            respiration_rate: r.float("respiration_rate")?,
        })
    }
}

// HRV and sleep files

#[derive(Debug, Clone, PartialEq)]
pub struct HrvStatusSummaryMessage {
    pub timestamp: DateTime<Utc>,
    pub weekly_average: f64,
    pub last_night_average: f64,
    pub last_night_5_min_high: f64,
    pub baseline_low_upper: f64,
    pub baseline_balanced_lower: f64,
    pub baseline_balanced_upper: f64,
    pub status: CodeOrLabel,
}

impl FitMessage for HrvStatusSummaryMessage {
    const KIND: MessageKind = MessageKind::HrvStatusSummary;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            weekly_average: r.float("weekly_average")?,
            last_night_average: r.float("last_night_average")?,
            last_night_5_min_high: r.float("last_night_5_min_high")?,
            baseline_low_upper: r.float("baseline_low_upper")?,
            baseline_balanced_lower: r.float("baseline_balanced_lower")?,
            baseline_balanced_upper: r.float("baseline_balanced_upper")?,
            status: r.code_or_label("status")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HrvValueMessage {
    pub timestamp: DateTime<Utc>,
    /// 5 minute RMSSD in milliseconds
    pub value: Option<f64>,
}

impl FitMessage for HrvValueMessage {
    const KIND: MessageKind = MessageKind::HrvValue;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            value: r.opt_float("value"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SleepAssessmentMessage {
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

impl FitMessage for SleepAssessmentMessage {
    const KIND: MessageKind = MessageKind::SleepAssessment;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            combined_awake_score: r.int("combined_awake_score")?,
            awake_time_score: r.int("awake_time_score")?,
            awakenings_count_score: r.int("awakenings_count_score")?,
            deep_sleep_score: r.int("deep_sleep_score")?,
            sleep_duration_score: r.int("sleep_duration_score")?,
            light_sleep_score: r.int("light_sleep_score")?,
            overall_sleep_score: r.int("overall_sleep_score")?,
            sleep_quality_score: r.int("sleep_quality_score")?,
            sleep_recovery_score: r.int("sleep_recovery_score")?,
            rem_sleep_score: r.int("rem_sleep_score")?,
            sleep_restlessness_score: r.int("sleep_restlessness_score")?,
            awakenings_count: r.int("awakenings_count")?,
            interruptions_score: r.int("interruptions_score")?,
            average_stress_during_sleep: r.float("average_stress_during_sleep")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SleepLevelMessage {
    pub timestamp: DateTime<Utc>,
    pub sleep_level: Option<CodeOrLabel>,
}

impl FitMessage for SleepLevelMessage {
    const KIND: MessageKind = MessageKind::SleepLevel;

    fn from_fields(fields: &FieldMap) -> Result<Self, ParseError> {
        let r = FieldReader::checked(Self::KIND, fields)?;
        Ok(Self {
            timestamp: r.time("timestamp")?,
            sleep_level: r.opt_code_or_label("sleep_level"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MessageRecord;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap()
    }

    fn session_record() -> MessageRecord {
        MessageRecord::new("session")
            .with("message_index", 0)
            .with("timestamp", ts(9, 0))
            .with("start_time", ts(8, 0))
            .with("total_elapsed_time", 3700.0)
            .with("total_timer_time", 3600.0)
            .with("sport", "running")
            .with("sub_sport", "generic")
    }

    #[test]
    fn test_session_with_only_required_fields() {
        let session = SessionMessage::from_fields(&session_record().fields).unwrap();
        assert_eq!(session.sport, "running");
        assert_eq!(session.start_time, ts(8, 0));
        assert_eq!(session.total_timer_time, 3600.0);
        assert_eq!(session.avg_speed, None);
        assert_eq!(session.total_ascent, None);
    }

    #[test]
    fn test_session_reports_all_missing_fields() {
        let record = MessageRecord::new("session").with("message_index", 1);
        let err = SessionMessage::from_fields(&record.fields).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                kind: MessageKind::Session,
                fields: vec![
                    "timestamp".to_string(),
                    "start_time".to_string(),
                    "total_elapsed_time".to_string(),
                    "total_timer_time".to_string(),
                    "sport".to_string(),
                    "sub_sport".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_null_required_field_counts_as_missing() {
        let record = session_record().with("sub_sport", FieldValue::Null);
        let err = SessionMessage::from_fields(&record.fields).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField { ref fields, .. } if fields == &vec!["sub_sport".to_string()]
        ));
    }

    #[test]
    fn test_mistyped_required_field_is_invalid() {
        let record = session_record().with("start_time", "yesterday");
        let err = SessionMessage::from_fields(&record.fields).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidField {
                kind: MessageKind::Session,
                field: "start_time".to_string(),
            }
        );
    }

    #[test]
    fn test_mistyped_optional_field_is_dropped() {
        let record = session_record().with("avg_speed", "fast");
        let session = SessionMessage::from_fields(&record.fields).unwrap();
        assert_eq!(session.avg_speed, None);
    }

    #[test]
    fn test_file_id_renames_type() {
        let record = MessageRecord::new("file_id")
            .with("type", "activity")
            .with("serial_number", 12345)
            .with("manufacturer", "garmin");
        let file_id = FileIdMessage::from_fields(&record.fields).unwrap();
        assert_eq!(file_id.file_type, "activity");
        assert!(file_id.is_activity());

        let record = MessageRecord::new("file_id").with("type", "Segment");
        let file_id = FileIdMessage::from_fields(&record.fields).unwrap();
        assert!(!file_id.is_activity());
    }

    #[test]
    fn test_file_id_without_type_is_incomplete() {
        let record = MessageRecord::new("file_id").with("t", "activity");
        let err = FileIdMessage::from_fields(&record.fields).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { kind: MessageKind::FileId, .. }));
    }

    fn split_record() -> MessageRecord {
        MessageRecord::new("split")
            .with("split_type", "climb_active")
            .with("total_elapsed_time", 95.0)
            .with("total_timer_time", 95.0)
            .with("start_time", ts(18, 5))
    }

    #[test]
    fn test_split_hidden_fields_by_string_or_number_key() {
        let by_name = split_record()
            .with("15", 120)
            .with("16", 151)
            .with("28", 14)
            .with("70", 5)
            .with("71", 3)
            .with("80", 0);
        let by_number = split_record()
            .with(15u32, 120)
            .with(16u32, 151)
            .with(28u32, 14)
            .with(70u32, 5)
            .with(71u32, 3)
            .with(80u32, 0);

        let a = SplitMessage::from_fields(&by_name.fields).unwrap();
        let b = SplitMessage::from_fields(&by_number.fields).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.avg_hr, Some(120));
        assert_eq!(a.max_hr, Some(151));
        assert_eq!(a.total_calories, Some(14));
        assert_eq!(a.difficulty, Some(5));
        assert_eq!(a.result, Some(3));
        assert_eq!(a.discarded, Some(0));
    }

    #[test]
    fn test_split_string_key_wins() {
        let record = split_record().with("71", 3).with(71u32, 2);
        let split = SplitMessage::from_fields(&record.fields).unwrap();
        assert_eq!(split.result, Some(3));
    }

    #[test]
    fn test_split_without_hidden_fields() {
        let split = SplitMessage::from_fields(&split_record().fields).unwrap();
        assert_eq!(split.avg_hr, None);
        assert_eq!(split.result, None);
    }

    #[test]
    fn test_set_category_list_and_single_label() {
        let record = MessageRecord::new("set")
            .with("timestamp", ts(7, 0))
            .with("category", vec!["bench_press", "unknown"]);
        let set = SetMessage::from_fields(&record.fields).unwrap();
        assert_eq!(set.category, vec!["bench_press", "unknown"]);

        let record = MessageRecord::new("set")
            .with("timestamp", ts(7, 0))
            .with("category", "squat");
        let set = SetMessage::from_fields(&record.fields).unwrap();
        assert_eq!(set.category, vec!["squat"]);
    }

    #[test]
    fn test_hrv_status_code_or_label() {
        let record = MessageRecord::new("hrv_status_summary")
            .with("timestamp", ts(6, 0))
            .with("weekly_average", 48.0)
            .with("last_night_average", 51.0)
            .with("last_night_5_min_high", 80.0)
            .with("baseline_low_upper", 40.0)
            .with("baseline_balanced_lower", 44.0)
            .with("baseline_balanced_upper", 60.0)
            .with("status", 4);
        let summary = HrvStatusSummaryMessage::from_fields(&record.fields).unwrap();
        assert_eq!(summary.status, CodeOrLabel::Code(4));

        let record = record.with("status", "balanced");
        let summary = HrvStatusSummaryMessage::from_fields(&record.fields).unwrap();
        assert_eq!(summary.status, CodeOrLabel::Label("balanced".to_string()));
    }

    #[test]
    fn test_monitoring_has_no_required_fields() {
        let monitoring = MonitoringMessage::from_fields(&FieldMap::new()).unwrap();
        assert_eq!(monitoring.timestamp, None);
        assert_eq!(monitoring.steps, None);
    }
}
