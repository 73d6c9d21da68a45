//! Typed message pools
//!
//! Validates the decoded message stream into one pool per message kind. Only
//! the kinds a parse target consumes are validated; everything else is
//! skipped.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use crate::schema::*;

/// What a decoded file is assembled into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTarget {
    Activity,
    Monitoring,
    Hrv,
    Sleep,
}

impl ParseTarget {
    /// Infer the target from the anchor messages present in the stream
    pub fn detect(messages: &[MessageRecord]) -> Self {
        let has = |kind: MessageKind| messages.iter().any(|m| m.message_kind() == Some(kind));

        if has(MessageKind::MonitoringInfo) {
            ParseTarget::Monitoring
        } else if has(MessageKind::HrvStatusSummary) {
            ParseTarget::Hrv
        } else if has(MessageKind::SleepAssessment) {
            ParseTarget::Sleep
        } else {
            ParseTarget::Activity
        }
    }

    pub fn consumes(&self, kind: MessageKind) -> bool {
        use MessageKind::*;
        match self {
            ParseTarget::Activity => matches!(
                kind,
                FileId | Session | Record | Lap | Split | Set | Workout | WorkoutStep
            ),
            ParseTarget::Monitoring => matches!(
                kind,
                MonitoringInfo | Monitoring | MonitoringHrData | StressLevel | RespirationRate
            ),
            ParseTarget::Hrv => matches!(kind, HrvStatusSummary | HrvValue),
            ParseTarget::Sleep => matches!(kind, SleepAssessment | SleepLevel),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParseTarget::Activity => "activity",
            ParseTarget::Monitoring => "monitoring",
            ParseTarget::Hrv => "hrv",
            ParseTarget::Sleep => "sleep",
        }
    }
}

/// Validated messages grouped by kind, each pool in stream order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePools {
    pub file_ids: Vec<FileIdMessage>,
    pub sessions: Vec<SessionMessage>,
    pub records: Vec<RecordMessage>,
    pub laps: Vec<LapMessage>,
    pub splits: Vec<SplitMessage>,
    pub sets: Vec<SetMessage>,
    pub workouts: Vec<WorkoutMessage>,
    pub workout_steps: Vec<WorkoutStepMessage>,

    pub monitoring_infos: Vec<MonitoringInfoMessage>,
    pub monitorings: Vec<MonitoringMessage>,
    pub hr_data: Vec<HrDataMessage>,
    pub stress_levels: Vec<StressLevelMessage>,
    pub respiration_rates: Vec<RespirationRateMessage>,

    pub hrv_summaries: Vec<HrvStatusSummaryMessage>,
    pub hrv_values: Vec<HrvValueMessage>,

    pub sleep_assessments: Vec<SleepAssessmentMessage>,
    pub sleep_levels: Vec<SleepLevelMessage>,
}

impl MessagePools {
    /// Validate every consumed message.
    ///
    /// Failures are collected in stream order. A fatal failure stops
    /// validation immediately and returns what was collected so far.
    pub fn collect(
        messages: &[MessageRecord],
        target: ParseTarget,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self, Vec<ParseError>> {
        let mut pools = Self::default();
        let mut errors = Vec::new();

        for message in messages {
            let Some(kind) = message.message_kind().filter(|k| target.consumes(*k)) else {
                diagnostics.message_skipped(&message.kind);
                continue;
            };

            if let Err(error) = pools.push(kind, &message.fields, target) {
                diagnostics.message_rejected(kind, &error);
                let fatal = error.is_fatal();
                errors.push(error);
                if fatal {
                    return Err(errors);
                }
            }
        }

        if errors.is_empty() {
            Ok(pools)
        } else {
            Err(errors)
        }
    }

    fn push(
        &mut self,
        kind: MessageKind,
        fields: &FieldMap,
        target: ParseTarget,
    ) -> Result<(), ParseError> {
        match kind {
            MessageKind::FileId => {
                let file_id = FileIdMessage::from_fields(fields)?;
                if target == ParseTarget::Activity && !file_id.is_activity() {
                    return Err(ParseError::UnsupportedFileType {
                        file_type: file_id.file_type,
                    });
                }
                self.file_ids.push(file_id);
            }
            MessageKind::Session => self.sessions.push(SessionMessage::from_fields(fields)?),
            MessageKind::Record => self.records.push(RecordMessage::from_fields(fields)?),
            MessageKind::Lap => self.laps.push(LapMessage::from_fields(fields)?),
            MessageKind::Split => self.splits.push(SplitMessage::from_fields(fields)?),
            MessageKind::Set => self.sets.push(SetMessage::from_fields(fields)?),
            MessageKind::Workout => self.workouts.push(WorkoutMessage::from_fields(fields)?),
            MessageKind::WorkoutStep => self
                .workout_steps
                .push(WorkoutStepMessage::from_fields(fields)?),
            MessageKind::MonitoringInfo => self
                .monitoring_infos
                .push(MonitoringInfoMessage::from_fields(fields)?),
            MessageKind::Monitoring => self
                .monitorings
                .push(MonitoringMessage::from_fields(fields)?),
            MessageKind::MonitoringHrData => self.hr_data.push(HrDataMessage::from_fields(fields)?),
            MessageKind::StressLevel => self
                .stress_levels
                .push(StressLevelMessage::from_fields(fields)?),
            MessageKind::RespirationRate => self
                .respiration_rates
                .push(RespirationRateMessage::from_fields(fields)?),
            MessageKind::HrvStatusSummary => self
                .hrv_summaries
                .push(HrvStatusSummaryMessage::from_fields(fields)?),
            MessageKind::HrvValue => self.hrv_values.push(HrvValueMessage::from_fields(fields)?),
            MessageKind::SleepAssessment => self
                .sleep_assessments
                .push(SleepAssessmentMessage::from_fields(fields)?),
            MessageKind::SleepLevel => self
                .sleep_levels
                .push(SleepLevelMessage::from_fields(fields)?),
        }
        Ok(())
    }

    /// Number of validated messages across all pools
    pub fn len(&self) -> usize {
        self.file_ids.len()
            + self.sessions.len()
            + self.records.len()
            + self.laps.len()
            + self.splits.len()
            + self.sets.len()
            + self.workouts.len()
            + self.workout_steps.len()
            + self.monitoring_infos.len()
            + self.monitorings.len()
            + self.hr_data.len()
            + self.stress_levels.len()
            + self.respiration_rates.len()
            + self.hrv_summaries.len()
            + self.hrv_values.len()
            + self.sleep_assessments.len()
            + self.sleep_levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
