//! Error types for fit-assembly

use crate::schema::MessageKind;
use serde::Serialize;
use thiserror::Error;

/// Failures raised while validating decoded messages or assembling a result.
///
/// A parse that hits any of these ends as [`crate::ParseOutcome::Error`]
/// carrying every failure collected so far, in stream order.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ParseError {
    #[error("Incomplete data to build '{kind}' message, missing: {}", .fields.join(", "))]
    MissingField {
        kind: MessageKind,
        fields: Vec<String>,
    },

    #[error("Invalid value for '{field}' in '{kind}' message")]
    InvalidField { kind: MessageKind, field: String },

    #[error("The FIT file '{file_type}' is not supported")]
    UnsupportedFileType { file_type: String },

    #[error("Not found 'session' into FIT file")]
    NoSession,

    #[error("Not found '{kind}' into FIT file")]
    NotFound { kind: MessageKind },

    #[error("The FIT file describes a not supported sport: {sport} ({sub_sport})")]
    UnsupportedSport { sport: String, sub_sport: String },

    #[error("Unexpected '{kind}' data: {detail}")]
    UnexpectedCount { kind: MessageKind, detail: String },

    #[error("Decoder error: {message}")]
    Decoder { message: String },
}

impl ParseError {
    /// Fatal failures stop message validation on the spot.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::UnsupportedFileType { .. })
    }

    /// Message kind the failure refers to, if any
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            ParseError::MissingField { kind, .. }
            | ParseError::InvalidField { kind, .. }
            | ParseError::NotFound { kind }
            | ParseError::UnexpectedCount { kind, .. } => Some(*kind),
            ParseError::UnsupportedFileType { .. } => Some(MessageKind::FileId),
            ParseError::NoSession | ParseError::UnsupportedSport { .. } => {
                Some(MessageKind::Session)
            }
            ParseError::Decoder { .. } => None,
        }
    }

    pub(crate) fn expected_one(kind: MessageKind, count: usize) -> Self {
        ParseError::UnexpectedCount {
            kind,
            detail: format!("expected one message per file but got {count} messages"),
        }
    }
}

/// Errors reading decoded messages or configuration from text
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_lists_fields() {
        let err = ParseError::MissingField {
            kind: MessageKind::Session,
            fields: vec!["sport".to_string(), "sub_sport".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Incomplete data to build 'session' message, missing: sport, sub_sport"
        );
    }

    #[test]
    fn test_serialized_error_is_tagged() {
        let err = ParseError::NotFound {
            kind: MessageKind::MonitoringInfo,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["kind"], "monitoring_info");
    }

    #[test]
    fn test_only_file_type_errors_are_fatal() {
        assert!(ParseError::UnsupportedFileType {
            file_type: "segment".to_string()
        }
        .is_fatal());
        assert!(!ParseError::NoSession.is_fatal());
    }
}
