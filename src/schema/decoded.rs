//! Decoder output container

use serde::{Deserialize, Serialize};

use super::field::MessageRecord;
use crate::error::InputError;

/// Everything the external decoder produced for one FIT file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedFile {
    /// Messages in stream order
    pub messages: Vec<MessageRecord>,
    /// Decoder-level failures; any entry turns the parse into an error
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecodedJson {
    File(DecodedFile),
    Messages(Vec<MessageRecord>),
}

impl DecodedFile {
    pub fn new(messages: Vec<MessageRecord>) -> Self {
        Self {
            messages,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    /// Parse a JSON document: either `{"messages": [...], "errors": [...]}`
    /// or a bare array of messages
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let decoded = match serde_json::from_str::<DecodedJson>(json)? {
            DecodedJson::File(file) => file,
            DecodedJson::Messages(messages) => Self::new(messages),
        };
        Ok(decoded)
    }

    /// Parse NDJSON with one message per line; blank lines are skipped
    pub fn from_ndjson(ndjson: &str) -> Result<Self, InputError> {
        let mut messages = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let message = serde_json::from_str::<MessageRecord>(trimmed).map_err(|source| {
                InputError::Line {
                    line: line_num + 1,
                    source,
                }
            })?;
            messages.push(message);
        }
        Ok(Self::new(messages))
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
