//! Pipeline orchestration
//!
//! This module provides the public entry points of fit-assembly. It takes
//! the decoder output for one file through validation and assembly and
//! always answers with a single [`ParseOutcome`].

use crate::activity;
use crate::config::ParseOptions;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::ParseError;
use crate::hrv;
use crate::labels::{LabelTable, HRV_STATUS, SLEEP_LEVEL};
use crate::monitoring;
use crate::pools::{MessagePools, ParseTarget};
use crate::schema::{DecodedFile, MessageRecord};
use crate::sleep;
use crate::types::ParseOutcome;

/// Parse decoded messages with default options.
///
/// # Arguments
/// * `messages` - Decoded messages in stream order
/// * `decoder_errors` - Failures reported by the decoder; any entry makes the
///   outcome an error
///
/// # Example
/// ```ignore
/// let outcome = parse_messages(decoded.messages, decoded.errors);
/// if let ParseOutcome::Activity(activity) = outcome { ... }
/// ```
pub fn parse_messages(messages: Vec<MessageRecord>, decoder_errors: Vec<String>) -> ParseOutcome {
    FitProcessor::default().parse(&DecodedFile::new(messages).with_errors(decoder_errors))
}

/// Configured parser for decoded FIT files.
///
/// Holds only immutable settings, so one processor can parse any number of
/// files.
pub struct FitProcessor {
    options: ParseOptions,
    hrv_statuses: LabelTable,
    sleep_levels: LabelTable,
    diagnostics: Box<dyn Diagnostics>,
}

impl Default for FitProcessor {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl FitProcessor {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            hrv_statuses: HRV_STATUS,
            sleep_levels: SLEEP_LEVEL,
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Resolve HRV status codes through a different table
    pub fn with_hrv_statuses(mut self, table: LabelTable) -> Self {
        self.hrv_statuses = table;
        self
    }

    /// Resolve sleep level codes through a different table
    pub fn with_sleep_levels(mut self, table: LabelTable) -> Self {
        self.sleep_levels = table;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a file, inferring what it holds from its anchor messages
    pub fn parse(&self, file: &DecodedFile) -> ParseOutcome {
        self.parse_as(ParseTarget::detect(&file.messages), file)
    }

    /// Parse a file as `target`.
    ///
    /// Pipeline stages:
    /// 1. Decoder errors short-circuit to an error outcome
    /// 2. Consumed messages are validated into typed pools
    /// 3. The target's assembler builds the model
    pub fn parse_as(&self, target: ParseTarget, file: &DecodedFile) -> ParseOutcome {
        if file.has_errors() {
            return ParseOutcome::Error(decoder_errors(file));
        }

        let pools = match MessagePools::collect(&file.messages, target, self.diagnostics.as_ref()) {
            Ok(pools) => pools,
            Err(errors) => {
                self.diagnostics.stage(
                    "validate",
                    &format!("{} message(s) failed validation", errors.len()),
                );
                return ParseOutcome::Error(errors);
            }
        };
        self.diagnostics.stage(
            "validate",
            &format!("{} {} message(s) validated", pools.len(), target.as_str()),
        );

        let assembled = match target {
            ParseTarget::Activity => activity::assemble(&pools).map(ParseOutcome::Activity),
            ParseTarget::Monitoring => {
                monitoring::aggregate(&pools, &self.options).map(ParseOutcome::Monitoring)
            }
            ParseTarget::Hrv => hrv::assemble_with(&pools, &self.hrv_statuses).map(ParseOutcome::Hrv),
            ParseTarget::Sleep => {
                sleep::assemble_with(&pools, &self.sleep_levels).map(ParseOutcome::Sleep)
            }
        };

        match assembled {
            Ok(outcome) => {
                self.diagnostics.stage("assemble", outcome.variant_name());
                outcome
            }
            Err(error) => {
                self.diagnostics.stage("assemble", &error.to_string());
                ParseOutcome::Error(vec![error])
            }
        }
    }

    /// Message-level failures of a file without assembling it
    pub fn validate(&self, target: ParseTarget, file: &DecodedFile) -> Vec<ParseError> {
        if file.has_errors() {
            return decoder_errors(file);
        }
        MessagePools::collect(&file.messages, target, self.diagnostics.as_ref())
            .err()
            .unwrap_or_default()
    }
}

fn decoder_errors(file: &DecodedFile) -> Vec<ParseError> {
    file.errors
        .iter()
        .map(|message| ParseError::Decoder {
            message: message.clone(),
        })
        .collect()
}
