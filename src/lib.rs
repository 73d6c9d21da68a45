//! fit-assembly - Validation and assembly of decoded FIT messages
//!
//! Takes the messages an external FIT decoder produced for one file and turns
//! them into a strongly-typed model through a deterministic pipeline:
//! target detection → per-kind validation → sport classification →
//! assembly.
//!
//! ## Outcomes
//!
//! - **Activity**: distance, climbing, strength or multisport activities
//! - **Monitoring**: one wellness day with steps, calories, heart rate and
//!   intensity minutes
//! - **HRV** and **Sleep**: overnight summaries with their samples
//!
//! Every parse returns exactly one [`ParseOutcome`]; failures are collected
//! into its `Error` variant.

pub mod activity;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hrv;
pub mod labels;
pub mod monitoring;
pub mod pipeline;
pub mod pools;
pub mod schema;
pub mod sleep;
pub mod sport;
pub mod types;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::ParseOptions;
pub use diagnostics::{Diagnostics, NoopDiagnostics, TracingDiagnostics};
pub use error::{InputError, ParseError};
pub use pipeline::{parse_messages, FitProcessor};
pub use pools::{MessagePools, ParseTarget};
pub use schema::{DecodedFile, FieldKey, FieldValue, MessageKind, MessageRecord};
pub use types::{Activity, HrvSession, MonitoringSession, ParseOutcome, SleepSession};

/// Crate version reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
