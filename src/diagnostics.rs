//! Diagnostics sink for the assembly pipeline
//!
//! The library never installs a subscriber. Stages report through a
//! [`Diagnostics`] handle passed in by the caller; [`TracingDiagnostics`]
//! forwards to `tracing` events and [`NoopDiagnostics`] discards everything.

use crate::error::ParseError;
use crate::schema::MessageKind;

pub trait Diagnostics {
    /// A message failed validation
    fn message_rejected(&self, kind: MessageKind, error: &ParseError);

    /// A message was skipped without validation (unknown or unused kind)
    fn message_skipped(&self, kind: &str);

    /// A pipeline stage finished
    fn stage(&self, stage: &'static str, detail: &str);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn message_rejected(&self, kind: MessageKind, error: &ParseError) {
        tracing::warn!(kind = kind.as_str(), "rejected message: {}", error);
    }

    fn message_skipped(&self, kind: &str) {
        tracing::trace!(kind, "skipped message");
    }

    fn stage(&self, stage: &'static str, detail: &str) {
        tracing::debug!(stage, "{}", detail);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn message_rejected(&self, _kind: MessageKind, _error: &ParseError) {}

    fn message_skipped(&self, _kind: &str) {}

    fn stage(&self, _stage: &'static str, _detail: &str) {}
}
