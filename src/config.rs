//! Parse options

use chrono::{FixedOffset, Local, Offset, Utc};

use crate::error::InputError;

/// Environment variable holding the wearer's UTC offset (`+HH:MM`)
pub const UTC_OFFSET_ENV: &str = "FIT_UTC_OFFSET";

/// Options shared by all assemblers of one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Offset used to reconstruct local wall-clock time in monitoring files
    pub utc_offset: FixedOffset,
}

/// Defaults to the host's current offset
impl Default for ParseOptions {
    fn default() -> Self {
        Self::local()
    }
}

impl ParseOptions {
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    /// Use the host's current UTC offset
    pub fn local() -> Self {
        Self {
            utc_offset: *Local::now().offset(),
        }
    }

    pub fn from_env() -> Result<Self, InputError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Read options through `get` so tests never touch the process environment.
    /// An unset variable falls back to the host's offset.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, InputError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        match get(UTC_OFFSET_ENV) {
            Some(raw) => Ok(Self::new(parse_utc_offset(&raw)?)),
            None => Ok(Self::default()),
        }
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM`, `Z` or `UTC`
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, InputError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    value
        .parse::<FixedOffset>()
        .map_err(|_| InputError::InvalidOffset(raw.to_string()))
}
