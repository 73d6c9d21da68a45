//! Decoded FIT message schema
//!
//! Raw messages as handed over by the external decoder, the closed set of
//! message kinds, and the typed messages built from them after validation.

mod decoded;
mod field;
mod kind;
mod messages;

pub use decoded::*;
pub use field::*;
pub use kind::*;
pub use messages::*;
