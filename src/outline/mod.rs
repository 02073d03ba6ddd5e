//! Outline intake: repair and normalization of generator output
//!
//! The outline generator returns either raw text (to be repaired and
//! parsed) or an already-structured sequence. Everything in this module
//! exists to fold both into one canonical `Vec<Slide>` before any
//! downstream code runs.

mod normalize;
mod repair;

pub use normalize::{NormalizeError, NormalizeOptions, normalize};
pub use repair::repair_and_parse;

/// Raw, untrusted generator output
///
/// Ephemeral; exists only for the duration of one compilation request.
#[derive(Debug, Clone)]
pub enum RawOutline {
    /// Free text that may or may not contain a JSON array
    Text(String),
    /// A sequence the caller already parsed
    Structured(Vec<serde_json::Value>),
}
