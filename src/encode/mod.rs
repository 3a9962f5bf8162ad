//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order.

/// APNG sink built on [`crate::apng::builder::ApngBuilder`].
pub mod apng;
/// Generic frame sink trait.
pub mod sink;
/// Single-frame encoders whose output the container reuses.
pub mod still;
