//! Shared error type and numeric helpers.

/// Error taxonomy and result alias.
pub mod error;
/// Floating-point helpers for time-domain arithmetic.
pub mod math;
