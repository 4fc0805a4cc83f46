//! Source media access outside the algebra: length probing and remote fetch.

/// Download remote media into owned temporary files.
pub mod fetch;
/// Source length probing via `ffprobe`.
pub mod probe;
