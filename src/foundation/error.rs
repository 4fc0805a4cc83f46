use std::path::PathBuf;

/// Result alias used across the crate.
pub type TapeResult<T> = Result<T, TapeError>;

/// Every failure the algebra, the renderer, or the fetcher can surface.
///
/// Nothing is retried or recovered locally; errors propagate to the caller unchanged.
#[derive(thiserror::Error, Debug)]
pub enum TapeError {
    /// A fragment could not be built (missing attribute or unresolvable source file).
    #[error("construction error: {0}")]
    Construction(String),

    /// Rendering or filling a timeline with no fragments or zero duration.
    #[error("empty timeline")]
    EmptyTimeline,

    /// Render destination already exists and overwrite was not requested.
    #[error("destination '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    /// A required external tool is not installed or not on `PATH`.
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// An external tool exited unsuccessfully.
    #[error("command failed: {command}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Probe output could not be interpreted.
    #[error("probe error: {0}")]
    Probe(String),

    /// Remote media was served with a content type that maps to no known extension.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Transport failure while fetching remote media.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Splice position lies beyond the end of the timeline.
    #[error("splice start {start} is beyond timeline duration {duration}")]
    SpliceOutOfRange {
        /// Requested splice start.
        start: f64,
        /// Duration of the timeline being spliced.
        duration: f64,
    },

    /// An operation would build a timeline with more fragments than memory can address.
    #[error("timeline too long: {0}")]
    TooLong(String),

    /// (De)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TapeError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<reqwest::Error> for TapeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Fetch(e.to_string())
    }
}

impl From<serde_json::Error> for TapeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
