use crate::foundation::error::{TapeError, TapeResult};
use crate::render::command::Tool;
use std::path::{Path, PathBuf};

/// Reads source durations through `ffprobe`.
#[derive(Clone, Debug)]
pub struct Ffprobe {
    tool: Tool,
}

impl Default for Ffprobe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl Ffprobe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            tool: Tool::new(program),
        }
    }

    pub fn program(&self) -> &Path {
        self.tool.program()
    }

    /// Duration of `path` in seconds, as reported in the container format section.
    #[tracing::instrument(skip(self))]
    pub fn duration(&self, path: &Path) -> TapeResult<f64> {
        let mut args: Vec<std::ffi::OsString> = vec![
            "-v".into(),
            "error".into(),
            "-print_format".into(),
            "json".into(),
            "-show_format".into(),
        ];
        args.push(path.as_os_str().to_owned());
        let stdout = self.tool.run(&args)?;
        parse_duration(&stdout).map_err(|e| match e {
            TapeError::Probe(msg) => TapeError::probe(format!("'{}': {msg}", path.display())),
            other => other,
        })
    }
}

/// Extract `format.duration` from `ffprobe -print_format json -show_format` output.
pub fn parse_duration(json: &[u8]) -> TapeResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| TapeError::probe(format!("ffprobe json parse failed: {e}")))?;
    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| TapeError::probe("ffprobe reported no duration"))?;
    let duration: f64 = raw
        .trim()
        .parse()
        .map_err(|_| TapeError::probe(format!("invalid duration '{raw}'")))?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(TapeError::probe(format!("invalid duration '{raw}'")));
    }
    Ok(duration)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
