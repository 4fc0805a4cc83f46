use crate::foundation::error::{TapeError, TapeResult};
use crate::fragment::{Fragment, SourceFile};
use crate::timeline::Timeline;
use anyhow::Context as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Options for a single render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Replace the destination if it already exists.
    pub overwrite: bool,
    /// Target bitrate for compressed destinations (e.g. `"128k"`).
    pub bitrate: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            bitrate: "128k".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }
}

/// Renderer contract consumed by the timeline algebra.
///
/// Implementations extract `[start, start + length)` of each fragment's source (source-file
/// time), honour reverse, pitch/stretch, volume, pan and the fade envelopes, place fragments
/// back to back in track order, and mix all tracks into `destination`.
pub trait Renderer: Send + Sync {
    /// Render `tracks` (each an ordered fragment sequence) into one file at `destination`.
    fn render(
        &self,
        tracks: &[&[Fragment]],
        destination: &Path,
        opts: &RenderOptions,
    ) -> TapeResult<()>;

    /// Produce a timeline of pure silence lasting `duration` seconds.
    ///
    /// The generated file is owned by the returned timeline's fragments.
    fn silence(&self, duration: f64) -> TapeResult<Timeline>;
}

/// Shared destination checks run before any rendering work.
///
/// Fails with [`TapeError::EmptyTimeline`] when there is nothing audible to render and with
/// [`TapeError::DestinationExists`] when the file exists and `overwrite` is off. With overwrite
/// the existing file is removed. Missing parent directories are created.
pub fn prepare_destination(
    tracks: &[&[Fragment]],
    destination: &Path,
    opts: &RenderOptions,
) -> TapeResult<()> {
    let total: f64 = tracks
        .iter()
        .flat_map(|t| t.iter())
        .map(Fragment::duration)
        .sum();
    if tracks.iter().all(|t| t.is_empty()) || total <= 0.0 {
        return Err(TapeError::EmptyTimeline);
    }

    if destination.exists() {
        if !opts.overwrite {
            return Err(TapeError::DestinationExists(destination.to_path_buf()));
        }
        std::fs::remove_file(destination)
            .with_context(|| format!("failed to remove '{}'", destination.display()))?;
    }

    ensure_parent_dir(destination)
}

/// Ensure the parent directory of `path` exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> TapeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// One call captured by [`RecordingRenderer`].
#[derive(Clone, Debug)]
pub struct RecordedRender {
    /// Destination that was requested.
    pub destination: PathBuf,
    /// Tracks in the order they were given.
    pub tracks: Vec<Vec<Fragment>>,
    /// Options that were passed.
    pub opts: RenderOptions,
}

/// In-memory renderer for tests and debugging.
///
/// Applies the same destination checks as a real renderer, writes an empty placeholder file at
/// the destination, and records what it was asked to render.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    renders: Mutex<Vec<RecordedRender>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every render performed so far.
    pub fn renders(&self) -> Vec<RecordedRender> {
        self.renders
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Renderer for RecordingRenderer {
    fn render(
        &self,
        tracks: &[&[Fragment]],
        destination: &Path,
        opts: &RenderOptions,
    ) -> TapeResult<()> {
        prepare_destination(tracks, destination, opts)?;
        std::fs::File::create(destination)
            .with_context(|| format!("failed to create '{}'", destination.display()))?;

        let record = RecordedRender {
            destination: destination.to_path_buf(),
            tracks: tracks.iter().map(|t| t.to_vec()).collect(),
            opts: opts.clone(),
        };
        match self.renders.lock() {
            Ok(mut renders) => renders.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        Ok(())
    }

    fn silence(&self, duration: f64) -> TapeResult<Timeline> {
        if duration <= 0.0 {
            return Ok(Timeline::new());
        }
        let file = tempfile::Builder::new()
            .prefix("silence")
            .suffix(".wav")
            .tempfile()
            .context("failed to create silence placeholder")?;
        Timeline::whole(SourceFile::owned(file.into_temp_path())?, duration)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
