use crate::foundation::error::{TapeError, TapeResult};
use crate::fragment::{FadeEnvelope, Fragment, SourceFile};
use std::path::PathBuf;
use std::sync::Arc;

enum SourceSpec {
    Path(PathBuf),
    Resolved(Arc<SourceFile>),
}

/// Builder for [`Fragment`].
///
/// Produces a fully populated, immutable fragment in one step. Unset optional attributes take
/// their neutral defaults (no reverse, pitch 100, no stretch, pan 50, volume 100, identity fades).
pub struct FragmentBuilder {
    source: Option<SourceSpec>,
    start: Option<f64>,
    length: Option<f64>,
    reverse: bool,
    pitch: f64,
    stretch: bool,
    pan: f64,
    volume: f64,
    fade_in: FadeEnvelope,
    fade_out: FadeEnvelope,
}

impl Default for FragmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            source: None,
            start: None,
            length: None,
            reverse: false,
            pitch: 100.0,
            stretch: false,
            pan: 50.0,
            volume: 100.0,
            fade_in: FadeEnvelope::default(),
            fade_out: FadeEnvelope::default(),
        }
    }

    pub(crate) fn from_fragment(f: &Fragment) -> Self {
        Self {
            source: Some(SourceSpec::Resolved(Arc::clone(&f.source))),
            start: Some(f.start),
            length: Some(f.length),
            reverse: f.reverse,
            pitch: f.pitch,
            stretch: f.stretch,
            pan: f.pan,
            volume: f.volume,
            fade_in: f.fade_in,
            fade_out: f.fade_out,
        }
    }

    /// Source file path; resolved when [`FragmentBuilder::build`] runs.
    pub fn filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(SourceSpec::Path(path.into()));
        self
    }

    /// Use an already resolved source.
    pub fn source(mut self, source: Arc<SourceFile>) -> Self {
        self.source = Some(SourceSpec::Resolved(source));
        self
    }

    pub fn start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn pan(mut self, pan: f64) -> Self {
        self.pan = pan;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn fade_in(mut self, fade: FadeEnvelope) -> Self {
        self.fade_in = fade;
        self
    }

    pub fn fade_out(mut self, fade: FadeEnvelope) -> Self {
        self.fade_out = fade;
        self
    }

    /// Validate and produce the fragment.
    pub fn build(self) -> TapeResult<Fragment> {
        let source = match self.source {
            Some(SourceSpec::Resolved(source)) => source,
            Some(SourceSpec::Path(path)) => SourceFile::resolve(path)?,
            None => return Err(TapeError::construction("missing filename argument")),
        };
        let start = self
            .start
            .ok_or_else(|| TapeError::construction("missing start argument"))?;
        let length = self
            .length
            .ok_or_else(|| TapeError::construction("missing length argument"))?;

        if !start.is_finite() || start < 0.0 {
            return Err(TapeError::construction(format!(
                "start must be a finite, non-negative number of seconds (got {start})"
            )));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(TapeError::construction(format!(
                "length must be a finite, non-negative number of seconds (got {length})"
            )));
        }

        Ok(Fragment {
            source,
            start,
            length,
            reverse: self.reverse,
            pitch: self.pitch,
            stretch: self.stretch,
            pan: self.pan,
            volume: self.volume,
            fade_in: self.fade_in,
            fade_out: self.fade_out,
        })
    }
}

/// Plain serialized form of a [`Fragment`]. Loading re-runs construction checks.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FragmentRecord {
    /// Source file path.
    pub filename: PathBuf,
    /// Offset into the source file in seconds.
    pub start: f64,
    /// Span in source-file seconds.
    pub length: f64,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    #[serde(default)]
    pub stretch: bool,
    #[serde(default = "default_pan")]
    pub pan: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub fade_in: FadeEnvelope,
    #[serde(default)]
    pub fade_out: FadeEnvelope,
}

fn default_pitch() -> f64 {
    100.0
}

fn default_pan() -> f64 {
    50.0
}

fn default_volume() -> f64 {
    100.0
}

impl TryFrom<FragmentRecord> for Fragment {
    type Error = TapeError;

    fn try_from(r: FragmentRecord) -> TapeResult<Self> {
        Fragment::builder()
            .filename(r.filename)
            .start(r.start)
            .length(r.length)
            .reverse(r.reverse)
            .pitch(r.pitch)
            .stretch(r.stretch)
            .pan(r.pan)
            .volume(r.volume)
            .fade_in(r.fade_in)
            .fade_out(r.fade_out)
            .build()
    }
}

impl From<Fragment> for FragmentRecord {
    fn from(f: Fragment) -> Self {
        Self {
            filename: f.filename().to_path_buf(),
            start: f.start,
            length: f.length,
            reverse: f.reverse,
            pitch: f.pitch,
            stretch: f.stretch,
            pan: f.pan,
            volume: f.volume,
            fade_in: f.fade_in,
            fade_out: f.fade_out,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fragment/builder.rs"]
mod tests;
