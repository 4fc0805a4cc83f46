//! Ordered fragment sequences and the editing algebra over them.
//!
//! Every operation here is pure: it reads one or more timelines and returns a new one. Fragments
//! are immutable and shared between the input and output timelines.

mod fade;
/// In-place accumulation and the `create` fold.
pub mod fold;

pub use fold::Accumulator;

use crate::foundation::error::{TapeError, TapeResult};
use crate::foundation::math::percent_to_factor;
use crate::fragment::{Fragment, SourceFile};
use crate::media::fetch::{FetchOpts, fetch};
use crate::media::probe::Ffprobe;
use crate::render::{RenderOptions, Renderer};
use fold::{MAX_FRAGMENTS, carve, map_fragments};
use std::path::Path;

/// Ordered sequence of [`Fragment`]s; order is playback order.
///
/// Serializes as a plain array of fragment records.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    pub(crate) fragments: Vec<Fragment>,
}

impl FromIterator<Fragment> for Timeline {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

impl From<Fragment> for Timeline {
    fn from(fragment: Fragment) -> Self {
        Self {
            fragments: vec![fragment],
        }
    }
}

impl Timeline {
    /// An empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a whole source file, probing its length with `ffprobe`.
    pub fn from_file(path: impl AsRef<Path>) -> TapeResult<Self> {
        Self::from_file_with_probe(path, &Ffprobe::default())
    }

    /// Wrap a whole source file, probing its length with the given prober.
    pub fn from_file_with_probe(path: impl AsRef<Path>, probe: &Ffprobe) -> TapeResult<Self> {
        let source = SourceFile::resolve(path)?;
        let length = probe.duration(source.path())?;
        Self::whole(source, length)
    }

    /// Wrap a whole source file whose length is already known.
    pub fn from_file_with_length(path: impl AsRef<Path>, length: f64) -> TapeResult<Self> {
        Self::whole(SourceFile::resolve(path)?, length)
    }

    /// Download `url` and wrap it. The downloaded file lives as long as any fragment using it.
    pub fn from_url(url: &str) -> TapeResult<Self> {
        Self::from_url_with(url, &FetchOpts::default(), &Ffprobe::default())
    }

    pub fn from_url_with(url: &str, opts: &FetchOpts, probe: &Ffprobe) -> TapeResult<Self> {
        let media = fetch(url, opts)?;
        let length = probe.duration(media.path())?;
        let source = SourceFile::owned(media.into_temp_path())?;
        tracing::debug!(url, length, path = %source.path().display(), "wrapped fetched media");
        Self::whole(source, length)
    }

    pub(crate) fn whole(source: std::sync::Arc<SourceFile>, length: f64) -> TapeResult<Self> {
        let fragment = Fragment::builder()
            .source(source)
            .start(0.0)
            .length(length)
            .build()?;
        Ok(Self::from(fragment))
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Total effective duration: the sum of fragment durations.
    pub fn duration(&self) -> f64 {
        self.fragments.iter().map(Fragment::duration).sum()
    }

    /// Time-stretch the whole timeline so that it lasts `duration` seconds.
    pub fn set_duration(&self, duration: f64) -> TapeResult<Self> {
        let current = self.duration();
        if current == 0.0 {
            return Err(TapeError::EmptyTimeline);
        }
        Ok(self.stretch(duration * 100.0 / current))
    }

    /// Region `[start, start + length)` of the timeline, clamped to `[0, duration())`.
    ///
    /// A negative `start` shortens the region by the part lying before the timeline.
    pub fn slice(&self, start: f64, length: f64) -> Self {
        let duration = self.duration();
        let (start, length) = if start < 0.0 {
            (0.0, length + start)
        } else {
            (start, length)
        };
        let length = if start + length > duration {
            duration - start
        } else {
            length
        };
        carve(&self.fragments, start, length.max(0.0)).timeline
    }

    /// `self` followed by `other`.
    pub fn append(&self, other: &Timeline) -> Self {
        let mut acc = Accumulator::with_capacity(self.len() + other.len());
        acc.concat(self).concat(other);
        acc.finish()
    }

    /// The fragment sequence played `count` times.
    pub fn repeat(&self, count: usize) -> Self {
        if self.is_empty() {
            return Self::new();
        }
        let capacity = self
            .len()
            .checked_mul(count)
            .filter(|&n| n <= MAX_FRAGMENTS)
            .unwrap_or(0);
        let mut acc = Accumulator::with_capacity(capacity);
        for _ in 0..count {
            acc.concat(self);
        }
        acc.finish()
    }

    /// Split into `count` equal-width timelines.
    ///
    /// Widths are `duration() / count`; the last part may differ by floating-point drift.
    pub fn partition(&self, count: usize) -> Vec<Self> {
        if count == 0 {
            return Vec::new();
        }
        let width = self.duration() / count as f64;
        (0..count)
            .map(|i| self.slice(i as f64 * width, width))
            .collect()
    }

    /// Loop the timeline until it lasts `duration` seconds, cutting the last pass short.
    pub fn fill(&self, duration: f64) -> TapeResult<Self> {
        let own = self.duration();
        if own == 0.0 {
            return Err(TapeError::EmptyTimeline);
        }
        let duration = duration.max(0.0);
        let loops = (duration / own).floor();
        let fits = loops < MAX_FRAGMENTS as f64
            && self
                .len()
                .checked_mul(loops as usize + 1)
                .is_some_and(|n| n <= MAX_FRAGMENTS);
        if !fits {
            return Err(TapeError::TooLong(format!(
                "filling {duration} seconds needs {loops} loops of {} fragments",
                self.len()
            )));
        }
        let loops = loops as usize;
        let remainder = duration % own;
        Ok(self.repeat(loops).append(&self.slice(0.0, remainder)))
    }

    /// Cut out `[start, start + length)` and put `replacement` in its place.
    ///
    /// Fails with [`TapeError::SpliceOutOfRange`] when `start` lies beyond the end; see
    /// [`Timeline::splice_padded`] to bridge the gap with silence instead.
    pub fn splice(&self, start: f64, length: f64, replacement: &Timeline) -> TapeResult<Self> {
        let duration = self.duration();
        if start > duration {
            return Err(TapeError::SpliceOutOfRange { start, duration });
        }
        Ok(self.assemble_splice(start, length, None, replacement))
    }

    /// Like [`Timeline::splice`], but a `start` beyond the end is reached by inserting silence
    /// produced by `renderer`.
    pub fn splice_padded(
        &self,
        start: f64,
        length: f64,
        replacement: &Timeline,
        renderer: &dyn Renderer,
    ) -> TapeResult<Self> {
        let duration = self.duration();
        let pad = if duration < start {
            Some(renderer.silence(start - duration)?)
        } else {
            None
        };
        Ok(self.assemble_splice(start, length, pad.as_ref(), replacement))
    }

    fn assemble_splice(
        &self,
        start: f64,
        length: f64,
        pad: Option<&Timeline>,
        replacement: &Timeline,
    ) -> Self {
        let duration = self.duration();
        let offset = start + length;

        let mut acc = Accumulator::new();
        acc.concat(&self.slice(0.0, start));
        if let Some(pad) = pad {
            acc.concat(pad);
        }
        acc.concat(replacement);
        if duration > offset {
            acc.concat(&self.slice(offset, duration - offset));
        }
        acc.finish()
    }

    /// Play the timeline backwards: fragment order is reversed and each fragment's read
    /// direction is inverted.
    pub fn reverse(&self) -> Self {
        map_fragments(&self.fragments, true, |f| Fragment {
            reverse: !f.reverse,
            ..f.clone()
        })
    }

    /// Reverse fragment order only; each fragment keeps its read direction.
    pub fn reverse_order(&self) -> Self {
        map_fragments(&self.fragments, true, Fragment::clone)
    }

    /// Multiply every fragment's pitch by `percent / 100` and set its stretch flag.
    pub fn pitch(&self, percent: f64, stretch: bool) -> Self {
        let factor = percent_to_factor(percent);
        map_fragments(&self.fragments, false, |f| Fragment {
            pitch: f.pitch * factor,
            stretch,
            ..f.clone()
        })
    }

    /// Make the timeline `percent`% as long, preserving tone through time-stretching.
    pub fn stretch(&self, percent: f64) -> Self {
        let pitch = 100.0 / percent_to_factor(percent);
        self.pitch(pitch, true)
    }

    /// Set every fragment's pan (0 = left, 50 = centre, 100 = right).
    pub fn pan(&self, percent: f64) -> Self {
        map_fragments(&self.fragments, false, |f| Fragment {
            pan: percent,
            ..f.clone()
        })
    }

    /// Set every fragment's volume in percent.
    pub fn volume(&self, percent: f64) -> Self {
        map_fragments(&self.fragments, false, |f| Fragment {
            volume: percent,
            ..f.clone()
        })
    }

    /// A timeline of pure silence lasting as long as this one.
    pub fn silence(&self, renderer: &dyn Renderer) -> TapeResult<Self> {
        renderer.silence(self.duration())
    }

    /// Render this timeline as a single track to `destination`.
    pub fn render_to(
        &self,
        destination: impl AsRef<Path>,
        opts: &RenderOptions,
        renderer: &dyn Renderer,
    ) -> TapeResult<()> {
        renderer.render(&[self.fragments()], destination.as_ref(), opts)
    }
}

/// Render several timelines as parallel tracks mixed into one file.
pub fn mix(
    timelines: &[Timeline],
    destination: impl AsRef<Path>,
    opts: &RenderOptions,
    renderer: &dyn Renderer,
) -> TapeResult<()> {
    let tracks: Vec<&[Fragment]> = timelines.iter().map(Timeline::fragments).collect();
    renderer.render(&tracks, destination.as_ref(), opts)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
