//! Immutable references into source media files.
//!
//! A [`Fragment`] names a span `[start, start + length)` of a source file (source-file time
//! domain) together with the playback transforms applied to it. Its [`Fragment::duration`] is the
//! span as heard after the pitch factor (effective time domain).

/// Builder and serialized record for [`Fragment`].
pub mod builder;
/// Resolved (and optionally owned) source files.
pub mod source;

pub use builder::{FragmentBuilder, FragmentRecord};
pub use source::SourceFile;

use std::path::Path;
use std::sync::Arc;

/// Linear volume-ratio ramp applied at a fragment's entry (fade-in) or exit (fade-out).
///
/// `duration` is in the fragment's effective time domain. The identity envelope has both ratios
/// at `1.0` and zero duration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FadeEnvelope {
    /// Ratio at the beginning of the ramp.
    pub start_ratio: f64,
    /// Ratio at the end of the ramp.
    pub end_ratio: f64,
    /// Ramp length in seconds.
    pub duration: f64,
}

impl Default for FadeEnvelope {
    fn default() -> Self {
        Self {
            start_ratio: 1.0,
            end_ratio: 1.0,
            duration: 0.0,
        }
    }
}

impl FadeEnvelope {
    /// Return `true` when the envelope leaves the signal untouched.
    pub fn is_identity(&self) -> bool {
        self.duration == 0.0 && self.start_ratio == 1.0 && self.end_ratio == 1.0
    }

    /// Compound another ramp onto this one: ratios multiply, the duration is replaced.
    pub fn compound(self, start_ratio: f64, end_ratio: f64, duration: f64) -> Self {
        Self {
            start_ratio: self.start_ratio * start_ratio,
            end_ratio: self.end_ratio * end_ratio,
            duration,
        }
    }
}

/// A span of a source file plus playback transforms. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "FragmentRecord", into = "FragmentRecord")]
pub struct Fragment {
    pub(crate) source: Arc<SourceFile>,
    pub(crate) start: f64,
    pub(crate) length: f64,
    pub(crate) reverse: bool,
    pub(crate) pitch: f64,
    pub(crate) stretch: bool,
    pub(crate) pan: f64,
    pub(crate) volume: f64,
    pub(crate) fade_in: FadeEnvelope,
    pub(crate) fade_out: FadeEnvelope,
}

/// Result of [`Fragment::create`]: the carved fragment (if any) and the advanced fold state.
#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    /// Portion of the fragment covered by the requested region.
    pub fragment: Option<Fragment>,
    /// Offset into the next fragment where the region continues (effective domain).
    pub cursor: f64,
    /// Length of the region still to be collected (effective domain).
    pub remaining: f64,
}

impl Fragment {
    /// Start building a fragment. `filename`, `start` and `length` are required.
    pub fn builder() -> FragmentBuilder {
        FragmentBuilder::new()
    }

    /// Builder seeded with every attribute of this fragment, for copy-with-override edits.
    pub fn to_builder(&self) -> FragmentBuilder {
        FragmentBuilder::from_fragment(self)
    }

    /// Canonical absolute path of the source file.
    pub fn filename(&self) -> &Path {
        self.source.path()
    }

    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Offset into the source file in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Span read from the source file, in source-file seconds.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Alias of [`Fragment::length`]: the span before the pitch factor.
    pub fn original_duration(&self) -> f64 {
        self.length
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Playback rate in percent (100 = unmodified).
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn is_stretched(&self) -> bool {
        self.stretch
    }

    /// Stereo position in percent (0 = left, 50 = centre, 100 = right).
    pub fn pan(&self) -> f64 {
        self.pan
    }

    /// Linear gain in percent.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn fade_in(&self) -> FadeEnvelope {
        self.fade_in
    }

    pub fn fade_out(&self) -> FadeEnvelope {
        self.fade_out
    }

    pub fn fade_in_start_ratio(&self) -> f64 {
        self.fade_in.start_ratio
    }

    pub fn fade_in_end_ratio(&self) -> f64 {
        self.fade_in.end_ratio
    }

    pub fn fade_in_duration(&self) -> f64 {
        self.fade_in.duration
    }

    pub fn fade_out_start_ratio(&self) -> f64 {
        self.fade_out.start_ratio
    }

    pub fn fade_out_end_ratio(&self) -> f64 {
        self.fade_out.end_ratio
    }

    pub fn fade_out_duration(&self) -> f64 {
        self.fade_out.duration
    }

    /// Effective (playback) span: `length * 100 / pitch`.
    ///
    /// `pitch` must be non-zero; this is not checked.
    pub fn duration(&self) -> f64 {
        self.length * (100.0 / self.pitch)
    }

    /// Carve the part of this fragment covered by a region.
    ///
    /// `cursor` is where the region begins relative to this fragment's start and `remaining` is
    /// the region length still to collect, both in the effective domain. Meant to be folded
    /// left to right over a timeline, stopping once `remaining` reaches zero.
    pub fn create(&self, cursor: f64, remaining: f64) -> Cut {
        let duration = self.duration();
        if cursor >= duration {
            return Cut {
                fragment: None,
                cursor: cursor - duration,
                remaining,
            };
        }

        let (new_length, remaining) = if cursor + remaining >= duration {
            let new_length = duration - cursor;
            (new_length, remaining - new_length)
        } else {
            (remaining, 0.0)
        };

        let rate = self.pitch / 100.0;
        let fragment = Fragment {
            start: self.start + cursor * rate,
            length: new_length * rate,
            reverse: false,
            ..self.clone()
        };

        Cut {
            fragment: Some(fragment),
            cursor: 0.0,
            remaining,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fragment/fragment.rs"]
mod tests;
