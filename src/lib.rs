//! Tapecut is an editing algebra for audio timelines.
//!
//! A [`Timeline`] is an ordered list of immutable [`Fragment`]s, each a span of some source file
//! plus playback transforms. Editing never touches audio: slicing, looping, splicing, pitching and
//! fading only rearrange references. Audio is produced once, at the end, by a [`Renderer`]:
//!
//! - Wrap sources with [`Timeline::from_file`] or [`Timeline::from_url`]
//! - Compose with the pure operations on [`Timeline`]
//! - Render with [`Timeline::render_to`] or [`mix`] through an [`FfmpegRenderer`]
#![forbid(unsafe_code)]

pub mod foundation;
pub mod fragment;
pub mod media;
pub mod render;
pub mod timeline;

pub use crate::foundation::error::{TapeError, TapeResult};
pub use crate::fragment::{
    Cut, FadeEnvelope, Fragment, FragmentBuilder, FragmentRecord, SourceFile,
};
pub use crate::media::fetch::{FetchOpts, FetchedMedia, extension_for_content_type, fetch};
pub use crate::media::probe::Ffprobe;
pub use crate::render::{
    FfmpegRenderer, FfmpegRendererOpts, RecordedRender, RecordingRenderer, RenderOptions,
    Renderer,
};
pub use crate::timeline::{Accumulator, Timeline, mix};
