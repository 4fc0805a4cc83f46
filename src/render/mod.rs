//! Rendering: turning per-track fragment sequences into an audio file.
//!
//! The algebra never decodes audio itself. It hands [`Fragment`](crate::Fragment) sequences to a
//! [`Renderer`], which does the cutting, stretching, mixing and encoding.

/// Thin wrapper around external tool invocation.
pub(crate) mod command;
/// `ffmpeg`-backed renderer.
pub mod ffmpeg;
/// Filter-graph construction for [`ffmpeg::FfmpegRenderer`].
pub mod filter;
/// Renderer trait, options, and the in-memory recording renderer.
pub mod renderer;

pub use ffmpeg::{FfmpegRenderer, FfmpegRendererOpts};
pub use renderer::{RecordedRender, RecordingRenderer, RenderOptions, Renderer, prepare_destination};
