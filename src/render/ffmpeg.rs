use crate::foundation::error::TapeResult;
use crate::fragment::{Fragment, SourceFile};
use crate::media::probe::Ffprobe;
use crate::render::command::Tool;
use crate::render::filter::{ChainSettings, fragment_chain, mix_graph};
use crate::render::renderer::{RenderOptions, Renderer, prepare_destination};
use crate::timeline::Timeline;
use anyhow::Context as _;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default cap on inputs handed to one `ffmpeg` mixing invocation.
pub const DEFAULT_MAX_INPUTS_PER_MIX: usize = 28;

/// Options for [`FfmpegRenderer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FfmpegRendererOpts {
    /// `ffmpeg` executable (name on `PATH` or explicit path).
    pub ffmpeg: PathBuf,
    /// `ffprobe` executable.
    pub ffprobe: PathBuf,
    /// Working sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count of the final output.
    pub channels: u16,
    /// Maximum simultaneous inputs per mixing invocation; longer tracks are mixed in chained
    /// batches.
    pub max_inputs_per_mix: usize,
}

impl Default for FfmpegRendererOpts {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            sample_rate: 44_100,
            channels: 2,
            max_inputs_per_mix: DEFAULT_MAX_INPUTS_PER_MIX,
        }
    }
}

/// One `ffmpeg` invocation mixing up to `max_inputs_per_mix` inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct MixBatch {
    /// Positions of the inputs (audible fragments or track files) mixed in this batch.
    pub inputs: Vec<usize>,
    /// Whether the previous batch's output is carried in as input 0.
    pub carries_partial: bool,
}

/// Group `count` fragments into batches so no invocation exceeds `max_inputs` inputs, counting
/// the carried partial mix of the previous batch as one.
pub fn plan_batches(count: usize, max_inputs: usize) -> Vec<MixBatch> {
    let max_inputs = max_inputs.max(2);
    let mut batches = Vec::new();
    let mut next = 0;
    while next < count {
        let carries_partial = !batches.is_empty();
        let room = max_inputs - usize::from(carries_partial);
        let end = (next + room).min(count);
        batches.push(MixBatch {
            inputs: (next..end).collect(),
            carries_partial,
        });
        next = end;
    }
    batches
}

/// Renderer that drives the system `ffmpeg` binary.
///
/// Each track is rendered to a WAV in a scratch directory by per-fragment filter chains placed at
/// their timeline offsets, tracks are mixed, and the mix is converted to the destination format
/// unless the destination is itself a WAV.
#[derive(Clone, Debug)]
pub struct FfmpegRenderer {
    opts: FfmpegRendererOpts,
    ffmpeg: Tool,
}

impl FfmpegRenderer {
    /// Create a renderer, failing with `CommandNotFound` when `ffmpeg` or `ffprobe` is missing.
    pub fn new(opts: FfmpegRendererOpts) -> TapeResult<Self> {
        let ffmpeg = Tool::new(opts.ffmpeg.clone());
        ffmpeg.ensure_available()?;
        Tool::new(opts.ffprobe.clone()).ensure_available()?;
        Ok(Self { opts, ffmpeg })
    }

    pub fn opts(&self) -> &FfmpegRendererOpts {
        &self.opts
    }

    /// Prober using the configured `ffprobe`.
    pub fn probe(&self) -> Ffprobe {
        Ffprobe::new(self.opts.ffprobe.clone())
    }

    fn settings(&self) -> ChainSettings {
        ChainSettings {
            sample_rate: self.opts.sample_rate,
        }
    }

    fn wav_output_args(&self, out: &Path) -> Vec<OsString> {
        vec![
            "-ar".into(),
            self.opts.sample_rate.to_string().into(),
            "-ac".into(),
            "2".into(),
            "-c:a".into(),
            "pcm_s16le".into(),
            out.as_os_str().to_owned(),
        ]
    }

    /// Render one track's fragments, back to back, into `out`.
    fn join_fragments(&self, fragments: &[Fragment], out: &Path, scratch: &Path) -> TapeResult<()> {
        let mut positions = Vec::with_capacity(fragments.len());
        let mut position = 0.0;
        for f in fragments {
            positions.push(position);
            position += f.duration();
        }

        let audible: Vec<usize> = (0..fragments.len())
            .filter(|&i| fragments[i].length() > 0.0)
            .collect();
        let batches = plan_batches(audible.len(), self.opts.max_inputs_per_mix);
        let stem = out
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "track".to_string());

        let mut partial: Option<PathBuf> = None;
        for (n, batch) in batches.iter().enumerate() {
            let target = if n + 1 == batches.len() {
                out.to_path_buf()
            } else {
                scratch.join(format!("{stem}_part{n}.wav"))
            };

            let mut args: Vec<OsString> = vec!["-v".into(), "error".into(), "-y".into()];
            if batch.carries_partial
                && let Some(p) = partial.as_ref()
            {
                args.push("-i".into());
                args.push(p.as_os_str().to_owned());
            }
            let mut chains = Vec::with_capacity(batch.inputs.len());
            for &k in &batch.inputs {
                let idx = audible[k];
                let fragment = &fragments[idx];
                args.push("-i".into());
                args.push(fragment.filename().as_os_str().to_owned());
                chains.push(fragment_chain(fragment, positions[idx], self.settings()));
            }

            args.push("-filter_complex".into());
            args.push(mix_graph(&chains, batch.carries_partial).into());
            args.push("-map".into());
            args.push("[out]".into());
            args.extend(self.wav_output_args(&target));

            self.ffmpeg.run(&args)?;
            partial = Some(target);
        }
        Ok(())
    }

    /// Mix rendered track files into `out`, in chained batches when there are many tracks.
    fn mix_files(&self, tracks: &[PathBuf], out: &Path, scratch: &Path) -> TapeResult<()> {
        if let [single] = tracks {
            std::fs::copy(single, out).with_context(|| {
                format!("failed to copy '{}' to '{}'", single.display(), out.display())
            })?;
            return Ok(());
        }

        let batches = plan_batches(tracks.len(), self.opts.max_inputs_per_mix);
        let mut partial: Option<PathBuf> = None;
        for (n, batch) in batches.iter().enumerate() {
            let target = if n + 1 == batches.len() {
                out.to_path_buf()
            } else {
                scratch.join(format!("mix_part{n}.wav"))
            };

            let mut args: Vec<OsString> = vec!["-v".into(), "error".into(), "-y".into()];
            let mut inputs = Vec::with_capacity(batch.inputs.len() + 1);
            if batch.carries_partial
                && let Some(p) = partial.as_ref()
            {
                inputs.push(p.clone());
            }
            inputs.extend(batch.inputs.iter().map(|&k| tracks[k].clone()));

            let mut labels = String::new();
            for (i, input) in inputs.iter().enumerate() {
                args.push("-i".into());
                args.push(input.as_os_str().to_owned());
                labels.push_str(&format!("[{i}:a]"));
            }
            let graph = if inputs.len() == 1 {
                format!("{labels}anull[out]")
            } else {
                format!(
                    "{labels}amix=inputs={}:duration=longest:dropout_transition=0:normalize=0[out]",
                    inputs.len()
                )
            };
            args.push("-filter_complex".into());
            args.push(graph.into());
            args.push("-map".into());
            args.push("[out]".into());
            args.extend(self.wav_output_args(&target));

            self.ffmpeg.run(&args)?;
            partial = Some(target);
        }
        Ok(())
    }

    fn export(&self, mixed: &Path, destination: &Path, opts: &RenderOptions) -> TapeResult<()> {
        let is_wav = destination
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if is_wav && self.opts.channels == 2 {
            if std::fs::rename(mixed, destination).is_err() {
                std::fs::copy(mixed, destination).with_context(|| {
                    format!("failed to move mix to '{}'", destination.display())
                })?;
            }
            return Ok(());
        }

        let mut args: Vec<OsString> = vec!["-v".into(), "error".into(), "-y".into(), "-i".into()];
        args.push(mixed.as_os_str().to_owned());
        args.push("-ac".into());
        args.push(self.opts.channels.to_string().into());
        if !is_wav {
            args.push("-b:a".into());
            args.push(opts.bitrate.clone().into());
        }
        args.push(destination.as_os_str().to_owned());
        self.ffmpeg.run(&args)?;
        Ok(())
    }
}

impl Renderer for FfmpegRenderer {
    #[tracing::instrument(skip(self, tracks, opts), fields(tracks = tracks.len()))]
    fn render(
        &self,
        tracks: &[&[Fragment]],
        destination: &Path,
        opts: &RenderOptions,
    ) -> TapeResult<()> {
        prepare_destination(tracks, destination, opts)?;

        let scratch = tempfile::Builder::new()
            .prefix("tapecut")
            .tempdir()
            .context("failed to create scratch directory")?;

        let mut track_files = Vec::with_capacity(tracks.len());
        for (i, fragments) in tracks.iter().enumerate() {
            if fragments.iter().all(|f| f.length() <= 0.0) {
                continue;
            }
            let out = scratch.path().join(format!("track_{i}.wav"));
            self.join_fragments(fragments, &out, scratch.path())?;
            track_files.push(out);
        }

        let mixed = scratch.path().join("mix.wav");
        self.mix_files(&track_files, &mixed, scratch.path())?;
        self.export(&mixed, destination, opts)?;

        tracing::info!(destination = %destination.display(), "render complete");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn silence(&self, duration: f64) -> TapeResult<Timeline> {
        if duration <= 0.0 {
            return Ok(Timeline::new());
        }
        let file = tempfile::Builder::new()
            .prefix("silence")
            .suffix(".wav")
            .tempfile()
            .context("failed to create silence file")?;
        let path = file.into_temp_path();

        let mut args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-y".into(),
            "-f".into(),
            "lavfi".into(),
            "-i".into(),
            format!("anullsrc=r={}:cl=stereo", self.opts.sample_rate).into(),
            "-t".into(),
            format!("{duration:.6}").into(),
        ];
        args.extend(self.wav_output_args(&path));
        self.ffmpeg.run(&args)?;

        Timeline::whole(SourceFile::owned(path)?, duration)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/ffmpeg.rs"]
mod tests;
