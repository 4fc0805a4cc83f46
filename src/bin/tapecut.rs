use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tapecut", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the duration of a media file in seconds (requires `ffprobe` on PATH).
    Probe(ProbeArgs),
    /// Render a JSON project to an audio file (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Media file to probe.
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output audio path; the extension selects the container.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Bitrate for compressed outputs.
    #[arg(long, default_value = "128k")]
    bitrate: String,
}

/// A set of timelines mixed together as parallel tracks.
#[derive(Debug, serde::Deserialize)]
struct Project {
    tracks: Vec<tapecut::Timeline>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_project_json(path: &Path) -> anyhow::Result<Project> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let r = BufReader::new(f);
    let project: Project = serde_json::from_reader(r).with_context(|| "parse project JSON")?;
    Ok(project)
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let duration = tapecut::Ffprobe::default()
        .duration(&args.file)
        .with_context(|| format!("probe '{}'", args.file.display()))?;
    println!("{duration:.6}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let project = read_project_json(&args.in_path)?;

    let renderer = tapecut::FfmpegRenderer::new(tapecut::FfmpegRendererOpts::default())?;
    let opts = tapecut::RenderOptions::new()
        .overwrite(args.overwrite)
        .bitrate(args.bitrate);
    tapecut::mix(&project.tracks, &args.out, &opts, &renderer)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
