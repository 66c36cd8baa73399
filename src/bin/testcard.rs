use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use testcard::{Canvas, CardSession, FsLoader, Painters, RenderOpts, RenderThreading, encode_png16};

#[derive(Parser, Debug)]
#[command(name = "testcard", version)]
struct Cli {
    /// Log more (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a 16-bit PNG.
    Frame(FrameArgs),
    /// Render every frame into a directory.
    Render(RenderArgs),
    /// Print the resolved widgets of a frame as JSON.
    Widgets(WidgetsArgs),
}

#[derive(Parser, Debug)]
struct Input {
    /// Root factory (JSON or YAML).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory relative URIs resolve against. Defaults to the factory's directory.
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: Input,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: Input,

    /// Output directory; frames are written as frame_NNNN.png.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render frames concurrently.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct WidgetsArgs {
    #[command(flatten)]
    input: Input,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Widgets(args) => cmd_widgets(args),
    }
}

fn open(input: &Input) -> anyhow::Result<CardSession> {
    let path = input.in_path.to_string_lossy();
    CardSession::open(
        &path,
        input.base_dir.as_deref(),
        Arc::new(FsLoader),
        Painters::builtin(),
        RenderOpts::default(),
    )
    .with_context(|| format!("open factory '{}'", input.in_path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let session = open(&args.input)?;
    let canvas = session.render_frame(args.frame)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&canvas, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let session = open(&args.input)?;
    let threading = RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let frames = session.render_frames(&threading)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, canvas) in frames.iter().enumerate() {
        write_png(canvas, &args.out_dir.join(format!("frame_{i:04}.png")))?;
    }

    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}

fn cmd_widgets(args: WidgetsArgs) -> anyhow::Result<()> {
    let session = open(&args.input)?;
    let widgets = session.widgets(args.frame)?;
    let listed: Vec<_> = widgets.iter().collect();
    println!("{}", serde_json::to_string_pretty(&listed)?);
    Ok(())
}

fn write_png(canvas: &Canvas, path: &Path) -> anyhow::Result<()> {
    let bytes = encode_png16(&canvas.to_rgba16())?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}
