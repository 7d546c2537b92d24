use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vine", version)]
struct Cli {
    /// Log everything the library emits at debug level and above (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a timeline script and write the resulting specification JSON.
    Build(BuildArgs),
    /// Summarize a specification: duration, lanes, clips, and what is active at a time.
    Inspect(InspectArgs),
    /// Flatten a specification into a renderer manifest.
    Manifest(ManifestArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input timeline script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output specification JSON.
    #[arg(long)]
    out: PathBuf,

    /// Accept audio with unknown extensions if `ffprobe` finds an audio stream.
    #[arg(long)]
    probe_audio: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input specification JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Also list clips and transitions active at this time (seconds).
    #[arg(long)]
    at: Option<f64>,
}

#[derive(Parser, Debug)]
struct ManifestArgs {
    /// Input specification JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output manifest JSON.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Codec hint recorded in the manifest.
    #[arg(long)]
    codec: Option<String>,

    /// Bitrate hint recorded in the manifest.
    #[arg(long)]
    bitrate: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vine=debug".to_string()
        } else {
            "warn".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Manifest(args) => cmd_manifest(args),
    }
}

fn read_spec(path: &Path) -> anyhow::Result<vine::Specification> {
    let spec = vine::Specification::from_path(path)
        .with_context(|| format!("load specification '{}'", path.display()))?;
    Ok(spec)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let script = vine::Script::from_path(&args.in_path)?;

    let mut builder = script.canvas.builder();
    if args.probe_audio {
        builder = builder.with_validator(vine::FfprobeValidator);
    }
    script
        .apply(&mut builder)
        .with_context(|| format!("apply script '{}'", args.in_path.display()))?;
    let spec = builder.build_titled(
        script
            .title
            .clone()
            .unwrap_or_else(|| vine::DEFAULT_TITLE.to_string()),
    )?;

    vine::ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, spec.to_json_pretty()?)
        .with_context(|| format!("write specification '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({:.3}s, {} clips)",
        args.out.display(),
        spec.total_duration(),
        spec.clip_count().iter().map(|(_, n)| *n).sum::<usize>()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let spec = read_spec(&args.in_path)?;

    println!("title: {}", spec.title);
    println!(
        "canvas: {}x{} @ {} fps",
        spec.width(),
        spec.height(),
        spec.fps()
    );
    println!("duration: {:.3}s", spec.total_duration());

    let tracks = spec.track_count();
    let clips = spec.clip_count();
    for kind in vine::TrackKind::ALL {
        println!(
            "{:<6} lanes={} clips={}",
            kind.as_str(),
            tracks[kind],
            clips[kind]
        );
    }
    println!("transitions: {}", spec.transitions().len());

    if let Some(t) = args.at {
        println!("active at {t:.3}s:");
        for (kind, active) in spec.active_clips_at(t).iter() {
            for clip in active {
                println!("  {kind}: {clip}");
            }
        }
        for tr in spec.transitions_at(t) {
            println!(
                "  transition: {} [{:.3}, {:.3}) progress={:.3}",
                tr.transition_type,
                tr.start_time,
                tr.end_time(),
                tr.eased_progress_at(t)
            );
        }
    }
    Ok(())
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    use vine::Renderer as _;

    let spec = read_spec(&args.in_path)?;
    let opts = vine::ExportOptions {
        codec: args.codec,
        bitrate: args.bitrate,
        overwrite: !args.no_overwrite,
    };
    vine::ManifestRenderer.export(&spec, &args.out, &opts)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
