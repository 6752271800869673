use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quilt::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATCHES, DEFAULT_SCALE};
use quilt::{evaluate_source, render, EvalConfig, OutputFormat, RenderConfig};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("QUILT_GIT_HASH"),
    ", ",
    env!("QUILT_GIT_DIRTY"),
    ")"
);

#[derive(Parser)]
#[command(name = "quilt")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Evaluate a quilt program into a laid-out design")]
struct Cli {
    /// Path to a quilt source file ("-" reads stdin)
    file: Option<PathBuf>,

    /// Output format: json or svg
    #[arg(short, long, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pixels per design unit for svg output
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f64,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum evaluation nesting depth
    #[arg(long, env = "QUILT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of patches in any design
    #[arg(long, env = "QUILT_MAX_PATCHES", default_value_t = DEFAULT_MAX_PATCHES)]
    max_patches: usize,

    /// Log evaluation steps to stderr (overrides QUILT_LOG)
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        Some(EnvFilter::new("quilt=debug"))
    } else {
        std::env::var("QUILT_LOG").ok().map(EnvFilter::new)
    };
    if let Some(filter) = filter {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let Some(file) = cli.file else {
        println!("quilt - evaluate a quilt file, e.g.: quilt design.quilt --format svg");
        return Ok(());
    };

    let src = if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?
    };

    let eval = EvalConfig {
        max_depth: cli.max_depth,
        max_patches: cli.max_patches,
    };
    let design = evaluate_source(&src, eval)?;

    let out = render::render(
        &design,
        &RenderConfig {
            format: cli.format,
            scale: cli.scale,
        },
    )?;
    match cli.output {
        Some(path) => {
            fs::write(&path, out).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", out.trim_end()),
    }

    Ok(())
}
