//! Generates `icon.png`, `icon.ico` and `icon.icns` from a source image and
//! deploys them into `build/` and `public/`.
//!
//! ```shell
//! iconkit source.png                 # squircle mask, transparent backdrop
//! iconkit source.png --black-bg      # clean noisy edges onto solid black
//! iconkit source.png --no-squircle   # keep the square shape
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use iconkit::{
    EmbeddedPackager, IconConfig, IconError, IconPackager, IconPipeline, IconutilPackager,
    ICNS_FILE_NAME, PNG_FILE_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate app icons (PNG, ICO, ICNS) from a source image
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the source image (e.g. source.png)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    source: PathBuf,

    /// Disable the macOS squircle mask applied to the PNG
    #[arg(long)]
    no_squircle: bool,

    /// Force a solid black background (cleans noisy edges of generated art)
    #[arg(long)]
    black_bg: bool,

    /// Directory that receives the build/ and public/ outputs
    #[arg(long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    root: PathBuf,

    /// TOML file overriding pipeline constants
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// How to package icon.icns
    #[arg(long, value_enum, default_value_t = IcnsBackend::Iconutil)]
    icns_backend: IcnsBackend,
}

/// Available `.icns` packagers.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum IcnsBackend {
    /// The macOS iconutil command (skipped on other hosts)
    Iconutil,
    /// Built-in encoder, available everywhere
    Embedded,
}

impl IcnsBackend {
    fn packager(self) -> Box<dyn IconPackager> {
        match self {
            IcnsBackend::Iconutil => Box::new(IconutilPackager::new()),
            IcnsBackend::Embedded => Box::new(EmbeddedPackager::new()),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let packager = cli.icns_backend.packager();
    match run(&cli, packager.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, packager: &dyn IconPackager) -> Result<()> {
    // Checked up front so a bad path leaves no output behind.
    if !cli.source.exists() {
        return Err(IconError::SourceNotFound(cli.source.clone()).into());
    }

    let mut config = match &cli.config {
        Some(path) => IconConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => IconConfig::default(),
    };
    if cli.no_squircle {
        config.squircle = false;
    }
    if cli.black_bg {
        config.solid_background = true;
    }

    let pipeline = IconPipeline::new(config)?;
    let build_dir = cli.root.join("build");
    let public_dir = cli.root.join("public");
    fs::create_dir_all(&build_dir)
        .with_context(|| format!("failed to create {}", build_dir.display()))?;
    fs::create_dir_all(&public_dir)
        .with_context(|| format!("failed to create {}", public_dir.display()))?;

    let report = pipeline.run(&cli.source, &build_dir, packager)?;

    for name in [PNG_FILE_NAME, ICNS_FILE_NAME] {
        let built = build_dir.join(name);
        if report.written.contains(&built) {
            publish(&built, &public_dir.join(name))?;
        }
    }

    log::info!(
        "All icon formats generated and deployed to {} and {}",
        build_dir.display(),
        public_dir.display()
    );
    Ok(())
}

fn publish(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .with_context(|| format!("failed to copy {} to {}", from.display(), to.display()))?;
    log::info!("Copied {} to {}", from.display(), to.display());
    Ok(())
}
