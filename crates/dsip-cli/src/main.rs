//! dsip - apply a photographic look to an image
//!
//! Runs the DSIP pipeline (LUT, HSV gains, contrast, grain, vignette) from
//! a saved profile, and offers a few helpers around profiles, LUT
//! libraries and histograms.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod library;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "dsip")]
#[command(author, version, about = "Apply a photographic look to an image")]
#[command(long_about = "
Applies a 3D LUT, HSV gains, contrast/brightness, film grain and a vignette
to an 8-bit image, driven by a profile file.

Examples:
  dsip process -i photo.jpg -p look.txt -o out.png --lut-dir luts/ --grain grain.png
  dsip process -i photo.jpg -p look.txt -o out.png --lut hald.png --grain-dir grain/ --seed 7
  dsip profile init look.txt
  dsip profile show look.txt
  dsip luts luts/
  dsip histogram out.png --json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto, or DSIP_THREADS)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an image with a profile
    #[command(visible_alias = "p")]
    Process(ProcessArgs),

    /// Create or inspect profile files
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// List the LUTs of a directory with their profile indices
    Luts(LutsArgs),

    /// Print RGB and luma histograms of an image
    #[command(visible_alias = "hist")]
    Histogram(HistogramArgs),
}

#[derive(Args)]
struct ProcessArgs {
    /// Input image
    #[arg(short, long)]
    input: PathBuf,

    /// Profile file (key:value lines)
    #[arg(short, long)]
    profile: PathBuf,

    /// Output image (format from extension)
    #[arg(short, long)]
    output: PathBuf,

    /// LUT image to use regardless of the profile's LUT index
    #[arg(short, long, conflicts_with = "lut_dir")]
    lut: Option<PathBuf>,

    /// LUT directory indexed by the profile (or DSIP_LUT_DIR)
    #[arg(long)]
    lut_dir: Option<PathBuf>,

    /// Grain plate(s); one is picked at random
    #[arg(short, long, num_args = 1..)]
    grain: Vec<PathBuf>,

    /// Directory of grain plates (or DSIP_GRAIN_DIR)
    #[arg(long, conflicts_with = "grain")]
    grain_dir: Option<PathBuf>,

    /// Seed for the grain plate choice
    #[arg(long)]
    seed: Option<u64>,

    /// Apply only the LUT, like the interactive preview
    #[arg(long)]
    preview: bool,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Write the identity profile
    Init {
        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print a profile's values and any problems found
    Show {
        /// Profile file
        path: PathBuf,
    },
}

#[derive(Args)]
struct LutsArgs {
    /// LUT directory (or DSIP_LUT_DIR)
    dir: Option<PathBuf>,
}

#[derive(Args)]
struct HistogramArgs {
    /// Input image
    input: PathBuf,

    /// Emit JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("DSIP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CliConfig::from_env();

    // Configure thread pool
    let threads = cli.threads.unwrap_or(config.threads);
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Process(args) => commands::process::run(args, &config),
        Commands::Profile(cmd) => commands::profile::run(cmd),
        Commands::Luts(args) => commands::luts::run(args, &config),
        Commands::Histogram(args) => commands::histogram::run(args),
    }
}
