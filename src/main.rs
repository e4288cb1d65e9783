#![forbid(unsafe_code)]
//! Bridge dataset generator command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use bridgegen::commands::{
    execute_generate, execute_init, execute_stats, GenerateOptions, InitOptions, StatsOptions,
};
use bridgegen::Config;

#[derive(Parser)]
#[command(name = "bridgegen")]
#[command(about = "Parametric bridge generator - sampled configurations to 3D meshes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = "bridgegen.config.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample configurations and build the dataset
    Generate {
        /// Number of bridges to generate
        num_bridges: usize,

        /// Restrict to one bridge type (beam_slab, box_girder)
        #[arg(long = "bridge_type")]
        bridge_type: Option<String>,

        /// Also export one OBJ per component
        #[arg(long = "include_components")]
        include_components: bool,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Sampling profile (lane_based, fixed_range)
        #[arg(long)]
        profile: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel workers
        #[arg(long)]
        workers: Option<usize>,

        /// Build without safety railings
        #[arg(long = "no-railings")]
        no_railings: bool,

        /// Leave a component out (can specify multiple)
        #[arg(long)]
        exclude: Vec<String>,

        /// Keep the intermediate STL files
        #[arg(long = "keep-stl")]
        keep_stl: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print statistics for a generated dataset
    Stats {
        /// Summary file (default: <outputDir>/bridge_summary.json)
        summary: Option<PathBuf>,

        /// Output as JSON (default: human-readable)
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Default log filter when `RUST_LOG` is unset
fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "bridgegen=debug"
    } else if quiet {
        "bridgegen=warn"
    } else {
        "bridgegen=info"
    }
}

fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let quiet = matches!(cli.command, Commands::Generate { quiet: true, .. });
    init_tracing(default_filter(cli.verbose, quiet));

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("✗").red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { force } => execute_init(InitOptions {
            path: cli.config,
            force,
        }),
        Commands::Generate {
            num_bridges,
            bridge_type,
            include_components,
            seed,
            profile,
            output,
            workers,
            no_railings,
            exclude,
            keep_stl,
            quiet,
        } => {
            let config = Config::load_or_default(&cli.config)?;
            let options = GenerateOptions {
                num_bridges,
                bridge_type,
                include_components,
                seed,
                profile,
                output,
                workers,
                no_railings,
                exclude,
                keep_stl,
                quiet,
            };
            execute_generate(options, config)
        }
        Commands::Stats { summary, json } => {
            let config = Config::load_or_default(&cli.config)?;
            execute_stats(StatsOptions { summary, json }, config)
        }
    }
}
