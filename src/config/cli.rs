//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fsbench - filesystem metadata latency microbenchmark
#[derive(Parser, Debug)]
#[command(name = "fsbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output (per-worker timing, seeds) on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Validate configuration and print it without touching the filesystem
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure create/stat/unlink mixes on fresh files under ROOT_PATH
    Mix(BenchArgs),

    /// Measure stat on random files of a tree built with `tree create`
    Stat(StatArgs),

    /// Run a workload described by a TOML file
    Run {
        /// Workload file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Build or remove the fixture tree used by the stat workload
    Tree {
        #[command(subcommand)]
        action: TreeAction,
    },
}

/// Positional arguments shared by the benchmark commands
#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Directory under which benchmark paths are created or looked up
    #[arg(value_name = "ROOT_PATH")]
    pub root: PathBuf,

    /// Operations per thread (no-time) or seconds per thread (time-based)
    #[arg(value_name = "LOAD")]
    pub load: u64,

    /// Number of worker threads
    #[arg(value_name = "THREADS")]
    pub threads: usize,

    /// Report every latency or only the mean
    #[arg(value_enum, value_name = "full-lat|res-lat")]
    pub latency: LatencyFlag,

    /// Bound each thread by duration or by operation count
    #[arg(value_enum, value_name = "time-based|no-time")]
    pub timing: TimingFlag,
}

/// Arguments of the stat workload
#[derive(Args, Debug, Clone)]
pub struct StatArgs {
    #[command(flatten)]
    pub bench: BenchArgs,

    /// Number of directories in the fixture tree
    #[arg(short = 'N', long)]
    pub num_dirs: u64,

    /// Number of files in each directory
    #[arg(short = 'n', long)]
    pub files_per_dir: u64,

    /// Process-level seed for path selection
    #[arg(long, env = "FSBENCH_SEED")]
    pub seed: Option<u64>,
}

/// Fixture tree actions
#[derive(Subcommand, Debug)]
pub enum TreeAction {
    /// Create ROOT/<dir>/<file> for every dir and file index
    Create {
        #[arg(value_name = "ROOT_PATH")]
        root: PathBuf,
        #[arg(short = 'N', long)]
        num_dirs: u64,
        #[arg(short = 'n', long)]
        files_per_dir: u64,
    },
    /// Recursively remove ROOT/0 .. ROOT/<num_dirs - 1>
    Remove {
        #[arg(value_name = "ROOT_PATH")]
        root: PathBuf,
        #[arg(short = 'N', long)]
        num_dirs: u64,
    },
}

/// Latency reporting flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LatencyFlag {
    /// Every sample, one line each
    #[value(name = "full-lat")]
    FullLat,
    /// Mean of all samples, one line
    #[value(name = "res-lat")]
    ResLat,
}

/// Termination flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimingFlag {
    /// LOAD is a per-thread duration in seconds
    #[value(name = "time-based")]
    TimeBased,
    /// LOAD is a per-thread operation count
    #[value(name = "no-time")]
    NoTime,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
