//! CLI to Config conversion utilities

use crate::config::cli::{BenchArgs, Command, LatencyFlag, StatArgs, TimingFlag};
use crate::config::workload::{ReportMode, TerminationMode, WorkloadKind};
use crate::config::WorkloadConfig;
use anyhow::Result;

impl From<LatencyFlag> for ReportMode {
    fn from(flag: LatencyFlag) -> Self {
        match flag {
            LatencyFlag::FullLat => ReportMode::Detailed,
            LatencyFlag::ResLat => ReportMode::Summary,
        }
    }
}

impl From<TimingFlag> for TerminationMode {
    fn from(flag: TimingFlag) -> Self {
        match flag {
            TimingFlag::TimeBased => TerminationMode::TimeBound,
            TimingFlag::NoTime => TerminationMode::CountBound,
        }
    }
}

fn bench_config(args: &BenchArgs, workload: WorkloadKind, seed: Option<u64>) -> WorkloadConfig {
    WorkloadConfig {
        root: args.root.clone(),
        load: args.load,
        threads: args.threads,
        report: args.latency.into(),
        termination: args.timing.into(),
        workload,
        seed,
    }
}

/// Build the configuration of the `mix` command
pub fn mix_config(args: &BenchArgs) -> WorkloadConfig {
    bench_config(args, WorkloadKind::Mix, None)
}

/// Build the configuration of the `stat` command
pub fn stat_config(args: &StatArgs) -> WorkloadConfig {
    bench_config(
        &args.bench,
        WorkloadKind::Stat {
            num_dirs: args.num_dirs,
            files_per_dir: args.files_per_dir,
        },
        args.seed,
    )
}

/// Resolve the workload of a benchmark command
///
/// Returns `None` for commands that do not run a benchmark (`tree`).
pub fn command_to_config(command: &Command) -> Result<Option<WorkloadConfig>> {
    let config = match command {
        Command::Mix(args) => mix_config(args),
        Command::Stat(args) => stat_config(args),
        Command::Run { config } => super::toml::parse_toml_file(config)?,
        Command::Tree { .. } => return Ok(None),
    };
    Ok(Some(config))
}
