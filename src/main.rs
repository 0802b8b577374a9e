//! fsbench CLI entry point

use anyhow::{Context, Result};
use fsbench::config::cli::{Cli, Command, TreeAction};
use fsbench::config::{cli_convert, toml, validator, WorkloadConfig};
use fsbench::coordinator;
use fsbench::output::text;
use fsbench::target::tree::StatTree;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    if let Command::Tree { action } = &cli.command {
        return run_tree(action, cli.dry_run);
    }

    let config = cli_convert::command_to_config(&cli.command)?
        .context("Command does not describe a benchmark")?;

    if cli.dry_run {
        return dry_run(&config);
    }

    run(&config)
}

/// Diagnostics go to stderr; stdout carries only result rows
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &WorkloadConfig) -> Result<()> {
    let outcome = coordinator::run_benchmark(config).context("Benchmark failed")?;
    text::log_worker_reports(&outcome.workers);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    text::write_report(&mut out, &outcome.report).context("Failed to write results")?;
    Ok(())
}

fn dry_run(config: &WorkloadConfig) -> Result<()> {
    validator::validate_config(config).context("Configuration validation failed")?;
    eprintln!("{}", toml::to_toml_string(config)?);
    eprintln!("Dry run mode - configuration validated successfully");
    Ok(())
}

fn run_tree(action: &TreeAction, dry_run: bool) -> Result<()> {
    match action {
        TreeAction::Create {
            root,
            num_dirs,
            files_per_dir,
        } => {
            let tree = StatTree::new(root.clone(), *num_dirs, *files_per_dir);
            if dry_run {
                eprintln!(
                    "Would create {} directories x {} files under {}",
                    num_dirs,
                    files_per_dir,
                    root.display()
                );
                return Ok(());
            }
            tree.create().context("Failed to create fixture tree")?;
        }
        TreeAction::Remove { root, num_dirs } => {
            let tree = StatTree::new(root.clone(), *num_dirs, 0);
            if dry_run {
                eprintln!("Would remove {} directories under {}", num_dirs, root.display());
                return Ok(());
            }
            tree.remove().context("Failed to remove fixture tree")?;
        }
    }
    Ok(())
}
