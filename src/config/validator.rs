//! Configuration validation
//!
//! Every check runs before any worker starts, so an invalid run never
//! touches the filesystem.

use super::{TerminationMode, WorkloadConfig, WorkloadKind};
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a configuration is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("thread count must be at least 1")]
    NoThreads,

    #[error("load must be at least 1")]
    ZeroLoad,

    #[error("num_dirs must be at least 1")]
    NoDirectories,

    #[error("files_per_dir must be at least 1")]
    NoFiles,

    #[error("root path does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("root path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("{threads} threads x {load} operations does not fit in memory")]
    StoreTooLarge { threads: usize, load: u64 },

    #[error("duration of {0} seconds overflows the nanosecond clock")]
    DurationOverflow(u64),
}

/// Validate complete configuration
pub fn validate_config(config: &WorkloadConfig) -> Result<(), ConfigError> {
    validate_shape(config)?;
    validate_root(config)?;
    Ok(())
}

/// Validate counts and bounds (no filesystem access)
pub fn validate_shape(config: &WorkloadConfig) -> Result<(), ConfigError> {
    if config.threads == 0 {
        return Err(ConfigError::NoThreads);
    }
    if config.load == 0 {
        return Err(ConfigError::ZeroLoad);
    }

    if let WorkloadKind::Stat {
        num_dirs,
        files_per_dir,
    } = config.workload
    {
        if num_dirs == 0 {
            return Err(ConfigError::NoDirectories);
        }
        if files_per_dir == 0 {
            return Err(ConfigError::NoFiles);
        }
    }

    match config.termination {
        TerminationMode::CountBound => {
            let slots = usize::try_from(config.load).ok().and_then(|load| {
                load.checked_mul(config.threads)
                    .and_then(|n| n.checked_mul(config.kind().dimensions()))
            });
            if slots.is_none() {
                return Err(ConfigError::StoreTooLarge {
                    threads: config.threads,
                    load: config.load,
                });
            }
        }
        TerminationMode::TimeBound => {
            if config.duration_ns().is_none() {
                return Err(ConfigError::DurationOverflow(config.load));
            }
        }
    }

    Ok(())
}

/// Validate that the root exists and is a directory
pub fn validate_root(config: &WorkloadConfig) -> Result<(), ConfigError> {
    match std::fs::metadata(&config.root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::RootNotDirectory(config.root.clone())),
        Err(_) => Err(ConfigError::RootMissing(config.root.clone())),
    }
}
