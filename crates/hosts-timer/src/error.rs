//! Error types and their exit statuses

use std::io;

use hosts_timer_core::StoreError;
use thiserror::Error;

use crate::duration::DurationError;

/// Exit status for bad flags, missing domains and bad durations
pub const USAGE_EXIT: u8 = 1;
/// Exit status when the hosts file cannot be read or written
pub const HOSTS_ERROR_EXIT: u8 = 2;

/// Problems with how the tool was invoked. Nothing has been changed yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("at least one domain is required")]
    NoDomains,

    #[error("invalid domain: {0:?}")]
    InvalidDomain(String),

    #[error("one of -disable, -enable or -time is required")]
    NoMode,

    #[error("-disable, -enable and -time cannot be combined")]
    ConflictingModes,

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("{0}")]
    Arguments(String),
}

/// Everything that can stop a run
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("failed to set up session timer: {0}")]
    Runtime(#[source] io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) | AppError::Config(_) => USAGE_EXIT,
            AppError::Store(_) | AppError::Runtime(_) => HOSTS_ERROR_EXIT,
        }
    }

    /// Whether the usage text should accompany this error
    pub fn wants_usage(&self) -> bool {
        matches!(self, AppError::Usage(_))
    }
}
