// Recoverable error categories. Fatal startup errors stay anyhow in main.

use thiserror::Error;

/// Snapshot collection failed for this tick; the scheduler logs it and
/// proceeds to the next tick.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("platform access failed: {0}")]
    Platform(String),

    #[error("no mounted disk matches {0}")]
    DiskNotFound(String),
}

/// A single alert e-mail could not be handed off or built; logged per
/// message, never propagated to the scheduler.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("building alert e-mail failed: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("mail queue full")]
    QueueFull,

    #[error("mail sender is gone")]
    SenderGone,
}
