//! Error types for the incubator agent.

use thiserror::Error;
use tokio::sync::watch;

use crate::state::StoreError;

/// Errors that end an agent pass.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The shutdown signal was raised; the pass stopped before finishing.
    #[error("pass cancelled")]
    Cancelled,

    /// The usage file could not be read or written.
    #[error("usage store error: {0}")]
    Store(#[from] StoreError),

    /// The inventory could not be refreshed or read.
    #[error("inventory error: {0:#}")]
    Inventory(anyhow::Error),

    /// Putting an egg into an incubator failed.
    #[error("failed to use incubator {incubator_id} for egg {egg_id}: {cause:#}")]
    Commit {
        incubator_id: String,
        egg_id: u64,
        cause: anyhow::Error,
    },

    /// A signal could not be delivered.
    #[error("signal sink error: {0:#}")]
    Sink(anyhow::Error),
}

impl AgentError {
    /// Returns true if the pass ended because of shutdown.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }

    /// Short reason code for logs.
    pub fn reason_code(&self) -> &'static str {
        match self {
            AgentError::Cancelled => "cancelled",
            AgentError::Store(_) => "store_failed",
            AgentError::Inventory(_) => "inventory_failed",
            AgentError::Commit { .. } => "commit_failed",
            AgentError::Sink(_) => "sink_failed",
        }
    }
}

/// Fail with [`AgentError::Cancelled`] if shutdown has been signalled.
pub fn ensure_running(shutdown: &watch::Receiver<bool>) -> Result<(), AgentError> {
    if *shutdown.borrow() {
        return Err(AgentError::Cancelled);
    }
    Ok(())
}
