//! Reconciliation loop for keeping incubators busy.
//!
//! Each pass:
//! - Refreshes and reads the inventory
//! - Reports eggs that hatched since the last pass
//! - Fills idle incubators and reports every incubator's progress
//! - Remembers the resulting assignments if they changed

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hatchery_events::{EggHatchedPayload, IncubatorStatusPayload, Signal};
use hatchery_reconcile::{
    assignments_changed, diff_assignments, duplicate_slots, AssignmentDigest, AssignmentRecord,
    ChangeDetection,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::allocator::{AllocationPolicy, Allocator};
use crate::detector::detect_hatched;
use crate::error::{ensure_running, AgentError};
use crate::inventory::{IncubatorCommitter, InventorySource};
use crate::sink::SignalSink;
use crate::state::UsageStore;

/// Reconciliation loop configuration.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Interval between passes.
    pub run_interval: Duration,

    /// How remembered and new assignments are compared before saving.
    pub change_detection: ChangeDetection,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            run_interval: Duration::from_secs(60),
            change_detection: ChangeDetection::default(),
        }
    }
}

/// Summary of a completed pass.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,

    /// Eggs that hatched since the previous pass.
    pub hatched: Vec<EggHatchedPayload>,

    /// Progress of every occupied incubator, including ones filled this pass.
    pub statuses: Vec<IncubatorStatusPayload>,

    /// Assignments known after the pass.
    pub records: Vec<AssignmentRecord>,

    /// Whether the usage file was rewritten.
    pub persisted: bool,

    pub digest: AssignmentDigest,
}

impl RunReport {
    /// Number of eggs put into incubators during the pass.
    pub fn added_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.was_added_now).count()
    }
}

/// Outcome of a single pass.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The inventory had no player stats; nothing was done.
    NoPlayerStats,

    Completed(RunReport),
}

impl RunOutcome {
    /// The report, if the pass ran to completion.
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::NoPlayerStats => None,
            RunOutcome::Completed(report) => Some(report),
        }
    }
}

/// Reconciler for keeping incubators busy.
pub struct Reconciler {
    inventory: Arc<dyn InventorySource>,
    committer: Arc<dyn IncubatorCommitter>,
    sink: Arc<dyn SignalSink>,
    store: UsageStore,
    policy: AllocationPolicy,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        inventory: Arc<dyn InventorySource>,
        committer: Arc<dyn IncubatorCommitter>,
        sink: Arc<dyn SignalSink>,
        store: UsageStore,
        policy: AllocationPolicy,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            inventory,
            committer,
            sink,
            store,
            policy,
            config,
        }
    }

    /// Usage store this reconciler remembers assignments in.
    pub fn store(&self) -> &UsageStore {
        &self.store
    }

    /// Run the reconciliation loop until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            run_interval_secs = self.config.run_interval.as_secs(),
            change_detection = self.config.change_detection.as_str(),
            usage_file = %self.store.path().display(),
            "Starting reconciliation loop"
        );

        let mut run_interval = tokio::time::interval(self.config.run_interval);

        loop {
            tokio::select! {
                _ = run_interval.tick() => {
                    match self.reconcile(&shutdown).await {
                        Ok(RunOutcome::Completed(report)) => {
                            info!(
                                hatched = report.hatched.len(),
                                added = report.added_count(),
                                incubating = report.records.len(),
                                persisted = report.persisted,
                                digest = %report.digest,
                                "Pass complete"
                            );
                        }
                        Ok(RunOutcome::NoPlayerStats) => {}
                        Err(e) if e.is_cancelled() => {
                            debug!("Pass interrupted by shutdown");
                        }
                        Err(e) => {
                            error!(error = %e, reason = e.reason_code(), "Reconciliation failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Reconciler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Perform a single reconciliation pass.
    ///
    /// Shutdown is checked on entry and before each incubator. A pass cancelled
    /// partway through allocation saves nothing; once allocation finishes its
    /// result is always compared and saved.
    pub async fn reconcile(
        &self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<RunOutcome, AgentError> {
        ensure_running(shutdown)?;
        let started_at = Utc::now();
        debug!("Starting reconciliation");

        self.inventory.refresh().await.map_err(AgentError::Inventory)?;
        let snapshot = self
            .inventory
            .snapshot()
            .await
            .map_err(AgentError::Inventory)?;

        let Some(stats) = snapshot.player_stats.first().cloned() else {
            warn!("Inventory has no player stats, skipping pass");
            return Ok(RunOutcome::NoPlayerStats);
        };

        let remembered = self.store.load()?;

        let hatched = detect_hatched(&remembered, &snapshot.pokemon);
        for payload in &hatched {
            self.emit(Signal::EggHatched(payload.clone())).await?;
        }

        let allocation = Allocator::new(self.committer.as_ref(), &self.policy)
            .allocate(snapshot.incubators, snapshot.eggs, &stats, shutdown)
            .await?;
        for status in &allocation.statuses {
            self.emit(Signal::IncubatorStatus(status.clone())).await?;
        }

        let records = allocation.records;
        for slot_id in duplicate_slots(&records) {
            warn!(incubator_id = %slot_id, "Incubator listed more than once");
        }

        let persisted =
            assignments_changed(&remembered, &records, self.config.change_detection);
        if persisted {
            let diff = diff_assignments(&remembered, &records);
            self.store.save(&records)?;
            info!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                record_count = records.len(),
                "Remembered assignments updated"
            );
        } else {
            debug!(record_count = records.len(), "Assignments unchanged");
        }

        Ok(RunOutcome::Completed(RunReport {
            started_at,
            hatched,
            statuses: allocation.statuses,
            digest: AssignmentDigest::of(&records),
            records,
            persisted,
        }))
    }

    async fn emit(&self, signal: Signal) -> Result<(), AgentError> {
        self.sink.send(signal).await.map_err(AgentError::Sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciler_config_default() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.run_interval, Duration::from_secs(60));
        assert_eq!(config.change_detection, ChangeDetection::Unordered);
    }

    #[test]
    fn test_no_player_stats_has_no_report() {
        assert!(RunOutcome::NoPlayerStats.report().is_none());
    }
}
