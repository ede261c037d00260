//! Egg to incubator allocation.
//!
//! Unlimited incubators are cheap to reuse, so they take the shortest eggs
//! and turn over quickly. Limited incubators burn a use per egg, so they take
//! the longest eggs. With a single usable incubator there is no turnover to
//! gain and it takes the longest egg whatever its kind.
//!
//! Two filters can leave an incubator idle for a pass:
//! - eggs of the long-range tier wait for the player to reach the level
//!   gate, unless no unused egg is shorter than that tier
//! - eggs below the configured minimum distance never go into a limited
//!   incubator

use hatchery_events::{IncubatorKind, IncubatorStatusPayload};
use hatchery_reconcile::{AssignmentRecord, PendingQueue, QueueEnd};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{ensure_running, AgentError};
use crate::inventory::IncubatorCommitter;
use crate::model::{Egg, Incubator, PlayerStats};

/// Player level below which long-range eggs are held back.
pub const DEFAULT_LEVEL_GATE: u32 = 20;

/// Distance of the longest egg tier, in km.
pub const DEFAULT_LONG_RANGE_KM: f64 = 10.0;

/// Allocation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPolicy {
    /// Eggs shorter than this only go into unlimited incubators.
    pub min_km: f64,

    /// Player level required before long-range eggs are incubated.
    pub level_gate: u32,

    /// Distance of the long-range egg tier.
    pub long_range_km: f64,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            min_km: 2.0,
            level_gate: DEFAULT_LEVEL_GATE,
            long_range_km: DEFAULT_LONG_RANGE_KM,
        }
    }
}

impl AllocationPolicy {
    /// Returns true if `egg` belongs to the long-range tier.
    ///
    /// Only eggs of exactly that distance are in the tier.
    pub fn is_long_range(&self, egg: &Egg) -> bool {
        egg.km_target == self.long_range_km
    }

    /// Returns true if `egg` is shorter than the long-range tier.
    pub fn is_below_long_range(&self, egg: &Egg) -> bool {
        egg.km_target < self.long_range_km
    }
}

/// Result of one allocation pass.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    /// Every assignment known after the pass, existing and new, in
    /// incubator order.
    pub records: Vec<AssignmentRecord>,

    /// One status per occupied or newly filled incubator, in incubator order.
    pub statuses: Vec<IncubatorStatusPayload>,
}

impl Allocation {
    /// Number of eggs put into incubators during this pass.
    pub fn added_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.was_added_now).count()
    }
}

/// Why an idle incubator was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    NoEggs,
    LevelGate,
    BelowMinimum,
}

/// Pairs idle incubators with unused eggs.
pub struct Allocator<'a> {
    committer: &'a dyn IncubatorCommitter,
    policy: &'a AllocationPolicy,
}

impl<'a> Allocator<'a> {
    /// Create an allocator committing through `committer`.
    pub fn new(committer: &'a dyn IncubatorCommitter, policy: &'a AllocationPolicy) -> Self {
        Self { committer, policy }
    }

    /// Run one allocation pass.
    ///
    /// Commits happen one at a time in incubator order. A failed commit or a
    /// raised shutdown signal ends the pass with an error.
    pub async fn allocate(
        &self,
        incubators: Vec<Incubator>,
        eggs: Vec<Egg>,
        stats: &PlayerStats,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<Allocation, AgentError> {
        let mut incubators: Vec<Incubator> =
            incubators.into_iter().filter(|i| i.is_usable()).collect();
        incubators.sort_by_key(|i| i.kind != IncubatorKind::Unlimited);
        let usable_count = incubators.len();

        let mut queue =
            PendingQueue::ordered_by(eggs.into_iter().filter(|e| e.is_unused()), |e: &Egg| {
                e.km_remaining()
            });
        let only_long_range = !queue.any(|e| self.policy.is_below_long_range(e));

        debug!(
            usable_incubators = usable_count,
            unused_eggs = queue.len(),
            only_long_range,
            "Allocating eggs"
        );

        let mut allocation = Allocation::default();

        for incubator in incubators {
            ensure_running(shutdown)?;

            if let Some(egg_id) = incubator.egg_id {
                allocation
                    .records
                    .push(AssignmentRecord::new(incubator.id.clone(), egg_id));
                allocation.statuses.push(IncubatorStatusPayload {
                    km_to_walk: incubator.km_to_walk(),
                    km_remaining: incubator.target_km_walked - stats.km_walked,
                    incubator_id: incubator.id,
                    was_added_now: false,
                    item_id: egg_id,
                });
                continue;
            }

            let end = if incubator.kind.is_unlimited() && usable_count > 1 {
                QueueEnd::Head
            } else {
                QueueEnd::Tail
            };

            let candidate = queue.peek(end).cloned();
            let egg = match self.check(&incubator, candidate, stats, only_long_range) {
                Ok(egg) => egg,
                Err(reason) => {
                    debug!(
                        incubator_id = %incubator.id,
                        kind = %incubator.kind,
                        reason = ?reason,
                        "Leaving incubator idle"
                    );
                    continue;
                }
            };

            let response = self
                .committer
                .use_incubator(&incubator.id, egg.id)
                .await
                .map_err(|cause| AgentError::Commit {
                    incubator_id: incubator.id.to_string(),
                    egg_id: egg.id.value(),
                    cause,
                })?;
            queue.take(end);

            info!(
                incubator_id = %incubator.id,
                kind = %incubator.kind,
                egg_id = %egg.id,
                km_target = egg.km_target,
                "Egg put into incubator"
            );

            allocation
                .records
                .push(AssignmentRecord::new(incubator.id.clone(), egg.id));
            allocation.statuses.push(IncubatorStatusPayload {
                incubator_id: incubator.id,
                was_added_now: true,
                item_id: egg.id,
                km_to_walk: egg.km_target,
                km_remaining: response.target_km_walked - stats.km_walked,
            });
        }

        Ok(allocation)
    }

    fn check(
        &self,
        incubator: &Incubator,
        candidate: Option<Egg>,
        stats: &PlayerStats,
        only_long_range: bool,
    ) -> Result<Egg, Skip> {
        let Some(egg) = candidate else {
            return Err(Skip::NoEggs);
        };

        if self.policy.is_long_range(&egg)
            && stats.level < self.policy.level_gate
            && !only_long_range
        {
            info!(
                egg_id = %egg.id,
                level = stats.level,
                level_gate = self.policy.level_gate,
                "Holding long-range egg until level gate"
            );
            return Err(Skip::LevelGate);
        }

        if egg.km_target < self.policy.min_km && !incubator.kind.is_unlimited() {
            return Err(Skip::BelowMinimum);
        }

        Ok(egg)
    }
}
