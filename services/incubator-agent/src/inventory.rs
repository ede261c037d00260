//! Inventory interfaces and mock implementation.
//!
//! The agent talks to the game through two seams:
//! - `InventorySource`: refreshing and reading the inventory snapshot
//! - `IncubatorCommitter`: putting an egg into an incubator
//!
//! A mock implementation of both is provided for testing and development.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use hatchery_events::IncubatorKind;
use hatchery_id::{ItemId, SlotId};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::model::{InventorySnapshot, PlayerStats, Pokemon, UseIncubatorResponse};

/// Read access to the player's inventory.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Ask the service to refresh its cached inventory.
    async fn refresh(&self) -> Result<()>;

    /// Read the current inventory.
    async fn snapshot(&self) -> Result<InventorySnapshot>;
}

/// Commits an egg to an incubator.
#[async_trait]
pub trait IncubatorCommitter: Send + Sync {
    /// Put `egg_id` into `incubator_id`.
    async fn use_incubator(
        &self,
        incubator_id: &SlotId,
        egg_id: ItemId,
    ) -> Result<UseIncubatorResponse>;
}

/// In-memory inventory for testing and development.
///
/// Commits are applied to the held snapshot the way the real service would:
/// the egg moves into the incubator, limited incubators lose a use and the
/// hatch target is set from the current walked distance.
pub struct MockInventory {
    state: RwLock<InventorySnapshot>,

    /// Successful commits, in call order.
    commits: RwLock<Vec<(SlotId, ItemId)>>,

    refreshes: AtomicUsize,

    /// Whether commits should fail.
    fail_commits: bool,
}

impl MockInventory {
    /// Create a mock inventory holding `snapshot`.
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
            commits: RwLock::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
            fail_commits: false,
        }
    }

    /// Create a mock inventory that fails all commits.
    pub fn failing(snapshot: InventorySnapshot) -> Self {
        Self {
            fail_commits: true,
            ..Self::new(snapshot)
        }
    }

    /// Successful commits so far.
    pub async fn commits(&self) -> Vec<(SlotId, ItemId)> {
        self.commits.read().await.clone()
    }

    /// Number of refresh calls so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Copy of the current inventory.
    pub async fn current(&self) -> InventorySnapshot {
        self.state.read().await.clone()
    }

    /// Add walked distance to the player.
    pub async fn walk(&self, km: f64) {
        let mut state = self.state.write().await;
        for stats in state.player_stats.iter_mut() {
            stats.km_walked += km;
        }
    }

    /// Replace the player stats.
    pub async fn set_player_stats(&self, stats: Option<PlayerStats>) {
        self.state.write().await.player_stats = stats.into_iter().collect();
    }

    /// Hatch an egg: it leaves the egg list and its incubator, and the
    /// inventory entry turns into `pokemon`.
    pub async fn hatch(&self, mut pokemon: Pokemon) {
        let egg_id = pokemon.id;
        let mut state = self.state.write().await;

        state.eggs.retain(|egg| egg.id != egg_id);
        for incubator in state.incubators.iter_mut() {
            if incubator.egg_id == Some(egg_id) {
                incubator.egg_id = None;
                incubator.start_km_walked = 0.0;
                incubator.target_km_walked = 0.0;
            }
        }

        pokemon.is_egg = false;
        state.pokemon.retain(|p| p.id != egg_id);
        state.pokemon.push(pokemon);
    }
}

#[async_trait]
impl InventorySource for MockInventory {
    async fn refresh(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        debug!("[MOCK] Refreshing inventory");
        Ok(())
    }

    async fn snapshot(&self) -> Result<InventorySnapshot> {
        Ok(self.state.read().await.clone())
    }
}

#[async_trait]
impl IncubatorCommitter for MockInventory {
    async fn use_incubator(
        &self,
        incubator_id: &SlotId,
        egg_id: ItemId,
    ) -> Result<UseIncubatorResponse> {
        if self.fail_commits {
            anyhow::bail!("Mock inventory configured to fail");
        }

        let mut state = self.state.write().await;
        let km_walked = state
            .player_stats
            .first()
            .map(|s| s.km_walked)
            .unwrap_or_default();

        let egg_index = state
            .eggs
            .iter()
            .position(|e| e.id == egg_id)
            .ok_or_else(|| anyhow::anyhow!("unknown egg {egg_id}"))?;
        if state.eggs[egg_index].incubator_id.is_some() {
            anyhow::bail!("egg {egg_id} is already incubating");
        }
        let km_target = state.eggs[egg_index].km_target;

        let incubator = state
            .incubators
            .iter_mut()
            .find(|i| &i.id == incubator_id)
            .ok_or_else(|| anyhow::anyhow!("unknown incubator {incubator_id}"))?;
        if !incubator.is_idle() {
            anyhow::bail!("incubator {incubator_id} is occupied");
        }
        if incubator.kind == IncubatorKind::Limited {
            if incubator.uses_remaining == 0 {
                anyhow::bail!("incubator {incubator_id} has no uses left");
            }
            incubator.uses_remaining -= 1;
        }
        incubator.egg_id = Some(egg_id);
        incubator.start_km_walked = km_walked;
        incubator.target_km_walked = km_walked + km_target;
        let target_km_walked = incubator.target_km_walked;

        state.eggs[egg_index].incubator_id = Some(incubator_id.clone());
        drop(state);

        info!(
            incubator_id = %incubator_id,
            egg_id = %egg_id,
            target_km_walked,
            "[MOCK] Egg incubating"
        );
        self.commits
            .write()
            .await
            .push((incubator_id.clone(), egg_id));

        Ok(UseIncubatorResponse { target_km_walked })
    }
}
