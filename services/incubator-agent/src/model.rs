//! Inventory model as reported by the inventory service.
//!
//! Everything here is rebuilt from a fresh snapshot on every pass; only
//! assignment records outlive a pass (see `state`).

use hatchery_events::IncubatorKind;
use hatchery_id::{ItemId, SlotId, SpeciesId};
use serde::{Deserialize, Serialize};

/// An egg incubator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incubator {
    pub id: SlotId,
    pub kind: IncubatorKind,
    /// Egg currently inside, if any.
    #[serde(default)]
    pub egg_id: Option<ItemId>,
    /// Remaining uses. Ignored for unlimited incubators.
    #[serde(default)]
    pub uses_remaining: u32,
    #[serde(default)]
    pub start_km_walked: f64,
    #[serde(default)]
    pub target_km_walked: f64,
}

impl Incubator {
    /// Returns true if no egg is inside.
    pub fn is_idle(&self) -> bool {
        self.egg_id.is_none()
    }

    /// Returns true if the incubator may be considered for this pass.
    pub fn is_usable(&self) -> bool {
        self.kind.is_unlimited() || self.uses_remaining > 0
    }

    /// Total distance of the egg inside.
    pub fn km_to_walk(&self) -> f64 {
        self.target_km_walked - self.start_km_walked
    }
}

/// An egg waiting to hatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    pub id: ItemId,
    /// Incubator holding this egg, if any.
    #[serde(default)]
    pub incubator_id: Option<SlotId>,
    /// Distance tier of the egg (2, 5, 10 km).
    pub km_target: f64,
    #[serde(default)]
    pub km_start: f64,
}

impl Egg {
    /// Returns true if the egg is not in any incubator.
    pub fn is_unused(&self) -> bool {
        self.incubator_id.is_none()
    }

    /// Distance still to walk before the egg hatches.
    pub fn km_remaining(&self) -> f64 {
        self.km_target - self.km_start
    }
}

/// Player progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Total distance walked, never decreases.
    pub km_walked: f64,
    pub level: u32,
}

/// A pokemon or an egg, as listed in the full inventory.
///
/// Eggs and the pokemon they hatch into share the same ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: ItemId,
    #[serde(default)]
    pub species_id: SpeciesId,
    pub is_egg: bool,
    #[serde(default)]
    pub cp: i32,
    #[serde(default)]
    pub cp_multiplier: f64,
    #[serde(default)]
    pub additional_cp_multiplier: f64,
    #[serde(default)]
    pub individual_attack: u8,
    #[serde(default)]
    pub individual_defense: u8,
    #[serde(default)]
    pub individual_stamina: u8,
    #[serde(default)]
    pub base_attack: u16,
    #[serde(default)]
    pub base_defense: u16,
    #[serde(default)]
    pub base_stamina: u16,
}

impl Pokemon {
    /// Returns true once the egg has hatched.
    pub fn is_hatched(&self) -> bool {
        !self.is_egg
    }
}

/// One full inventory read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Zero or one entries; the service reports stats as a list.
    #[serde(default)]
    pub player_stats: Vec<PlayerStats>,
    #[serde(default)]
    pub incubators: Vec<Incubator>,
    #[serde(default)]
    pub eggs: Vec<Egg>,
    #[serde(default)]
    pub pokemon: Vec<Pokemon>,
}

/// Response to putting an egg into an incubator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseIncubatorResponse {
    /// Distance walked at which the egg will hatch.
    pub target_km_walked: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incubator(kind: IncubatorKind, uses: u32) -> Incubator {
        Incubator {
            id: SlotId::parse("inc_1").unwrap(),
            kind,
            egg_id: None,
            uses_remaining: uses,
            start_km_walked: 0.0,
            target_km_walked: 0.0,
        }
    }

    #[test]
    fn test_incubator_usable() {
        assert!(incubator(IncubatorKind::Unlimited, 0).is_usable());
        assert!(incubator(IncubatorKind::Limited, 1).is_usable());
        assert!(!incubator(IncubatorKind::Limited, 0).is_usable());
    }

    #[test]
    fn test_incubator_km_to_walk() {
        let mut inc = incubator(IncubatorKind::Limited, 2);
        assert!(inc.is_idle());
        inc.egg_id = Some(ItemId::new(1));
        inc.start_km_walked = 100.0;
        inc.target_km_walked = 105.0;
        assert!(!inc.is_idle());
        assert_eq!(inc.km_to_walk(), 5.0);
    }

    #[test]
    fn test_egg_remaining() {
        let egg = Egg {
            id: ItemId::new(3),
            incubator_id: None,
            km_target: 10.0,
            km_start: 2.5,
        };
        assert!(egg.is_unused());
        assert_eq!(egg.km_remaining(), 7.5);
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot: InventorySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.player_stats.is_empty());
        assert!(snapshot.incubators.is_empty());
    }

    #[test]
    fn test_pokemon_from_minimal_json() {
        let pokemon: Pokemon = serde_json::from_str(r#"{"id": 9, "is_egg": true}"#).unwrap();
        assert!(!pokemon.is_hatched());
        assert_eq!(pokemon.species_id, SpeciesId::new(0));
    }
}
