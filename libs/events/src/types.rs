//! Signal type definitions for the incubator agent.
//!
//! Each signal type has a corresponding payload struct with the signal-specific data.

use hatchery_id::{ItemId, SlotId, SpeciesId};
use serde::{Deserialize, Serialize};

use crate::EventError;

// =============================================================================
// Signal Type Constants
// =============================================================================

/// All signal type names as constants.
pub mod signal_types {
    pub const EGG_HATCHED: &str = "egg.hatched";
    pub const INCUBATOR_STATUS: &str = "incubator.status";

    /// Every known signal type.
    pub const ALL: &[&str] = &[EGG_HATCHED, INCUBATOR_STATUS];
}

// =============================================================================
// Shared Enums
// =============================================================================

/// Incubator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncubatorKind {
    /// Never runs out of uses.
    Unlimited,
    /// Consumes one use per assignment.
    Limited,
}

impl IncubatorKind {
    /// Returns true for the reusable kind.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl std::fmt::Display for IncubatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncubatorKind::Unlimited => write!(f, "unlimited"),
            IncubatorKind::Limited => write!(f, "limited"),
        }
    }
}

// =============================================================================
// Signal Payloads
// =============================================================================

/// A remembered egg was found hatched in the latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggHatchedPayload {
    pub id: ItemId,
    pub species_id: SpeciesId,
    /// Trainer-independent pokemon level, in half-level steps.
    pub level: f64,
    pub cp: i32,
    pub max_cp: i32,
    /// IV perfection in percent, two decimal places.
    pub perfection: f64,
}

/// Progress of a single incubator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncubatorStatusPayload {
    pub incubator_id: SlotId,
    /// True when the egg was put into the incubator during this pass.
    pub was_added_now: bool,
    pub item_id: ItemId,
    pub km_to_walk: f64,
    pub km_remaining: f64,
}

// =============================================================================
// Signal
// =============================================================================

/// A signal emitted by one agent pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal_type", content = "payload")]
pub enum Signal {
    #[serde(rename = "egg.hatched")]
    EggHatched(EggHatchedPayload),
    #[serde(rename = "incubator.status")]
    IncubatorStatus(IncubatorStatusPayload),
}

impl Signal {
    /// Returns the signal type name.
    pub fn signal_type(&self) -> &'static str {
        match self {
            Signal::EggHatched(_) => signal_types::EGG_HATCHED,
            Signal::IncubatorStatus(_) => signal_types::INCUBATOR_STATUS,
        }
    }

    /// Serialize to a single JSON line.
    pub fn to_json(&self) -> Result<String, EventError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a signal, rejecting unknown signal types with a dedicated error.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let signal_type = value
            .get("signal_type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EventError::InvalidPayload("missing signal_type".to_string()))?;

        if !signal_types::ALL.contains(&signal_type) {
            return Err(EventError::UnknownSignalType(signal_type.to_string()));
        }

        serde_json::from_value(value).map_err(|e| EventError::InvalidPayload(e.to_string()))
    }
}

impl From<EggHatchedPayload> for Signal {
    fn from(payload: EggHatchedPayload) -> Self {
        Signal::EggHatched(payload)
    }
}

impl From<IncubatorStatusPayload> for Signal {
    fn from(payload: IncubatorStatusPayload) -> Self {
        Signal::IncubatorStatus(payload)
    }
}

// =============================================================================
// Tests
// =============================================================================
