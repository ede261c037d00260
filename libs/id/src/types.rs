//! Typed ID definitions for inventory resources.
//!
//! Incubator IDs are opaque strings handed out by the inventory service.
//! Egg and species IDs are plain numbers.

use crate::define_numeric_id;

// =============================================================================
// Eggs and Pokemon
// =============================================================================

// An egg keeps its ID when it hatches, so the same `ItemId` names the
// pending egg and the pokemon it becomes.
define_numeric_id!(ItemId, u64, "item");
define_numeric_id!(SpeciesId, u32, "species");

// =============================================================================
// Incubators
// =============================================================================

/// Opaque incubator identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(String);

impl SlotId {
    /// Human readable kind of this ID.
    pub const KIND: &'static str = "slot";

    /// Parses a slot ID.
    ///
    /// Any non-empty string is accepted as-is; the inventory service owns
    /// the format.
    pub fn parse(s: &str) -> Result<Self, crate::IdError> {
        if s.is_empty() {
            return Err(crate::IdError::Empty);
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SlotId {
    type Err = crate::IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlotId {
    type Error = crate::IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl AsRef<str> for SlotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SlotId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SlotId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_item_id_roundtrip() {
        let id = ItemId::new(9_216_440_395_718_049_831);
        let s = id.to_string();
        let parsed: ItemId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_item_id_empty() {
        let result: Result<ItemId, _> = "  ".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::Empty));
    }

    #[test]
    fn test_item_id_invalid_number() {
        let result: Result<ItemId, _> = "egg-42".parse();
        let err = result.unwrap_err();
        assert!(err.is_number_error());
        assert!(err.to_string().contains("item"));
    }

    #[test]
    fn test_item_id_json_is_bare_number() {
        let id = ItemId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let parsed: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_species_id_rejects_negative() {
        let result: Result<SpeciesId, _> = "-1".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_slot_id_parse() {
        let id: SlotId = "EggIncubatorProto-1".parse().unwrap();
        assert_eq!(id.as_str(), "EggIncubatorProto-1");
        assert_eq!(SlotId::KIND, "slot");
    }

    #[test]
    fn test_slot_id_empty() {
        let result: Result<SlotId, _> = "".parse();
        assert!(result.unwrap_err().is_empty());
    }

    #[test]
    fn test_slot_id_keeps_whitespace() {
        let id: SlotId = " slot a\t".parse().unwrap();
        assert_eq!(id.as_str(), " slot a\t");

        let parsed: SlotId = serde_json::from_str("\"incubator 2\"").unwrap();
        assert_eq!(parsed.as_str(), "incubator 2");
    }

    #[test]
    fn test_slot_id_json_is_bare_string() {
        let id = SlotId::parse("inc_1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"inc_1\"");
        let parsed: SlotId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_slot_id_json_rejects_empty() {
        let result: Result<SlotId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_item_id_display_parse(raw in any::<u64>()) {
            let id = ItemId::new(raw);
            prop_assert_eq!(ItemId::parse(&id.to_string()).unwrap(), id);
        }

        #[test]
        fn prop_slot_id_accepts_any_non_empty(raw in "\\PC{1,64}") {
            let id = SlotId::parse(&raw).unwrap();
            prop_assert_eq!(id.as_str(), raw.as_str());
        }
    }
}
