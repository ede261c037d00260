//! # hatchery-id
//!
//! Typed identifiers for the hatchery workspace.
//!
//! ## Design Principles
//!
//! - Identifiers are assigned by the inventory service; we never mint them
//! - Every identifier has a canonical string form with strict parsing
//! - Identifiers serialize as the bare wire value (string or number) so the
//!   persisted usage file stays compatible with what the service reports
//! - Identifiers are typed to prevent mixing an egg ID with a species ID
//!
//! ## Identifier Kinds
//!
//! - `SlotId`: opaque incubator identifier, e.g. `EggIncubatorProto4824214944684084552`
//! - `ItemId`: numeric egg/pokemon identifier, e.g. `9216440395718049831`
//! - `SpeciesId`: numeric pokedex number, e.g. `147`

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
