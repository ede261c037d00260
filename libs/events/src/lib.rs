//! # hatchery-events
//!
//! Signal definitions for the hatchery workspace.
//!
//! ## Design Principles
//!
//! - Signals are immutable notifications about observed state, never commands
//! - Hatch signals are derived from the inventory snapshot, not from a
//!   server-side callback
//! - Signals serialize with a `signal_type` tag so downstream consumers can
//!   route them without knowing every payload
//!
//! ## Signal Types
//!
//! - `egg.hatched`: a remembered egg has turned into a pokemon
//! - `incubator.status`: progress of an occupied incubator, or a fresh assignment

mod error;
mod types;

pub use error::EventError;
pub use types::*;
