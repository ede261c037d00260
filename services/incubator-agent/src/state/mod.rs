//! Local state persistence for the incubator agent.
//!
//! This module provides a JSON file store for the remembered
//! `incubator -> egg` assignments.
//!
//! The inventory service never tells us when an egg hatched. Remembering
//! which eggs we put into incubators lets the next pass notice that one of
//! them turned into a pokemon, even across agent restarts.

mod store;

pub use store::{StoreError, UsageStore, USAGE_FILE_NAME};
