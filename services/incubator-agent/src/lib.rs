//! hatchery incubator agent library
//!
//! The agent keeps a player's egg incubators busy. Every pass it reads the
//! inventory, reports eggs that hatched since the previous pass, fills idle
//! incubators and remembers which egg went where.
//!
//! ## Modules
//!
//! - `allocator`: Egg to incubator pairing rules
//! - `detector`: Hatch detection from remembered assignments
//! - `reconciler`: One pass end to end, plus the periodic loop
//! - `state`: JSON usage file
//! - `inventory` / `client`: Inventory seams, mock and HTTP implementations
//! - `sink`: Signal delivery

pub mod allocator;
pub mod client;
pub mod config;
pub mod detector;
pub mod error;
pub mod inventory;
pub mod model;
pub mod pokemon;
pub mod reconciler;
pub mod sink;
pub mod state;

pub use allocator::{Allocation, AllocationPolicy, Allocator};
pub use error::AgentError;
pub use reconciler::{Reconciler, ReconcilerConfig, RunOutcome, RunReport};
