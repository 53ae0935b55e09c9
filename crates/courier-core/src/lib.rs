//! Detour-evaluation and path-following decision engine for the courier
//! delivery agent.
//!
//! This crate owns the per-turn decision: while the agent carries parcels,
//! exactly one [`Action`] is produced each turn -- deliver, grab a worthwhile
//! detour parcel, advance along the committed route, or wait.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `courier-config.yaml` into
//!   strongly-typed structs.
//! - [`contract`] -- The [`WorldView`] and [`Router`] collaborator traits
//!   and their `courier-world` implementations.
//! - [`detour`] -- Pure greedy evaluation of detour-parcel candidates.
//! - [`delivery`] -- [`DeliveryStrategy`]: carried-set maintenance, lazy
//!   route recomputation, and blocking recovery.
//!
//! [`Action`]: courier_types::Action
//! [`WorldView`]: contract::WorldView
//! [`Router`]: contract::Router
//! [`DeliveryStrategy`]: delivery::DeliveryStrategy

pub mod config;
pub mod contract;
pub mod delivery;
pub mod detour;

// Re-export primary types at crate root.
pub use config::{ConfigError, CourierConfig, ScenarioConfig, StrategyConfig, WorldSetupConfig};
pub use contract::{Router, WorldView};
pub use delivery::{BlockState, DeliveryStrategy, is_path_leading_to};
pub use detour::{DetourCandidate, evaluate_detour_parcels};
