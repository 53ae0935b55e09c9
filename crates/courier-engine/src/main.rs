//! Courier runtime binary.
//!
//! Wires together configuration, scenario generation, the belief store,
//! and the delivery strategy, then runs the simulated turn loop until the
//! parcels are delivered or the turn limit is reached.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `courier-config.yaml`
//! 3. Build the scenario (grid, parcels, wanderers) from the seed
//! 4. Assemble ground truth, belief store, and strategy
//! 5. Run the episode
//! 6. Log the result

mod error;
mod runner;
mod scenario;

use std::path::Path;

use courier_core::{CourierConfig, DeliveryStrategy};
use courier_world::BeliefState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::runner::SimState;

/// Application entry point for the courier runtime.
///
/// # Errors
///
/// Returns an error if configuration loading or scenario construction
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("courier-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        max_turns = config.world.max_turns,
        delivery_threshold = config.strategy.delivery_threshold,
        max_detour_distance = config.strategy.max_detour_distance,
        blocked_timeout = config.strategy.blocked_timeout,
        "Configuration loaded"
    );

    // 3. Build the scenario.
    let scenario = scenario::build_scenario(&config)?;

    // 4. Assemble ground truth, beliefs, and strategy.
    let mut state = SimState::from_scenario(scenario, config.world.seed);
    let mut beliefs = BeliefState::new(state.map.clone());
    let mut strategy = DeliveryStrategy::new(config.strategy.clone());
    info!(courier = %state.courier_id, "Simulation state assembled, entering turn loop");

    // 5. Run the episode.
    let result = runner::run_episode(
        &mut state,
        &mut beliefs,
        &mut strategy,
        config.world.max_turns,
        config.world.turn_interval_ms,
    )
    .await;

    // 6. Log the result.
    runner::log_episode_end(&result);

    info!(
        end_reason = ?result.end_reason,
        turns_executed = result.turns_executed,
        "courier-engine shutdown complete"
    );

    Ok(())
}

/// Load the configuration from `courier-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// falls back to defaults when the file does not exist.
fn load_config() -> Result<CourierConfig, EngineError> {
    let config_path = Path::new("courier-config.yaml");
    if config_path.exists() {
        let config = CourierConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(CourierConfig::default())
    }
}
