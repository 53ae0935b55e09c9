//! Error types for the courier runtime binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and scenario construction, so `main` can
//! propagate everything with `?`.

/// Top-level error for the courier runtime binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: courier_core::ConfigError,
    },

    /// Grid construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: courier_world::WorldError,
    },

    /// Scenario generation failed.
    #[error("scenario error: {message}")]
    Scenario {
        /// Description of the scenario failure.
        message: String,
    },
}
