//! The action vocabulary the decision engine hands back to the runtime.
//!
//! Exactly one [`Action`] is produced per turn. Inaction is the explicit
//! [`Action::Wait`] variant rather than an absent value, so the runtime
//! matches exhaustively and a forgotten branch is a compile error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::Direction;
use crate::ids::{AgentId, ParcelId};

/// One turn's decision, produced fresh each call and never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Deposit every carried parcel on the current tile.
    Putdown,
    /// Pick up the parcel with the given id from the current tile.
    Pickup {
        /// The parcel to collect.
        parcel: ParcelId,
    },
    /// Step one cell in the given direction.
    Move {
        /// The direction to step.
        direction: Direction,
    },
    /// Do nothing this turn.
    Wait,
}

/// A per-turn decision record emitted by the runtime for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The turn number the decision was made on.
    pub turn: u64,
    /// The deciding agent.
    pub agent: AgentId,
    /// The action taken.
    pub action: Action,
    /// Real-world decision timestamp.
    pub decided_at: DateTime<Utc>,
}
