//! Belief records for the entities the agent observes.
//!
//! These are snapshots owned by the belief store and refreshed by the
//! runtime each turn; the decision engine only reads them.

use serde::{Deserialize, Serialize};

use crate::grid::Position;
use crate::ids::{AgentId, ParcelId};

/// A parcel the agent knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelRecord {
    /// The parcel's identifier.
    pub id: ParcelId,
    /// Last observed position.
    pub position: Position,
    /// Reward for delivering this parcel.
    pub reward: u32,
    /// The agent currently carrying the parcel, if any.
    pub carried_by: Option<AgentId>,
}

impl ParcelRecord {
    /// Whether this parcel is lying free on the grid.
    pub const fn is_available(&self) -> bool {
        self.carried_by.is_none()
    }
}

/// Another agent the agent knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// The agent's identifier.
    pub id: AgentId,
    /// Last observed position.
    pub position: Position,
}
