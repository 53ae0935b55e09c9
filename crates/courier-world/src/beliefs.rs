//! The agent's belief store.
//!
//! [`BeliefState`] is the snapshot of the world the agent decides from: its
//! own id and position, the other agents it has seen, the parcels it knows
//! about, and the static [`GridMap`]. The runtime refreshes the dynamic
//! parts each turn via the `observe_*` methods; the decision engine only
//! reads.
//!
//! Own id and position start unknown -- a decision engine querying an
//! unprimed store must degrade gracefully rather than assume a location.

use courier_types::{AgentId, AgentRecord, Cell, ParcelRecord, Position};
use tracing::trace;

use crate::grid_map::GridMap;

/// The agent's view of the world, refreshed once per turn.
#[derive(Debug, Clone)]
pub struct BeliefState {
    /// The static grid the agent operates on.
    map: GridMap,
    /// The agent's own id, once known.
    my_id: Option<AgentId>,
    /// The agent's own position, once known.
    my_position: Option<Position>,
    /// Last observed set of agents (may include the agent itself).
    agents: Vec<AgentRecord>,
    /// Last observed set of parcels.
    parcels: Vec<ParcelRecord>,
}

impl BeliefState {
    /// Create a belief store over the given map with nothing observed yet.
    pub const fn new(map: GridMap) -> Self {
        Self {
            map,
            my_id: None,
            my_position: None,
            agents: Vec::new(),
            parcels: Vec::new(),
        }
    }

    // -------------------------------------------------------------------
    // Observation (runtime-facing)
    // -------------------------------------------------------------------

    /// Record the agent's own identity and position.
    pub fn observe_self(&mut self, id: AgentId, position: Position) {
        self.my_id = Some(id);
        self.my_position = Some(position);
    }

    /// Replace the observed agent set.
    pub fn observe_agents(&mut self, agents: Vec<AgentRecord>) {
        trace!(agent_count = agents.len(), "agent beliefs refreshed");
        self.agents = agents;
    }

    /// Replace the observed parcel set.
    pub fn observe_parcels(&mut self, parcels: Vec<ParcelRecord>) {
        trace!(parcel_count = parcels.len(), "parcel beliefs refreshed");
        self.parcels = parcels;
    }

    // -------------------------------------------------------------------
    // Queries (decision-engine-facing)
    // -------------------------------------------------------------------

    /// The agent's own id, if known.
    pub const fn my_id(&self) -> Option<AgentId> {
        self.my_id
    }

    /// The agent's own position, if known.
    pub const fn my_position(&self) -> Option<Position> {
        self.my_position
    }

    /// All observed agents.
    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    /// All observed parcels.
    pub fn parcels(&self) -> &[ParcelRecord] {
        &self.parcels
    }

    /// Observed parcels not carried by anyone.
    pub fn available_parcels(&self) -> impl Iterator<Item = &ParcelRecord> {
        self.parcels.iter().filter(|p| p.is_available())
    }

    /// The static map.
    pub const fn map(&self) -> &GridMap {
        &self.map
    }

    /// Whether a cell is a delivery tile.
    pub fn is_delivery_tile(&self, cell: Cell) -> bool {
        self.map.is_delivery_tile(cell)
    }

    /// The delivery tile nearest to `from`, if the map has any.
    pub fn closest_delivery_tile(&self, from: Cell) -> Option<Cell> {
        self.map.closest_delivery_tile(from)
    }
}
