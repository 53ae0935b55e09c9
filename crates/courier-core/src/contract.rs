//! Collaborator contracts the decision engine depends on.
//!
//! The engine needs two things from the outside world each turn: a read-only
//! view of the agent's beliefs ([`WorldView`]) and a route oracle
//! ([`Router`]). The traits keep the decision logic independent of how
//! beliefs are stored or how routes are computed -- production code uses the
//! `courier-world` implementations below, tests can script their own.

use courier_types::{AgentId, AgentRecord, Cell, Direction, ParcelRecord, Position};
use courier_world::{BeliefState, GridRouter};

/// Read-only view of the agent's beliefs about the world.
pub trait WorldView {
    /// The agent's own id, if known.
    fn my_id(&self) -> Option<AgentId>;

    /// The agent's own position, if known.
    fn my_position(&self) -> Option<Position>;

    /// All agents the agent knows about (may include itself).
    fn agents(&self) -> &[AgentRecord];

    /// Known parcels not currently carried by anyone.
    fn available_parcels(&self) -> Vec<ParcelRecord>;

    /// Whether a cell is a delivery tile.
    fn is_delivery_tile(&self, cell: Cell) -> bool;

    /// The delivery tile nearest to `from`, if any exists.
    fn closest_delivery_tile(&self, from: Cell) -> Option<Cell>;

    /// Cheap distance estimate between two cells, used to pre-filter
    /// detour candidates before any route is computed.
    fn heuristic_distance(&self, from: Cell, to: Cell) -> u32;
}

/// Route oracle over the grid.
pub trait Router {
    /// Shortest path from `start` to `goal`: the ordered cells after
    /// `start` up to and including `goal`. Empty means unreachable,
    /// unless `start == goal`.
    fn find_path(&self, start: Cell, goal: Cell) -> Vec<Cell>;

    /// The primitive move from `from` into the 4-adjacent cell `to`,
    /// or `None` if no such move exists.
    fn step_action(&self, from: Cell, to: Cell) -> Option<Direction>;
}

impl WorldView for BeliefState {
    fn my_id(&self) -> Option<AgentId> {
        Self::my_id(self)
    }

    fn my_position(&self) -> Option<Position> {
        Self::my_position(self)
    }

    fn agents(&self) -> &[AgentRecord] {
        Self::agents(self)
    }

    fn available_parcels(&self) -> Vec<ParcelRecord> {
        Self::available_parcels(self).cloned().collect()
    }

    fn is_delivery_tile(&self, cell: Cell) -> bool {
        Self::is_delivery_tile(self, cell)
    }

    fn closest_delivery_tile(&self, from: Cell) -> Option<Cell> {
        Self::closest_delivery_tile(self, from)
    }

    fn heuristic_distance(&self, from: Cell, to: Cell) -> u32 {
        from.manhattan_distance(to)
    }
}

impl Router for GridRouter<'_> {
    fn find_path(&self, start: Cell, goal: Cell) -> Vec<Cell> {
        Self::find_path(self, start, goal)
    }

    fn step_action(&self, from: Cell, to: Cell) -> Option<Direction> {
        Self::step_action(self, from, to)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courier_types::ParcelId;
    use courier_world::GridMap;

    use super::*;

    #[test]
    fn belief_state_world_view_filters_carried_parcels() {
        let map = GridMap::new(4, 4).unwrap();
        let mut beliefs = BeliefState::new(map);
        beliefs.observe_parcels(vec![
            ParcelRecord {
                id: ParcelId::new(),
                position: Position::new(1.0, 1.0),
                reward: 10,
                carried_by: None,
            },
            ParcelRecord {
                id: ParcelId::new(),
                position: Position::new(2.0, 2.0),
                reward: 20,
                carried_by: Some(AgentId::new()),
            },
        ]);

        let view: &dyn WorldView = &beliefs;
        assert_eq!(view.available_parcels().len(), 1);
    }

    #[test]
    fn heuristic_distance_is_manhattan() {
        let map = GridMap::new(4, 4).unwrap();
        let beliefs = BeliefState::new(map);
        let view: &dyn WorldView = &beliefs;
        assert_eq!(view.heuristic_distance(Cell::new(0, 0), Cell::new(3, 2)), 5);
    }

    #[test]
    fn grid_router_implements_router() {
        let map = GridMap::new(4, 4).unwrap();
        let router = GridRouter::new(&map);
        let r: &dyn Router = &router;
        assert_eq!(r.find_path(Cell::new(0, 0), Cell::new(2, 0)).len(), 2);
        assert_eq!(
            r.step_action(Cell::new(0, 0), Cell::new(1, 0)),
            Some(Direction::Right)
        );
    }
}
