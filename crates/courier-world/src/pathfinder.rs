//! Shortest-path routing over the grid.
//!
//! [`GridRouter`] runs a breadth-first search over walkable 4-neighbors.
//! Every step has uniform cost, so BFS yields shortest paths; neighbor
//! expansion follows the fixed order of [`Direction::ALL`], which makes the
//! chosen path deterministic when several shortest paths exist.
//!
//! Path shape: the returned sequence excludes the origin and includes the
//! destination, so its length equals the number of moves. An empty path
//! means the destination is unreachable -- unless origin and destination
//! are the same cell, which also yields an empty path and zero moves.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use courier_types::{Cell, Direction};

use crate::grid_map::GridMap;

/// Breadth-first router over a [`GridMap`].
#[derive(Debug, Clone, Copy)]
pub struct GridRouter<'a> {
    /// The map routed over.
    map: &'a GridMap,
}

impl<'a> GridRouter<'a> {
    /// Create a router over the given map.
    pub const fn new(map: &'a GridMap) -> Self {
        Self { map }
    }

    /// Find a shortest path from `start` to `goal`.
    ///
    /// Returns the ordered cells after `start` up to and including `goal`.
    /// Returns an empty vector when `start == goal` or when no path exists
    /// (unreachable goal, blocked goal, or out-of-bounds endpoints).
    pub fn find_path(&self, start: Cell, goal: Cell) -> Vec<Cell> {
        if start == goal {
            return Vec::new();
        }
        if !self.map.in_bounds(start) || !self.map.is_walkable(goal) {
            return Vec::new();
        }

        // Predecessor map for path reconstruction.
        let mut prev: BTreeMap<Cell, Cell> = BTreeMap::new();
        let mut visited: BTreeSet<Cell> = BTreeSet::new();
        let mut queue: VecDeque<Cell> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        'search: while let Some(current) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(next) = direction.apply(current) else {
                    continue;
                };
                if !self.map.is_walkable(next) || !visited.insert(next) {
                    continue;
                }
                prev.insert(next, current);
                if next == goal {
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        // Reconstruct path, excluding the start cell.
        if !prev.contains_key(&goal) {
            return Vec::new();
        }

        let mut path = VecDeque::new();
        let mut current = goal;
        path.push_front(current);
        while let Some(&predecessor) = prev.get(&current) {
            if predecessor == start {
                break;
            }
            path.push_front(predecessor);
            current = predecessor;
        }

        path.into_iter().collect()
    }

    /// The primitive move that advances `from` into the adjacent cell `to`.
    ///
    /// Returns `None` when the cells are not 4-adjacent or when `to` is not
    /// walkable.
    pub fn step_action(&self, from: Cell, to: Cell) -> Option<Direction> {
        Direction::between(from, to).filter(|_| self.map.is_walkable(to))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::WorldError;

    fn open_map() -> GridMap {
        GridMap::new(6, 6).unwrap()
    }

    fn walled_map() -> Result<GridMap, WorldError> {
        // A vertical wall at x = 2 with a gap at y = 4.
        let mut map = GridMap::new(6, 6)?;
        for y in 0..4 {
            map.set_blocked(Cell::new(2, y))?;
        }
        map.set_blocked(Cell::new(2, 5))?;
        Ok(map)
    }

    // -----------------------------------------------------------------------
    // find_path
    // -----------------------------------------------------------------------

    #[test]
    fn straight_line_path() {
        let map = open_map();
        let router = GridRouter::new(&map);
        let path = router.find_path(Cell::new(0, 0), Cell::new(3, 0));
        assert_eq!(
            path,
            vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]
        );
    }

    #[test]
    fn path_excludes_origin_and_includes_goal() {
        let map = open_map();
        let router = GridRouter::new(&map);
        let start = Cell::new(1, 1);
        let goal = Cell::new(4, 3);
        let path = router.find_path(start, goal);

        assert!(!path.contains(&start));
        assert_eq!(path.last().copied(), Some(goal));
        // First step must be adjacent to the start.
        let first = path.first().copied().unwrap();
        assert!(Direction::between(start, first).is_some());
        // Manhattan distance on an open grid is the optimal move count.
        let moves = u32::try_from(path.len()).unwrap();
        assert_eq!(moves, start.manhattan_distance(goal));
    }

    #[test]
    fn same_start_and_goal_yields_empty_path() {
        let map = open_map();
        let router = GridRouter::new(&map);
        assert!(router.find_path(Cell::new(2, 2), Cell::new(2, 2)).is_empty());
    }

    #[test]
    fn path_routes_around_wall() {
        let map = walled_map().unwrap();
        let router = GridRouter::new(&map);
        let path = router.find_path(Cell::new(0, 0), Cell::new(5, 0));

        assert_eq!(path.last().copied(), Some(Cell::new(5, 0)));
        // The only crossing is the gap at (2, 4).
        assert!(path.contains(&Cell::new(2, 4)));
        assert!(!path.iter().any(|c| c.x == 2 && c.y != 4));
    }

    #[test]
    fn unreachable_goal_yields_empty_path() {
        // Seal the goal behind a full wall.
        let mut map = GridMap::new(6, 6).unwrap();
        for y in 0..6 {
            map.set_blocked(Cell::new(2, y)).unwrap();
        }
        let router = GridRouter::new(&map);
        assert!(router.find_path(Cell::new(0, 0), Cell::new(5, 0)).is_empty());
    }

    #[test]
    fn blocked_goal_yields_empty_path() {
        let mut map = GridMap::new(6, 6).unwrap();
        map.set_blocked(Cell::new(3, 3)).unwrap();
        let router = GridRouter::new(&map);
        assert!(router.find_path(Cell::new(0, 0), Cell::new(3, 3)).is_empty());
    }

    #[test]
    fn out_of_bounds_endpoints_yield_empty_path() {
        let map = open_map();
        let router = GridRouter::new(&map);
        assert!(router.find_path(Cell::new(-1, 0), Cell::new(3, 0)).is_empty());
        assert!(router.find_path(Cell::new(0, 0), Cell::new(9, 9)).is_empty());
    }

    // -----------------------------------------------------------------------
    // step_action
    // -----------------------------------------------------------------------

    #[test]
    fn step_action_resolves_adjacent_moves() {
        let map = open_map();
        let router = GridRouter::new(&map);
        assert_eq!(
            router.step_action(Cell::new(1, 1), Cell::new(2, 1)),
            Some(Direction::Right)
        );
        assert_eq!(
            router.step_action(Cell::new(1, 1), Cell::new(1, 0)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn step_action_rejects_non_adjacent_cells() {
        let map = open_map();
        let router = GridRouter::new(&map);
        assert_eq!(router.step_action(Cell::new(1, 1), Cell::new(3, 1)), None);
        assert_eq!(router.step_action(Cell::new(1, 1), Cell::new(2, 2)), None);
    }

    #[test]
    fn step_action_rejects_unwalkable_target() {
        let mut map = open_map();
        map.set_blocked(Cell::new(2, 1)).unwrap();
        let router = GridRouter::new(&map);
        assert_eq!(router.step_action(Cell::new(1, 1), Cell::new(2, 1)), None);
    }
}
