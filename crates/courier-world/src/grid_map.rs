//! The static grid: bounds, blocked cells, and delivery tiles.
//!
//! A [`GridMap`] is the spatial backbone of the courier world. It answers
//! walkability and delivery-tile membership queries and finds the delivery
//! tile nearest to a cell. The map is immutable during an episode; the
//! runtime builds it once at startup and the belief store keeps a copy.

use std::collections::BTreeSet;

use courier_types::Cell;

use crate::error::WorldError;

/// A rectangular grid with blocked cells and delivery tiles.
///
/// Cells with `0 <= x < width` and `0 <= y < height` are in bounds; an
/// in-bounds cell is walkable unless explicitly blocked. Delivery tiles
/// are always walkable (insertion validates this).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GridMap {
    /// Number of columns.
    width: u32,
    /// Number of rows.
    height: u32,
    /// Cells agents cannot enter.
    blocked: BTreeSet<Cell>,
    /// Cells where carried parcels may be deposited.
    delivery: BTreeSet<Cell>,
}

impl GridMap {
    /// Create an empty map with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            blocked: BTreeSet::new(),
            delivery: BTreeSet::new(),
        })
    }

    /// Grid width in columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether a cell lies inside the grid bounds.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        u32::try_from(cell.x).is_ok_and(|x| x < self.width)
            && u32::try_from(cell.y).is_ok_and(|y| y < self.height)
    }

    /// Mark a cell as blocked.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOutOfBounds`] if the cell is outside the
    /// grid, or [`WorldError::DeliveryTileBlocked`] if the cell already
    /// holds a delivery tile.
    pub fn set_blocked(&mut self, cell: Cell) -> Result<(), WorldError> {
        if !self.in_bounds(cell) {
            return Err(WorldError::TileOutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            });
        }
        if self.delivery.contains(&cell) {
            return Err(WorldError::DeliveryTileBlocked { cell });
        }
        self.blocked.insert(cell);
        Ok(())
    }

    /// Mark a cell as a delivery tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOutOfBounds`] if the cell is outside the
    /// grid, or [`WorldError::DeliveryTileBlocked`] if the cell is blocked.
    pub fn add_delivery_tile(&mut self, cell: Cell) -> Result<(), WorldError> {
        if !self.in_bounds(cell) {
            return Err(WorldError::TileOutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            });
        }
        if self.blocked.contains(&cell) {
            return Err(WorldError::DeliveryTileBlocked { cell });
        }
        self.delivery.insert(cell);
        Ok(())
    }

    /// Whether a cell can be entered.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.blocked.contains(&cell)
    }

    /// Whether a cell is a delivery tile.
    pub fn is_delivery_tile(&self, cell: Cell) -> bool {
        self.delivery.contains(&cell)
    }

    /// Iterate over all delivery tiles.
    pub fn delivery_tiles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.delivery.iter().copied()
    }

    /// Number of delivery tiles on the map.
    pub fn delivery_tile_count(&self) -> usize {
        self.delivery.len()
    }

    /// The delivery tile with minimum Manhattan distance from `from`.
    ///
    /// Ties are broken by the map's cell ordering (x, then y), so the
    /// result is deterministic for reproducible runs. Returns `None` when
    /// the map has no delivery tiles.
    pub fn closest_delivery_tile(&self, from: Cell) -> Option<Cell> {
        self.delivery
            .iter()
            .copied()
            .min_by_key(|tile| (from.manhattan_distance(*tile), *tile))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_map() -> GridMap {
        GridMap::new(5, 4).unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction and bounds
    // -----------------------------------------------------------------------

    #[test]
    fn zero_dimension_rejected() {
        assert!(GridMap::new(0, 4).is_err());
        assert!(GridMap::new(5, 0).is_err());
    }

    #[test]
    fn bounds_checks() {
        let map = make_map();
        assert!(map.in_bounds(Cell::new(0, 0)));
        assert!(map.in_bounds(Cell::new(4, 3)));
        assert!(!map.in_bounds(Cell::new(5, 0)));
        assert!(!map.in_bounds(Cell::new(0, 4)));
        assert!(!map.in_bounds(Cell::new(-1, 0)));
    }

    #[test]
    fn out_of_bounds_tiles_rejected() {
        let mut map = make_map();
        assert!(map.set_blocked(Cell::new(7, 0)).is_err());
        assert!(map.add_delivery_tile(Cell::new(0, -2)).is_err());
    }

    // -----------------------------------------------------------------------
    // Walkability and delivery tiles
    // -----------------------------------------------------------------------

    #[test]
    fn blocked_cell_not_walkable() {
        let mut map = make_map();
        map.set_blocked(Cell::new(2, 2)).unwrap();
        assert!(!map.is_walkable(Cell::new(2, 2)));
        assert!(map.is_walkable(Cell::new(2, 1)));
    }

    #[test]
    fn delivery_tile_membership() {
        let mut map = make_map();
        map.add_delivery_tile(Cell::new(4, 0)).unwrap();
        assert!(map.is_delivery_tile(Cell::new(4, 0)));
        assert!(!map.is_delivery_tile(Cell::new(0, 0)));
        assert_eq!(map.delivery_tile_count(), 1);
    }

    #[test]
    fn delivery_and_blocked_are_exclusive() {
        let mut map = make_map();
        map.add_delivery_tile(Cell::new(1, 1)).unwrap();
        assert!(map.set_blocked(Cell::new(1, 1)).is_err());

        map.set_blocked(Cell::new(2, 2)).unwrap();
        assert!(map.add_delivery_tile(Cell::new(2, 2)).is_err());
    }

    // -----------------------------------------------------------------------
    // Closest delivery tile
    // -----------------------------------------------------------------------

    #[test]
    fn closest_delivery_tile_none_when_empty() {
        let map = make_map();
        assert_eq!(map.closest_delivery_tile(Cell::new(0, 0)), None);
    }

    #[test]
    fn closest_delivery_tile_picks_minimum_distance() {
        let mut map = make_map();
        map.add_delivery_tile(Cell::new(4, 3)).unwrap();
        map.add_delivery_tile(Cell::new(1, 0)).unwrap();
        assert_eq!(
            map.closest_delivery_tile(Cell::new(0, 0)),
            Some(Cell::new(1, 0))
        );
        assert_eq!(
            map.closest_delivery_tile(Cell::new(4, 2)),
            Some(Cell::new(4, 3))
        );
    }

    #[test]
    fn map_roundtrip_serde() {
        let mut map = make_map();
        map.set_blocked(Cell::new(2, 2)).unwrap();
        map.add_delivery_tile(Cell::new(4, 0)).unwrap();

        let json = serde_json::to_string(&map).ok();
        assert!(json.is_some());
        let restored: GridMap = serde_json::from_str(json.as_deref().unwrap_or("")).unwrap();
        assert!(!restored.is_walkable(Cell::new(2, 2)));
        assert!(restored.is_delivery_tile(Cell::new(4, 0)));
        assert_eq!(restored.width(), 5);
    }

    #[test]
    fn closest_delivery_tile_tie_breaks_deterministically() {
        let mut map = make_map();
        // Both tiles are distance 1 from (1, 0); (0, 0) wins on ordering.
        map.add_delivery_tile(Cell::new(0, 0)).unwrap();
        map.add_delivery_tile(Cell::new(2, 0)).unwrap();
        assert_eq!(
            map.closest_delivery_tile(Cell::new(1, 0)),
            Some(Cell::new(0, 0))
        );
    }
}
