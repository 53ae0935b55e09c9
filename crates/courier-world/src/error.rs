//! Error types for the `courier-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use courier_types::Cell;

/// Errors that can occur while building or mutating the grid world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The grid was created with a zero-sized dimension.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A tile coordinate falls outside the grid bounds.
    #[error("tile {cell} is outside the {width}x{height} grid")]
    TileOutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// A delivery tile was placed on a blocked cell.
    #[error("delivery tile {cell} is on a blocked cell")]
    DeliveryTileBlocked {
        /// The offending cell.
        cell: Cell,
    },
}
