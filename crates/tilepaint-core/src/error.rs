//! The [`MapError`] taxonomy shared by every core operation.

use crate::catalog::TileId;
use crate::geom::Pos;

/// Errors raised by grid, paint, catalog, and serializer operations.
///
/// Every operation that returns one of these leaves the map exactly as it
/// was before the call.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("invalid grid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cell {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds { pos: Pos, rows: usize, cols: usize },

    #[error("tile {tile} is not in the catalog ({count} tiles)")]
    UnknownTile { tile: TileId, count: usize },

    #[error("map shape mismatch: expected {rows}x{cols}, {detail}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        detail: String,
    },

    #[error("map is not valid JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("an import is already in progress")]
    ImportInProgress,

    #[error("invalid tile catalog: {0}")]
    InvalidCatalog(String),
}

/// Convenience alias used across the crate.
pub type Result<T, E = MapError> = std::result::Result<T, E>;
