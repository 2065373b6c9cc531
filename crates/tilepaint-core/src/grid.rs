//! The [`GridModel`]: the authoritative rows×cols matrix of [`TileId`]s.
//!
//! A `GridModel` is a value: every mutation returns a new state and leaves
//! the receiver untouched. States share their backing buffer until one of
//! them is written (copy-on-write), so keeping old states around for
//! snapshots costs one pointer each.

use std::sync::Arc;

use crate::catalog::{TileCatalog, TileId};
use crate::error::{MapError, Result};
use crate::geom::{Dims, Pos};

/// A fixed-size map of tile ids, row-major, row 0 at the top.
///
/// Invariants: the dimensions never change, and every cell holds an id
/// below [`tile_count`](GridModel::tile_count).
#[derive(Debug, Clone)]
pub struct GridModel {
    dims: Dims,
    tile_count: usize,
    cells: Arc<Vec<TileId>>,
}

/// Number of cells in a `rows × cols` grid. Fails for an empty grid or one
/// whose buffer could not be addressed.
pub(crate) fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    Dims::new(rows, cols)
        .checked_len()
        .filter(|&n| n > 0 && n <= isize::MAX as usize / size_of::<TileId>())
        .ok_or(MapError::InvalidDimensions { rows, cols })
}

impl GridModel {
    /// Create a grid filled with the floor tile.
    pub fn new(rows: usize, cols: usize, catalog: &TileCatalog) -> Result<Self> {
        Self::filled(rows, cols, catalog, TileId::FLOOR)
    }

    /// Create a grid with every cell set to `tile`.
    pub fn filled(rows: usize, cols: usize, catalog: &TileCatalog, tile: TileId) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        catalog.check(tile)?;
        Ok(Self {
            dims: Dims::new(rows, cols),
            tile_count: catalog.len(),
            cells: Arc::new(vec![tile; len]),
        })
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    /// Size of the catalog this grid validates tile ids against.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        self.dims.contains(p)
    }

    /// Read one cell.
    pub fn get(&self, p: Pos) -> Result<TileId> {
        let i = self.index(p)?;
        Ok(self.cells[i])
    }

    /// Return a new state with the cell at `p` set to `tile`.
    pub fn set(&self, p: Pos, tile: TileId) -> Result<Self> {
        let i = self.index(p)?;
        self.check_tile(tile)?;
        if self.cells[i] == tile {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.cells)[i] = tile;
        Ok(next)
    }

    /// Return a new state holding `matrix`, which must have exactly this
    /// grid's dimensions and contain only known tiles.
    pub fn replace(&self, matrix: Vec<Vec<TileId>>) -> Result<Self> {
        if matrix.len() != self.dims.rows {
            return Err(self.shape_mismatch(format!("got {} rows", matrix.len())));
        }
        let mut cells = Vec::with_capacity(self.dims.len());
        for (row, line) in matrix.into_iter().enumerate() {
            if line.len() != self.dims.cols {
                return Err(self.shape_mismatch(format!(
                    "row {row} has {} columns",
                    line.len()
                )));
            }
            for tile in line {
                self.check_tile(tile)?;
                cells.push(tile);
            }
        }
        Ok(Self {
            dims: self.dims,
            tile_count: self.tile_count,
            cells: Arc::new(cells),
        })
    }

    /// Immutable row views, top to bottom.
    pub fn row_slices(&self) -> impl Iterator<Item = &[TileId]> + '_ {
        self.cells.chunks(self.dims.cols)
    }

    /// An owned copy of the matrix.
    pub fn to_matrix(&self) -> Vec<Vec<TileId>> {
        self.row_slices().map(<[TileId]>::to_vec).collect()
    }

    /// Row-major iterator over `(Pos, TileId)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Pos, TileId)> + '_ {
        self.dims.iter().zip(self.cells.iter().copied())
    }

    /// Whether two states still share one backing buffer.
    pub fn shares_storage(&self, other: &GridModel) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    // -- private helpers --

    fn index(&self, p: Pos) -> Result<usize> {
        self.dims.index(p).ok_or(MapError::OutOfBounds {
            pos: p,
            rows: self.dims.rows,
            cols: self.dims.cols,
        })
    }

    fn check_tile(&self, tile: TileId) -> Result<()> {
        if tile.index() < self.tile_count {
            Ok(())
        } else {
            Err(MapError::UnknownTile {
                tile,
                count: self.tile_count,
            })
        }
    }

    fn shape_mismatch(&self, detail: String) -> MapError {
        MapError::ShapeMismatch {
            rows: self.dims.rows,
            cols: self.dims.cols,
            detail,
        }
    }
}

impl PartialEq for GridModel {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.cells == other.cells
    }
}

impl Eq for GridModel {}
