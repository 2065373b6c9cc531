//! Render batching: the [`RenderGroup`] partition of map cells by tile.
//!
//! A renderer issues one batched draw per key of a `RenderGroup`, placing
//! one instance at every coordinate listed under it. Keys are exactly the
//! tiles present in the grid, and within a group coordinates are in
//! row-major scan order.

use std::collections::BTreeMap;

use crate::catalog::TileId;
use crate::geom::Pos;
use crate::grid::GridModel;

/// Coordinates of a grid grouped by the tile they hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderGroup {
    groups: BTreeMap<TileId, Vec<Pos>>,
}

/// Group every cell of `grid` by tile. Single row-major pass.
pub fn group(grid: &GridModel) -> RenderGroup {
    let mut groups: BTreeMap<TileId, Vec<Pos>> = BTreeMap::new();
    for (p, tile) in grid.iter() {
        groups.entry(tile).or_default().push(p);
    }
    log::debug!("grouped {} cells into {} batches", grid.dims().len(), groups.len());
    RenderGroup { groups }
}

impl RenderGroup {
    /// Move `pos` from the `from` group to the `to` group, as after a
    /// single-cell `set`. The result equals a fresh [`group`] of the updated
    /// grid provided `self` matched the grid before the write.
    pub fn apply_set(&mut self, pos: Pos, from: TileId, to: TileId) {
        if from == to {
            return;
        }
        if let Some(cells) = self.groups.get_mut(&from) {
            if let Ok(i) = cells.binary_search(&pos) {
                cells.remove(i);
            }
            if cells.is_empty() {
                self.groups.remove(&from);
            }
        }
        let cells = self.groups.entry(to).or_default();
        if let Err(i) = cells.binary_search(&pos) {
            cells.insert(i, pos);
        }
    }

    /// Coordinates holding `tile`, if any cell does.
    pub fn get(&self, tile: TileId) -> Option<&[Pos]> {
        self.groups.get(&tile).map(Vec::as_slice)
    }

    /// `(tile, coordinates)` pairs in ascending tile order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &[Pos])> + '_ {
        self.groups.iter().map(|(t, cells)| (*t, cells.as_slice()))
    }

    /// Tiles present in the grid, ascending.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.groups.keys().copied()
    }

    /// Number of batches (distinct tiles).
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of coordinates across all batches.
    pub fn cell_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
