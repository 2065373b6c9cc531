//! Glyph-keyed JSON interchange: [`MapSerializer`].
//!
//! ## Format
//!
//! A JSON array of `rows` arrays, each holding `cols` glyph strings:
//!
//! ```text
//! [["▫️","⬛"],["⬛","▫️"]]
//! ```
//!
//! Import is strict about shape and lenient about content: any entry that
//! is not a known glyph becomes the floor tile.

use serde_json::Value;

use crate::catalog::{TileCatalog, TileId};
use crate::error::{MapError, Result};
use crate::grid::GridModel;

/// Converts grids to and from the interchange format using a catalog's
/// glyphs.
#[derive(Debug, Clone, Copy)]
pub struct MapSerializer<'a> {
    catalog: &'a TileCatalog,
}

impl<'a> MapSerializer<'a> {
    pub fn new(catalog: &'a TileCatalog) -> Self {
        Self { catalog }
    }

    /// Render `grid` as a compact JSON array of glyph rows.
    pub fn export(&self, grid: &GridModel) -> Result<String> {
        let rows = grid
            .row_slices()
            .map(|row| row.iter().map(|&t| self.glyph(t)).collect())
            .collect::<Result<Vec<Vec<&str>>>>()?;
        Ok(serde_json::to_string(&rows)?)
    }

    /// Parse `text` into a new state of `target`.
    ///
    /// The input must be exactly `target.rows()` × `target.cols()`; the
    /// dimensions are never inferred from the input. On any error `target`
    /// is unaffected and nothing is returned.
    pub fn import(&self, target: &GridModel, text: &str) -> Result<GridModel> {
        let value: Value = serde_json::from_str(text)?;
        let shape = |detail: String| MapError::ShapeMismatch {
            rows: target.rows(),
            cols: target.cols(),
            detail,
        };

        let rows = value
            .as_array()
            .ok_or_else(|| shape("top level is not an array".into()))?;
        if rows.len() != target.rows() {
            return Err(shape(format!("got {} rows", rows.len())));
        }

        let mut unknown = 0usize;
        let mut matrix = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let entries = row
                .as_array()
                .ok_or_else(|| shape(format!("row {i} is not an array")))?;
            if entries.len() != target.cols() {
                return Err(shape(format!("row {i} has {} columns", entries.len())));
            }
            let line: Vec<TileId> = entries
                .iter()
                .map(|entry| {
                    entry
                        .as_str()
                        .and_then(|glyph| self.catalog.lookup(glyph))
                        .unwrap_or_else(|| {
                            unknown += 1;
                            TileId::FLOOR
                        })
                })
                .collect();
            matrix.push(line);
        }

        if unknown > 0 {
            log::warn!("import: {unknown} unknown glyph(s) replaced with floor");
        }
        target.replace(matrix)
    }

    fn glyph(&self, tile: TileId) -> Result<&'a str> {
        self.catalog.glyph(tile).ok_or(MapError::UnknownTile {
            tile,
            count: self.catalog.len(),
        })
    }
}
