//! Editor configuration: [`EditorConfig`].

use std::path::PathBuf;

use crate::catalog::{TileCatalog, TileDef};
use crate::error::Result;
use crate::grid::cell_count;

/// Default map height.
pub const DEFAULT_ROWS: usize = 30;
/// Default map width.
pub const DEFAULT_COLS: usize = 10;

/// Settings for an editing session. Every field has a default, so a
/// config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub rows: usize,
    pub cols: usize,
    /// Custom tiles, in TileId order. `None` uses the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<TileDef>>,
    /// Where exports are written and imports read from.
    pub export_path: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            catalog: None,
            export_path: PathBuf::from("map.json"),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check dimensions and build the session's catalog.
    pub fn validate(&self) -> Result<TileCatalog> {
        cell_count(self.rows, self.cols)?;
        match &self.catalog {
            Some(tiles) => TileCatalog::new(tiles.clone()),
            None => Ok(TileCatalog::builtin()),
        }
    }
}
