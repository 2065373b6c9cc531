//! **tilepaint-core**: the editing model behind the tilepaint map editor.
//!
//! This crate owns the map itself: the tile catalog, the copy-on-write
//! [`GridModel`], the pointer-driven [`PaintController`], the per-tile
//! [`RenderGroup`] partition used for batched drawing, and the glyph-keyed
//! JSON interchange in [`MapSerializer`]. Nothing here touches a terminal or
//! the file system.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod import;
pub mod paint;
pub mod serial;

pub use batch::RenderGroup;
pub use catalog::{Category, TileCatalog, TileDef, TileId};
pub use config::EditorConfig;
pub use error::{MapError, Result};
pub use geom::{Dims, Pos};
pub use grid::GridModel;
pub use import::{ImportGate, ImportTicket};
pub use paint::{PaintController, PaintState, PointerButton, PointerEvent};
pub use serial::MapSerializer;
