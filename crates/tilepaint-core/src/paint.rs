//! Pointer-driven painting: [`PaintController`] and [`PointerEvent`].
//!
//! The controller is a two-state machine:
//!
//! ```text
//!            Down(primary, p) / paint p
//!   Idle ───────────────────────────────▶ Painting
//!    ▲                                      │  Over(q), q != last / paint q
//!    └────────────── Up | Leave ────────────┘
//! ```
//!
//! It never holds the grid; each event is applied to the state passed in
//! and the new state (if any) is handed back to the caller.

use crate::catalog::{TileCatalog, TileId};
use crate::error::{MapError, Result};
use crate::geom::Pos;
use crate::grid::GridModel;

/// Which pointer button was pressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left button; the only one that paints.
    Primary,
    /// Right button (reserved for panning by the renderer).
    Secondary,
    /// Middle button (reserved for zooming by the renderer).
    Auxiliary,
}

/// A pointer event tagged with the map cell under the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Down { button: PointerButton, pos: Pos },
    /// The pointer entered `pos`.
    Over { pos: Pos },
    /// A button was released anywhere.
    Up,
    /// The pointer left the paintable surface.
    Leave,
}

/// Drag-paint state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PaintState {
    #[default]
    Idle,
    /// A drag-paint is in progress; `last` is the most recently painted cell.
    Painting { last: Pos },
}

/// Interprets pointer events as grid mutations.
#[derive(Clone, Debug)]
pub struct PaintController {
    state: PaintState,
    selected: TileId,
    tile_count: usize,
}

impl PaintController {
    /// Create an idle controller for `catalog`. The first non-floor tile is
    /// selected when there is one.
    pub fn new(catalog: &TileCatalog) -> Self {
        let selected = if catalog.len() > 1 {
            TileId(1)
        } else {
            TileId::FLOOR
        };
        Self {
            state: PaintState::Idle,
            selected,
            tile_count: catalog.len(),
        }
    }

    #[inline]
    pub fn state(&self) -> PaintState {
        self.state
    }

    #[inline]
    pub fn is_painting(&self) -> bool {
        matches!(self.state, PaintState::Painting { .. })
    }

    /// The tile new paints will write.
    #[inline]
    pub fn selected(&self) -> TileId {
        self.selected
    }

    /// Change the active tile. Does not touch the drag state.
    pub fn select_tile(&mut self, tile: TileId) -> Result<()> {
        if tile.index() >= self.tile_count {
            return Err(MapError::UnknownTile {
                tile,
                count: self.tile_count,
            });
        }
        self.selected = tile;
        Ok(())
    }

    /// Apply one pointer event to `grid`.
    ///
    /// Returns `Ok(Some(next))` when a cell was painted, `Ok(None)` when the
    /// event only changed (or did not change) the drag state. On error the
    /// controller state is left as it was.
    pub fn handle(&mut self, grid: &GridModel, event: PointerEvent) -> Result<Option<GridModel>> {
        match (self.state, event) {
            (_, PointerEvent::Down { button: PointerButton::Primary, pos }) => {
                let next = self.paint(grid, pos)?;
                self.state = PaintState::Painting { last: pos };
                Ok(Some(next))
            }
            (_, PointerEvent::Down { .. }) => Ok(None),
            (PaintState::Painting { last }, PointerEvent::Over { pos }) if pos != last => {
                let next = self.paint(grid, pos)?;
                self.state = PaintState::Painting { last: pos };
                Ok(Some(next))
            }
            (_, PointerEvent::Over { .. }) => Ok(None),
            (_, PointerEvent::Up | PointerEvent::Leave) => {
                self.state = PaintState::Idle;
                Ok(None)
            }
        }
    }

    fn paint(&self, grid: &GridModel, pos: Pos) -> Result<GridModel> {
        log::debug!("paint {pos} with {}", self.selected);
        grid.set(pos, self.selected)
    }
}
