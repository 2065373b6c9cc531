//! Screen layout of the editor and pointer hit-testing.
//!
//! ```text
//! y=0              title
//! y=1..=P          palette, one line per category: "Label    . # T ..."
//! y=P+1            blank
//! y=P+2..H-1       map, each cell two columns wide, scrolled by `scroll`
//! y=H-1            status line
//! ```

use tilepaint_core::{Category, Dims, Pos, TileCatalog, TileId};
use tilepaint_term::Point;

/// Width of the category label column.
pub const LABEL_WIDTH: i32 = 9;
/// Screen columns per palette button and per map cell.
pub const CELL_WIDTH: i32 = 2;
/// Left margin of the map.
pub const MAP_LEFT: i32 = 1;

/// What a screen position points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    Palette(TileId),
    Map(Pos),
    None,
}

/// One palette line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteRow {
    pub category: Category,
    pub y: i32,
    /// Button positions, by stable tile id.
    pub buttons: Vec<(Point, TileId)>,
}

/// Where everything sits for a given catalog, map size and screen size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub palette: Vec<PaletteRow>,
    dims: Dims,
    map_top: i32,
    visible_rows: usize,
    width: i32,
    height: i32,
}

impl Layout {
    pub fn new(catalog: &TileCatalog, dims: Dims, width: i32, height: i32) -> Self {
        let palette: Vec<PaletteRow> = catalog
            .categories()
            .into_iter()
            .enumerate()
            .map(|(i, (category, ids))| {
                let y = 1 + i as i32;
                let buttons = ids
                    .into_iter()
                    .enumerate()
                    .map(|(k, id)| (Point::new(LABEL_WIDTH + CELL_WIDTH * k as i32, y), id))
                    .collect();
                PaletteRow {
                    category,
                    y,
                    buttons,
                }
            })
            .collect();
        let map_top = palette.len() as i32 + 2;
        // Everything between the map top and the status line.
        let room = (height - 1 - map_top).max(0) as usize;
        Self {
            palette,
            dims,
            map_top,
            visible_rows: room.min(dims.rows),
            width,
            height,
        }
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    pub fn map_top(&self) -> i32 {
        self.map_top
    }

    /// Number of map rows that fit on screen.
    #[inline]
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Largest useful scroll offset.
    pub fn max_scroll(&self) -> usize {
        self.dims.rows - self.visible_rows
    }

    #[inline]
    pub fn status_y(&self) -> i32 {
        self.height - 1
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// First screen column right of both the palette and the map.
    pub fn content_right(&self) -> i32 {
        let palette = self
            .palette
            .iter()
            .map(|r| LABEL_WIDTH + CELL_WIDTH * r.buttons.len() as i32)
            .max()
            .unwrap_or(LABEL_WIDTH);
        let map = i32::try_from(self.dims.cols)
            .unwrap_or(i32::MAX)
            .saturating_mul(CELL_WIDTH)
            .saturating_add(MAP_LEFT);
        palette.max(map)
    }

    /// Screen position of map cell `p`, if it is scrolled into view.
    pub fn cell_point(&self, p: Pos, scroll: usize) -> Option<Point> {
        if p.row < scroll || p.row >= scroll + self.visible_rows || p.col >= self.dims.cols {
            return None;
        }
        Some(Point::new(
            MAP_LEFT + CELL_WIDTH * p.col as i32,
            self.map_top + (p.row - scroll) as i32,
        ))
    }

    /// Resolve a screen position.
    pub fn hit(&self, pt: Point, scroll: usize) -> Hit {
        if let Some(row) = self.palette.iter().find(|r| r.y == pt.y) {
            return row
                .buttons
                .iter()
                .find(|(b, _)| pt.x >= b.x && pt.x < b.x + CELL_WIDTH)
                .map_or(Hit::None, |&(_, id)| Hit::Palette(id));
        }
        let dy = pt.y - self.map_top;
        let dx = pt.x - MAP_LEFT;
        if dy < 0 || dx < 0 || dy as usize >= self.visible_rows {
            return Hit::None;
        }
        let col = (dx / CELL_WIDTH) as usize;
        if col >= self.dims.cols {
            return Hit::None;
        }
        Hit::Map(Pos::new(scroll + dy as usize, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(height: i32) -> Layout {
        Layout::new(&TileCatalog::builtin(), Dims::new(30, 10), 80, height)
    }

    #[test]
    fn palette_buttons_carry_stable_ids() {
        let l = layout(50);
        assert_eq!(l.palette.len(), 5);
        let walls = &l.palette[1];
        assert_eq!(walls.category, Category::Structure);
        assert_eq!(walls.buttons[0].1, TileId(1));
        let enemies = &l.palette[2];
        assert_eq!(enemies.buttons[2].1, TileId(11));
        let p = enemies.buttons[2].0;
        assert_eq!(l.hit(p, 0), Hit::Palette(TileId(11)));
        assert_eq!(l.hit(p.shift(1, 0), 0), Hit::Palette(TileId(11)));
        assert_eq!(l.hit(Point::new(0, enemies.y), 0), Hit::None);
    }

    #[test]
    fn map_hits_round_trip() {
        let l = layout(50);
        assert_eq!(l.map_top(), 7);
        assert_eq!(l.visible_rows(), 30);
        for p in [Pos::new(0, 0), Pos::new(2, 3), Pos::new(29, 9)] {
            let pt = l.cell_point(p, 0).unwrap();
            assert_eq!(l.hit(pt, 0), Hit::Map(p));
            assert_eq!(l.hit(pt.shift(1, 0), 0), Hit::Map(p));
        }
        assert_eq!(l.hit(Point::new(MAP_LEFT + 20, 7), 0), Hit::None);
        assert_eq!(l.hit(Point::new(0, 7), 0), Hit::None);
    }

    #[test]
    fn content_right_follows_palette_and_map() {
        use tilepaint_core::TileDef;

        let wide_map = Layout::new(&TileCatalog::builtin(), Dims::new(5, 40), 120, 30);
        assert_eq!(wide_map.content_right(), MAP_LEFT + CELL_WIDTH * 40);

        let mut tiles = vec![TileDef::new(".", "floor", Category::Floor, '.')];
        tiles.extend((0..11).map(|i| {
            let rune = char::from(b'a' + i);
            TileDef::new(&rune.to_string(), "wall", Category::Structure, rune)
        }));
        let cat = TileCatalog::new(tiles).unwrap();
        let wide_palette = Layout::new(&cat, Dims::new(5, 3), 80, 30);
        assert_eq!(wide_palette.content_right(), LABEL_WIDTH + CELL_WIDTH * 11);
    }

    #[test]
    fn short_screens_scroll() {
        let l = layout(20);
        assert_eq!(l.visible_rows(), 12);
        assert_eq!(l.max_scroll(), 18);
        assert_eq!(l.cell_point(Pos::new(3, 0), 5), None);
        let pt = l.cell_point(Pos::new(10, 4), 5).unwrap();
        assert_eq!(pt, Point::new(MAP_LEFT + 8, 12));
        assert_eq!(l.hit(pt, 5), Hit::Map(Pos::new(10, 4)));
        assert_eq!(l.hit(Point::new(1, l.status_y()), 5), Hit::None);
    }
}
