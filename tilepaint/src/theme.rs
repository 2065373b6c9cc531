//! Colours for tiles and chrome.

use tilepaint_core::{Category, TileCatalog, TileId};
use tilepaint_term::{AttrMask, Color, Style};

pub const FLOOR_FG: Color = Color::from_rgb(0x70, 0x70, 0x70);
pub const STRUCTURE_FG: Color = Color::from_rgb(0xC8, 0xA0, 0x64);
pub const ENEMY_FG: Color = Color::from_rgb(0xE0, 0x48, 0x48);
pub const NPC_FG: Color = Color::from_rgb(0x50, 0xC8, 0xE0);
pub const REWARD_FG: Color = Color::from_rgb(0xF0, 0xD0, 0x40);

pub const LABEL: Style = Style {
    fg: Color::from_rgb(0xA0, 0xA0, 0xA0),
    bg: Color::DEFAULT,
    attrs: AttrMask::NONE,
};
pub const TITLE: Style = Style {
    fg: Color::DEFAULT,
    bg: Color::DEFAULT,
    attrs: AttrMask::BOLD,
};
pub const STATUS_INFO: Style = Style {
    fg: Color::from_rgb(0x80, 0xD0, 0x80),
    bg: Color::DEFAULT,
    attrs: AttrMask::NONE,
};
pub const STATUS_ERROR: Style = Style {
    fg: Color::from_rgb(0xFF, 0x60, 0x60),
    bg: Color::DEFAULT,
    attrs: AttrMask::BOLD,
};

pub fn category_fg(category: Category) -> Color {
    match category {
        Category::Floor => FLOOR_FG,
        Category::Structure => STRUCTURE_FG,
        Category::Enemy => ENEMY_FG,
        Category::Npc => NPC_FG,
        Category::Reward => REWARD_FG,
    }
}

/// Rune and style used to draw `tile`.
pub fn tile_look(catalog: &TileCatalog, tile: TileId) -> (char, Style) {
    match catalog.get(tile) {
        Some(def) => (def.rune(), Style::default().with_fg(category_fg(def.category))),
        None => ('?', STATUS_ERROR),
    }
}
