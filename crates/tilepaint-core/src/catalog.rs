//! The tile catalog: [`TileId`], [`Category`], [`TileDef`], [`TileCatalog`].
//!
//! The catalog's flat ordering *is* the TileId space. Categories only group
//! tiles for the palette; they never affect identifiers. Reordering a
//! catalog invalidates maps exported with the previous order.

use std::collections::HashMap;
use std::fmt;

use crate::error::{MapError, Result};

// ---------------------------------------------------------------------------
// TileId
// ---------------------------------------------------------------------------

/// Index of a tile type in a [`TileCatalog`]. `TileId(0)` is the floor and
/// the default content of every new or leniently imported cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    /// The reserved floor tile.
    pub const FLOOR: Self = Self(0);

    /// Position in the catalog's flat ordering.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u16> for TileId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

// ---------------------------------------------------------------------------
// Category / TileDef
// ---------------------------------------------------------------------------

/// Palette grouping of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Floor,
    Structure,
    Enemy,
    Npc,
    Reward,
}

impl Category {
    /// Short label used by palettes.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Floor => "Floor",
            Self::Structure => "Walls",
            Self::Enemy => "Enemies",
            Self::Npc => "NPCs",
            Self::Reward => "Rewards",
        }
    }
}

/// One tile type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TileDef {
    /// Interchange glyph, written verbatim into exported maps.
    pub glyph: String,
    /// Human-readable name.
    pub name: String,
    pub category: Category,
    /// Single-column stand-in for terminals that cannot draw `glyph`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rune: Option<char>,
}

impl TileDef {
    pub fn new(glyph: &str, name: &str, category: Category, rune: char) -> Self {
        Self {
            glyph: glyph.to_owned(),
            name: name.to_owned(),
            category,
            rune: Some(rune),
        }
    }

    /// The terminal rune, falling back to the glyph's first character.
    pub fn rune(&self) -> char {
        self.rune
            .or_else(|| self.glyph.chars().next())
            .unwrap_or('?')
    }
}

/// The editor's built-in tiles, in canonical TileId order.
const BUILTIN: &[(&str, &str, Category, char)] = &[
    ("\u{25AB}\u{FE0F}", "floor", Category::Floor, '.'),
    ("\u{2B1B}", "wall", Category::Structure, '#'),
    ("\u{1F332}", "tree", Category::Structure, 'T'),
    ("\u{1F3E0}", "house", Category::Structure, 'h'),
    ("\u{1F3E1}", "garden house", Category::Structure, 'H'),
    ("\u{1F3D8}\u{FE0F}", "houses", Category::Structure, 'V'),
    ("\u{1F3DA}\u{FE0F}", "ruin", Category::Structure, 'R'),
    ("\u{1F525}", "fire", Category::Structure, '*'),
    ("\u{26FA}", "tent", Category::Structure, 'A'),
    ("\u{1F480}", "skull", Category::Enemy, 's'),
    ("\u{1F40D}", "snake", Category::Enemy, 'S'),
    ("\u{1F47B}", "ghost", Category::Enemy, 'g'),
    ("\u{1F9CC}", "troll", Category::Enemy, 'O'),
    ("\u{1F479}", "ogre", Category::Enemy, 'D'),
    ("\u{1F43A}", "wolf", Category::Enemy, 'w'),
    ("\u{2694}\u{FE0F}", "crossed swords", Category::Enemy, 'x'),
    ("\u{1F469}\u{1F3FB}\u{200D}\u{1F9B0}", "villager", Category::Npc, '@'),
    ("\u{1F9D9}\u{200D}\u{2642}\u{FE0F}", "wizard", Category::Npc, 'W'),
    ("\u{1F4B0}", "gold", Category::Reward, '$'),
    ("\u{1F33F}", "herb", Category::Reward, '"'),
    ("\u{2753}", "mystery", Category::Reward, '?'),
    ("\u{1F48E}", "gem", Category::Reward, '^'),
];

// ---------------------------------------------------------------------------
// TileCatalog
// ---------------------------------------------------------------------------

/// Immutable, ordered registry of tile types.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    tiles: Vec<TileDef>,
    by_glyph: HashMap<String, TileId>,
}

impl TileCatalog {
    /// Build a catalog. Fails with [`MapError::InvalidCatalog`] when `tiles`
    /// is empty, too large for a [`TileId`], or repeats a glyph (glyphs are
    /// the interchange keys and must be unique).
    pub fn new(tiles: Vec<TileDef>) -> Result<Self> {
        if tiles.is_empty() {
            return Err(MapError::InvalidCatalog("catalog has no tiles".into()));
        }
        if tiles.len() > usize::from(u16::MAX) + 1 {
            return Err(MapError::InvalidCatalog(format!(
                "{} tiles exceed the TileId range",
                tiles.len()
            )));
        }
        let mut by_glyph = HashMap::with_capacity(tiles.len());
        for (i, def) in tiles.iter().enumerate() {
            let id = TileId(i as u16);
            if let Some(prev) = by_glyph.insert(def.glyph.clone(), id) {
                return Err(MapError::InvalidCatalog(format!(
                    "glyph {:?} is used by both {prev} and {id}",
                    def.glyph
                )));
            }
        }
        Ok(Self { tiles, by_glyph })
    }

    /// The built-in 22-tile emoji catalog.
    pub fn builtin() -> Self {
        let tiles = BUILTIN
            .iter()
            .map(|&(glyph, name, category, rune)| TileDef::new(glyph, name, category, rune))
            .collect::<Vec<_>>();
        let by_glyph = tiles
            .iter()
            .enumerate()
            .map(|(i, def)| (def.glyph.clone(), TileId(i as u16)))
            .collect();
        Self { tiles, by_glyph }
    }

    /// Number of tiles; valid ids are `0..len()`.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: TileId) -> bool {
        id.index() < self.tiles.len()
    }

    /// Fail with [`MapError::UnknownTile`] unless `id` is in range.
    pub fn check(&self, id: TileId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(MapError::UnknownTile {
                tile: id,
                count: self.len(),
            })
        }
    }

    #[inline]
    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.tiles.get(id.index())
    }

    /// Interchange glyph of `id`.
    pub fn glyph(&self, id: TileId) -> Option<&str> {
        self.get(id).map(|d| d.glyph.as_str())
    }

    /// Reverse lookup of a glyph.
    pub fn lookup(&self, glyph: &str) -> Option<TileId> {
        self.by_glyph.get(glyph).copied()
    }

    /// All ids in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.tiles.len()).map(|i| TileId(i as u16))
    }

    /// Tiles grouped by category, categories in order of first appearance
    /// and tiles in catalog order within each.
    pub fn categories(&self) -> Vec<(Category, Vec<TileId>)> {
        let mut groups: Vec<(Category, Vec<TileId>)> = Vec::new();
        for (id, def) in self.ids().zip(&self.tiles) {
            match groups.iter_mut().find(|(c, _)| *c == def.category) {
                Some((_, ids)) => ids.push(id),
                None => groups.push((def.category, vec![id])),
            }
        }
        groups
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_layout() {
        let cat = TileCatalog::builtin();
        assert_eq!(cat.len(), 22);
        assert_eq!(cat.glyph(TileId::FLOOR), Some("\u{25AB}\u{FE0F}"));
        assert_eq!(cat.lookup("\u{2B1B}"), Some(TileId(1)));
        assert_eq!(cat.lookup("\u{1F48E}"), Some(TileId(21)));
        assert_eq!(cat.lookup("nope"), None);

        let groups = cat.categories();
        let sizes: Vec<_> = groups.iter().map(|(c, ids)| (*c, ids.len())).collect();
        assert_eq!(
            sizes,
            vec![
                (Category::Floor, 1),
                (Category::Structure, 8),
                (Category::Enemy, 7),
                (Category::Npc, 2),
                (Category::Reward, 4),
            ]
        );
    }

    #[test]
    fn builtin_glyphs_are_unique() {
        let cat = TileCatalog::builtin();
        let tiles: Vec<_> = cat.ids().filter_map(|id| cat.get(id).cloned()).collect();
        assert!(TileCatalog::new(tiles).is_ok());
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        let dup = vec![
            TileDef::new("a", "a", Category::Floor, 'a'),
            TileDef::new("a", "b", Category::Structure, 'b'),
        ];
        assert!(matches!(
            TileCatalog::new(dup),
            Err(MapError::InvalidCatalog(_))
        ));
        assert!(matches!(
            TileCatalog::new(Vec::new()),
            Err(MapError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn check_bounds() {
        let cat = TileCatalog::builtin();
        assert!(cat.check(TileId(21)).is_ok());
        assert!(matches!(
            cat.check(TileId(22)),
            Err(MapError::UnknownTile { count: 22, .. })
        ));
    }

    #[test]
    fn rune_falls_back_to_glyph() {
        let def: TileDef =
            serde_json::from_str(r#"{"glyph":"%","name":"pct","category":"reward"}"#).unwrap();
        assert_eq!(def.rune(), '%');
        assert_eq!(def.category, Category::Reward);
    }
}
