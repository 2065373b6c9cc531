//! The editor [`Model`]: wires pointer input through the paint controller
//! into the grid, keeps the render batches current, and runs imports and
//! exports as background commands.

use std::io;
use std::path::PathBuf;

use tilepaint_core::batch::group;
use tilepaint_core::{
    EditorConfig, GridModel, ImportGate, ImportTicket, MapError, MapSerializer, PaintController,
    PointerButton, PointerEvent, RenderGroup, TileCatalog, TileId,
};
use tilepaint_term::{
    AttrMask, Cell, Effect, Key, Model, MouseAction, Msg, Point, Screen, Style, cmd,
};

use crate::layout::{Hit, Layout};
use crate::theme;

/// Results of background commands, delivered as [`Msg::Custom`].
#[derive(Debug)]
pub enum EditorMsg {
    /// A map file was read (or failed to be).
    ImportRead {
        ticket: ImportTicket,
        path: PathBuf,
        text: io::Result<String>,
    },
    /// An export was written (or failed to be).
    ExportWritten {
        path: PathBuf,
        result: io::Result<usize>,
    },
}

/// Severity of the status line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// The tile-map editor.
pub struct Editor {
    catalog: TileCatalog,
    grid: GridModel,
    batches: RenderGroup,
    painter: PaintController,
    imports: ImportGate,
    export_path: PathBuf,
    startup_map: Option<PathBuf>,
    layout: Layout,
    scroll: usize,
    status: (StatusKind, String),
}

impl Editor {
    /// Create an editor with a blank map. `startup_map`, if given, is
    /// imported when the application starts.
    pub fn new(config: &EditorConfig, startup_map: Option<PathBuf>) -> Result<Self, MapError> {
        let catalog = config.validate()?;
        let grid = GridModel::new(config.rows, config.cols, &catalog)?;
        let batches = group(&grid);
        let painter = PaintController::new(&catalog);
        let layout = Layout::new(&catalog, grid.dims(), 80, 24);
        Ok(Self {
            catalog,
            grid,
            batches,
            painter,
            imports: ImportGate::new(),
            export_path: config.export_path.clone(),
            startup_map,
            layout,
            scroll: 0,
            status: (
                StatusKind::Info,
                "click/drag: paint  [ ]: tile  e: export  i: import  q: quit".into(),
            ),
        })
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn batches(&self) -> &RenderGroup {
        &self.batches
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selected(&self) -> TileId {
        self.painter.selected()
    }

    pub fn is_painting(&self) -> bool {
        self.painter.is_painting()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn status(&self) -> (StatusKind, &str) {
        (self.status.0, &self.status.1)
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = (kind, text.into());
    }

    // -------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------

    fn pointer(&mut self, event: PointerEvent) {
        let target = match event {
            PointerEvent::Down { pos, .. } | PointerEvent::Over { pos } => Some(pos),
            PointerEvent::Up | PointerEvent::Leave => None,
        };
        let before = target.and_then(|p| self.grid.get(p).ok());
        match self.painter.handle(&self.grid, event) {
            Ok(Some(next)) => {
                if let (Some(p), Some(old)) = (target, before) {
                    self.batches.apply_set(p, old, self.painter.selected());
                }
                self.grid = next;
            }
            Ok(None) => {}
            Err(err) => {
                // The layout only yields in-map cells, so this is a bug.
                log::error!("pointer event {event:?} rejected: {err}");
                if cfg!(debug_assertions) {
                    panic!("pointer event {event:?} rejected: {err}");
                }
            }
        }
    }

    fn select(&mut self, tile: TileId) {
        match self.painter.select_tile(tile) {
            Ok(()) => {
                let name = self.catalog.get(tile).map_or("?", |d| d.name.as_str());
                self.set_status(StatusKind::Info, format!("selected {name}"));
            }
            Err(err) => log::error!("palette selected {tile}: {err}"),
        }
    }

    fn cycle_tile(&mut self, delta: i32) {
        let n = self.catalog.len() as i32;
        let next = (self.selected().0 as i32 + delta).rem_euclid(n);
        self.select(TileId(next as u16));
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.layout.max_scroll() as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as usize;
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point) {
        let hit = self.layout.hit(pos, self.scroll);
        match (action, hit) {
            (MouseAction::Main, Hit::Palette(tile)) => self.select(tile),
            (MouseAction::Main, Hit::Map(p)) => self.pointer(PointerEvent::Down {
                button: PointerButton::Primary,
                pos: p,
            }),
            (MouseAction::Secondary, Hit::Map(p)) => self.pointer(PointerEvent::Down {
                button: PointerButton::Secondary,
                pos: p,
            }),
            (MouseAction::Auxiliary, Hit::Map(p)) => self.pointer(PointerEvent::Down {
                button: PointerButton::Auxiliary,
                pos: p,
            }),
            (MouseAction::Move, Hit::Map(p)) => self.pointer(PointerEvent::Over { pos: p }),
            (MouseAction::Move, _) => self.pointer(PointerEvent::Leave),
            (MouseAction::Release, _) => self.pointer(PointerEvent::Up),
            (MouseAction::WheelUp, _) => self.scroll_by(-1),
            (MouseAction::WheelDown, _) => self.scroll_by(1),
            _ => {}
        }
    }

    // -------------------------------------------------------------------
    // Import / export
    // -------------------------------------------------------------------

    fn export(&mut self) -> Option<Effect> {
        let text = match MapSerializer::new(&self.catalog).export(&self.grid) {
            Ok(text) => text,
            Err(err) => {
                log::error!("export failed: {err}");
                self.set_status(StatusKind::Error, format!("export failed: {err}"));
                return None;
            }
        };
        log::info!("exported map: {text}");
        let path = self.export_path.clone();
        self.set_status(StatusKind::Info, format!("exporting to {}", path.display()));
        Some(cmd(move || {
            let result = std::fs::write(&path, &text).map(|()| text.len());
            Some(Msg::custom(EditorMsg::ExportWritten { path, result }))
        }))
    }

    fn import(&mut self, path: PathBuf) -> Option<Effect> {
        let ticket = match self.imports.begin() {
            Ok(ticket) => ticket,
            Err(err) => {
                self.set_status(StatusKind::Error, err.to_string());
                return None;
            }
        };
        log::info!("importing {}", path.display());
        self.set_status(StatusKind::Info, format!("importing {}", path.display()));
        Some(cmd(move || {
            let text = std::fs::read_to_string(&path);
            Some(Msg::custom(EditorMsg::ImportRead { ticket, path, text }))
        }))
    }

    fn finish_import(&mut self, ticket: ImportTicket, path: PathBuf, text: io::Result<String>) {
        if !self.imports.finish(ticket) {
            return;
        }
        let parsed = text
            .map_err(|err| err.to_string())
            .and_then(|text| {
                MapSerializer::new(&self.catalog)
                    .import(&self.grid, &text)
                    .map_err(|err| err.to_string())
            });
        match parsed {
            Ok(next) => {
                // The paint state refers to the old map.
                self.pointer(PointerEvent::Leave);
                self.grid = next;
                self.batches = group(&self.grid);
                log::info!("imported {}", path.display());
                self.set_status(StatusKind::Info, format!("imported {}", path.display()));
            }
            Err(err) => {
                log::warn!("import of {} rejected: {err}", path.display());
                self.set_status(
                    StatusKind::Error,
                    format!("import failed, map kept: {err}"),
                );
            }
        }
    }

    fn handle_custom(&mut self, msg: EditorMsg) {
        match msg {
            EditorMsg::ImportRead { ticket, path, text } => self.finish_import(ticket, path, text),
            EditorMsg::ExportWritten { path, result } => match result {
                Ok(bytes) => {
                    log::info!("wrote {bytes} bytes to {}", path.display());
                    self.set_status(StatusKind::Info, format!("exported to {}", path.display()));
                }
                Err(err) => {
                    log::warn!("writing {} failed: {err}", path.display());
                    self.set_status(StatusKind::Error, format!("export failed: {err}"));
                }
            },
        }
    }

    fn handle_key(&mut self, key: Key) -> Option<Effect> {
        match key {
            Key::Char('q') | Key::Escape => return Some(Effect::End),
            Key::Char('e') => return self.export(),
            Key::Char('i') => {
                let path = self.export_path.clone();
                return self.import(path);
            }
            Key::Char(']') | Key::Tab => self.cycle_tile(1),
            Key::Char('[') => self.cycle_tile(-1),
            Key::ArrowUp => self.scroll_by(-1),
            Key::ArrowDown => self.scroll_by(1),
            Key::PageUp => self.scroll_by(-(self.layout.visible_rows() as i32)),
            Key::PageDown => self.scroll_by(self.layout.visible_rows() as i32),
            _ => {}
        }
        None
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    fn draw_palette(&self, screen: &mut Screen) {
        for row in &self.layout.palette {
            screen.print(Point::new(0, row.y), row.category.label(), theme::LABEL);
            for &(pt, tile) in &row.buttons {
                let (rune, mut style) = theme::tile_look(&self.catalog, tile);
                if tile == self.selected() {
                    style = style.with_attrs(AttrMask::REVERSE | AttrMask::BOLD);
                }
                screen.set(pt, Cell::new(rune, style));
            }
        }
    }

    /// One pass per batch, the terminal counterpart of one instanced draw
    /// per tile.
    fn draw_map(&self, screen: &mut Screen) {
        for (tile, cells) in self.batches.iter() {
            let (rune, style) = theme::tile_look(&self.catalog, tile);
            for &p in cells {
                if let Some(pt) = self.layout.cell_point(p, self.scroll) {
                    screen.set(pt, Cell::new(rune, style));
                }
            }
        }
    }

    fn draw_chrome(&self, screen: &mut Screen) {
        let dims = self.grid.dims();
        let title = format!(
            "tilepaint {dims}  rows {}-{}",
            self.scroll,
            (self.scroll + self.layout.visible_rows()).saturating_sub(1)
        );
        screen.print(Point::new(0, 0), &title, theme::TITLE);

        if let Some(def) = self.catalog.get(self.selected()) {
            let text = format!("tile: {} ({})", def.name, def.glyph);
            let x = (self.layout.content_right() + 2).max(title.chars().count() as i32 + 2);
            if x + text.chars().count() as i32 <= self.layout.width() {
                screen.print(Point::new(x, 0), &text, theme::LABEL);
            }
        }

        let (kind, text) = self.status();
        let style = match kind {
            StatusKind::Info => theme::STATUS_INFO,
            StatusKind::Error => theme::STATUS_ERROR,
        };
        screen.print(Point::new(0, self.layout.status_y()), text, style);
    }
}

impl Model for Editor {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                log::info!(
                    "editing a {} map with {} tiles",
                    self.grid.dims(),
                    self.catalog.len()
                );
                self.startup_map.take().and_then(|path| self.import(path))
            }
            Msg::Screen { width, height, .. } => {
                self.layout = Layout::new(&self.catalog, self.grid.dims(), width, height);
                self.scroll = self.scroll.min(self.layout.max_scroll());
                None
            }
            Msg::KeyDown { key, .. } => self.handle_key(key),
            Msg::Mouse { action, pos, .. } => {
                self.handle_mouse(action, pos);
                None
            }
            Msg::Focus { gained: false } => {
                self.pointer(PointerEvent::Leave);
                None
            }
            Msg::Custom(payload) => {
                match payload.downcast::<EditorMsg>() {
                    Ok(msg) => self.handle_custom(*msg),
                    Err(_) => log::warn!("ignoring unknown custom message"),
                }
                None
            }
            _ => None,
        }
    }

    fn draw(&self, screen: &mut Screen) {
        screen.fill(Cell::new(' ', Style::default()));
        self.draw_chrome(screen);
        self.draw_palette(screen);
        self.draw_map(screen);
    }
}

#[cfg(test)]
mod tests {
    use tilepaint_core::{Category, Pos};

    use super::*;

    fn editor() -> Editor {
        let mut ed = Editor::new(&EditorConfig::default(), None).unwrap();
        ed.update(Msg::Screen {
            width: 80,
            height: 50,
            time: std::time::Instant::now(),
        });
        ed
    }

    fn at(ed: &Editor, row: usize, col: usize) -> Point {
        ed.layout().cell_point(Pos::new(row, col), ed.scroll()).unwrap()
    }

    fn button(ed: &Editor, tile: TileId) -> Point {
        ed.layout()
            .palette
            .iter()
            .flat_map(|r| r.buttons.iter())
            .find(|(_, t)| *t == tile)
            .map(|(p, _)| *p)
            .unwrap()
    }

    /// Run a command synchronously and feed its message back.
    fn settle(ed: &mut Editor, effect: Option<Effect>) {
        match effect {
            Some(Effect::Cmd(f)) => {
                if let Some(msg) = f() {
                    let next = ed.update(msg);
                    settle(ed, next);
                }
            }
            Some(other) => panic!("unexpected effect {other:?}"),
            None => {}
        }
    }

    #[test]
    fn drag_paint_through_the_screen() {
        let mut ed = editor();
        let p = button(&ed, TileId(5));
        ed.update(Msg::mouse(MouseAction::Main, p));
        assert_eq!(ed.selected(), TileId(5));

        for (action, pt) in [
            (MouseAction::Main, at(&ed, 2, 3)),
            (MouseAction::Move, at(&ed, 2, 4)),
            (MouseAction::Move, at(&ed, 2, 4).shift(1, 0)),
            (MouseAction::Move, at(&ed, 2, 5)),
            (MouseAction::Release, at(&ed, 2, 5)),
            (MouseAction::Move, at(&ed, 2, 6)),
        ] {
            ed.update(Msg::mouse(action, pt));
        }

        for (p, t) in ed.grid().iter() {
            let painted = p.row == 2 && (3..=5).contains(&p.col);
            assert_eq!(t == TileId(5), painted, "cell {p}");
        }
        assert_eq!(ed.batches(), &group(ed.grid()));
    }

    #[test]
    fn leaving_the_map_stops_the_drag() {
        let mut ed = editor();
        ed.update(Msg::mouse(MouseAction::Main, at(&ed, 0, 0)));
        assert!(ed.is_painting());
        ed.update(Msg::mouse(MouseAction::Move, Point::new(70, 0)));
        assert!(!ed.is_painting());
        ed.update(Msg::mouse(MouseAction::Move, at(&ed, 0, 1)));
        assert_eq!(ed.grid().get(Pos::new(0, 1)).unwrap(), TileId::FLOOR);

        ed.update(Msg::mouse(MouseAction::Main, at(&ed, 1, 1)));
        ed.update(Msg::Focus { gained: false });
        assert!(!ed.is_painting());
    }

    #[test]
    fn right_button_does_not_paint() {
        let mut ed = editor();
        ed.update(Msg::mouse(MouseAction::Secondary, at(&ed, 4, 4)));
        ed.update(Msg::mouse(MouseAction::Move, at(&ed, 4, 5)));
        assert!(ed.grid().iter().all(|(_, t)| t == TileId::FLOOR));
    }

    #[test]
    fn keys_cycle_selection() {
        let mut ed = editor();
        ed.update(Msg::key(Key::Char('[')));
        assert_eq!(ed.selected(), TileId::FLOOR);
        ed.update(Msg::key(Key::Char('[')));
        assert_eq!(ed.selected(), TileId(21));
        ed.update(Msg::key(Key::Char(']')));
        assert_eq!(ed.selected(), TileId::FLOOR);
        assert!(matches!(ed.update(Msg::key(Key::Char('q'))), Some(Effect::End)));
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig {
            export_path: dir.path().join("map.json"),
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(&config, None).unwrap();
        ed.update(Msg::Screen {
            width: 80,
            height: 50,
            time: std::time::Instant::now(),
        });
        ed.update(Msg::mouse(MouseAction::Main, at(&ed, 7, 7)));
        ed.update(Msg::mouse(MouseAction::Release, at(&ed, 7, 7)));
        let painted = ed.grid().clone();

        let effect = ed.update(Msg::key(Key::Char('e')));
        settle(&mut ed, effect);
        assert_eq!(ed.status().0, StatusKind::Info);

        // Wipe the cell, then restore it from disk.
        ed.update(Msg::key(Key::Char('[')));
        ed.update(Msg::mouse(MouseAction::Main, at(&ed, 7, 7)));
        ed.update(Msg::mouse(MouseAction::Release, at(&ed, 7, 7)));
        assert_ne!(ed.grid(), &painted);

        let effect = ed.update(Msg::key(Key::Char('i')));
        settle(&mut ed, effect);
        assert_eq!(ed.grid(), &painted);
        assert_eq!(ed.batches(), &group(&painted));
    }

    #[test]
    fn failed_import_keeps_the_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = EditorConfig {
            export_path: path,
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(&config, None).unwrap();
        ed.update(Msg::Screen {
            width: 80,
            height: 50,
            time: std::time::Instant::now(),
        });
        ed.update(Msg::mouse(MouseAction::Main, at(&ed, 0, 0)));
        ed.update(Msg::mouse(MouseAction::Release, at(&ed, 0, 0)));
        let before = ed.grid().clone();

        let effect = ed.update(Msg::key(Key::Char('i')));
        settle(&mut ed, effect);
        assert_eq!(ed.grid(), &before);
        assert_eq!(ed.status().0, StatusKind::Error);

        // A missing file is reported the same way.
        std::fs::remove_file(dir.path().join("bad.json")).unwrap();
        let effect = ed.update(Msg::key(Key::Char('i')));
        settle(&mut ed, effect);
        assert_eq!(ed.grid(), &before);
        assert_eq!(ed.status().0, StatusKind::Error);
    }

    #[test]
    fn second_import_is_refused_while_pending() {
        let mut ed = editor();
        let first = ed.update(Msg::key(Key::Char('i')));
        assert!(matches!(first, Some(Effect::Cmd(_))));
        assert!(ed.update(Msg::key(Key::Char('i'))).is_none());
        assert_eq!(ed.status().0, StatusKind::Error);
    }

    #[test]
    fn tile_label_clears_a_wide_map() {
        let config = EditorConfig {
            cols: 40,
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(&config, None).unwrap();
        ed.update(Msg::Screen {
            width: 120,
            height: 50,
            time: std::time::Instant::now(),
        });
        let mut screen = Screen::new(120, 50);
        ed.draw(&mut screen);

        let top: String = (0..120).map(|x| screen.at(Point::new(x, 0)).ch).collect();
        let x = top.find("tile: wall").unwrap() as i32;
        assert!(x >= ed.layout().content_right());

        // Too narrow for the label: it is left out rather than cut off.
        ed.update(Msg::Screen {
            width: 82,
            height: 50,
            time: std::time::Instant::now(),
        });
        let mut screen = Screen::new(82, 50);
        ed.draw(&mut screen);
        let top: String = (0..82).map(|x| screen.at(Point::new(x, 0)).ch).collect();
        assert!(!top.contains("tile:"));
    }

    #[test]
    fn draws_batches_and_selection() {
        let mut ed = editor();
        ed.update(Msg::mouse(MouseAction::Main, at(&ed, 1, 2)));
        let mut screen = Screen::new(80, 50);
        ed.draw(&mut screen);

        assert_eq!(screen.at(at(&ed, 1, 2)).ch, '#');
        assert_eq!(screen.at(at(&ed, 0, 0)).ch, '.');
        let sel = screen.at(button(&ed, TileId(1)));
        assert!(sel.style.attrs.contains(AttrMask::REVERSE));
        assert_eq!(
            sel.style.fg,
            theme::category_fg(Category::Structure)
        );
    }
}
