//! Crossterm terminal driver.
//!
//! [`CrosstermDriver`] implements [`Driver`] on top of crossterm: raw mode,
//! the alternate screen, mouse capture, and focus reporting. Mouse drags
//! are reported as [`MouseAction::Move`], and focus loss as
//! [`Msg::Focus`].

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::app::{Context, Driver};
use crate::messages::{Key, ModMask, MouseAction, Msg};
use crate::screen::{AttrMask, Color, Frame, Point};

/// Maps a [`Color`] to a crossterm colour.
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// Maps crossterm key modifiers to a [`ModMask`].
fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    m
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// Translate one crossterm event.
fn to_msg(ev: Event) -> Option<Msg> {
    let time = Instant::now();
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => to_key(code).map(|key| Msg::KeyDown {
            key,
            modifiers: to_mod_mask(modifiers),
            time,
        }),
        Event::Mouse(me) => {
            let action = match me.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
                MouseEventKind::Down(MouseButton::Middle) => MouseAction::Auxiliary,
                MouseEventKind::Up(_) => MouseAction::Release,
                MouseEventKind::Moved | MouseEventKind::Drag(_) => MouseAction::Move,
                MouseEventKind::ScrollUp => MouseAction::WheelUp,
                MouseEventKind::ScrollDown => MouseAction::WheelDown,
                _ => return None,
            };
            Some(Msg::Mouse {
                action,
                pos: Point::new(me.column as i32, me.row as i32),
                modifiers: to_mod_mask(me.modifiers),
                time,
            })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
            time,
        }),
        Event::FocusGained => Some(Msg::Focus { gained: true }),
        Event::FocusLost => Some(Msg::Focus { gained: false }),
        _ => None,
    }
}

/// A terminal back-end using crossterm, capturing mouse and focus events.
#[derive(Debug, Default)]
pub struct CrosstermDriver;

impl CrosstermDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            event::EnableFocusChange,
            event::EnableMouseCapture
        )?;
        log::debug!("terminal initialised");
        Ok(())
    }

    fn size(&self) -> Option<(i32, i32)> {
        terminal::size()
            .ok()
            .map(|(w, h)| (w as i32, h as i32))
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(Duration::from_millis(16))? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(msg) = to_msg(event::read()?) {
                tx.send(msg).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();

        for fc in &frame.cells {
            let p = fc.pos;
            let cell = &fc.cell;
            let attrs = cell.style.attrs;

            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::UNDERLINE) {
                queue!(stdout, style::SetAttribute(Attribute::Underlined))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(stdout, style::SetAttribute(Attribute::Reverse))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, style::SetAttribute(Attribute::Dim))?;
            }

            write!(stdout, "{}", cell.ch)?;

            if attrs != AttrMask::NONE {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            event::DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, MouseEvent};

    use super::*;

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn drag_is_move() {
        let msg = to_msg(mouse(MouseEventKind::Drag(MouseButton::Left)));
        assert!(matches!(
            msg,
            Some(Msg::Mouse { action: MouseAction::Move, pos: Point { x: 7, y: 3 }, .. })
        ));
    }

    #[test]
    fn buttons_map_to_actions() {
        let cases = [
            (MouseEventKind::Down(MouseButton::Left), MouseAction::Main),
            (MouseEventKind::Down(MouseButton::Right), MouseAction::Secondary),
            (MouseEventKind::Up(MouseButton::Left), MouseAction::Release),
            (MouseEventKind::ScrollDown, MouseAction::WheelDown),
        ];
        for (kind, expected) in cases {
            match to_msg(mouse(kind)) {
                Some(Msg::Mouse { action, .. }) => assert_eq!(action, expected),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('e'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(to_msg(release).is_none());
        assert!(matches!(
            to_msg(Event::FocusLost),
            Some(Msg::Focus { gained: false })
        ));
    }
}
