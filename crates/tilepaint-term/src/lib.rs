//! **tilepaint-term**: the terminal runtime the tilepaint editor draws
//! through.
//!
//! An Elm-architecture update loop ([`App`]) pumps input [`Msg`]s from a
//! [`Driver`] into a [`Model`], lets the model draw into a character-cell
//! [`Screen`], and flushes only the cells that changed. [`CrosstermDriver`]
//! is the terminal back-end.

pub mod app;
pub mod driver;
pub mod messages;
pub mod screen;

pub use app::{App, AppConfig, Context, Driver, Effect, Model, cmd};
pub use driver::CrosstermDriver;
pub use messages::*;
pub use screen::{AttrMask, Cell, Color, Frame, FrameCell, Point, Screen, Style, compute_frame};
