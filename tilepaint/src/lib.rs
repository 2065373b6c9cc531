//! tilepaint: a terminal tile-map editor built on tilepaint-core.

pub mod cli;
pub mod editor;
pub mod layout;
pub mod logging;
pub mod theme;

pub use editor::{Editor, EditorMsg, StatusKind};
pub use layout::{Hit, Layout};
