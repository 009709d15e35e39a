//! Editor state and keypress dispatch.

use std::io::Write;

use tracing::info;

use crate::core::{ctrl_key, read_key, ByteSource, Key, Viewport};
use crate::error::Result;
use crate::ui::Renderer;

/// Byte sent by Ctrl-Q
pub const QUIT_KEY: u8 = ctrl_key(b'q');

/// Cursor position and viewport dimensions.
///
/// The cursor always stays inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorState {
    pub cursor_col: u16,
    pub cursor_row: u16,
    pub rows: u16,
    pub cols: u16,
}

impl EditorState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            cursor_col: 0,
            cursor_row: 0,
            rows: viewport.rows.max(1),
            cols: viewport.cols.max(1),
        }
    }

    /// Move one cell, stopping at the edges.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.cursor_col = self.cursor_col.saturating_sub(1),
            Direction::Right => {
                if self.cursor_col + 1 < self.cols {
                    self.cursor_col += 1;
                }
            }
            Direction::Up => self.cursor_row = self.cursor_row.saturating_sub(1),
            Direction::Down => {
                if self.cursor_row + 1 < self.rows {
                    self.cursor_row += 1;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What the main loop should do after a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// The editor: state plus the renderer that draws it.
pub struct Editor {
    state: EditorState,
    renderer: Renderer,
}

impl Editor {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: EditorState::new(viewport),
            renderer: Renderer::new(),
        }
    }

    /// Draw the current state.
    pub fn refresh_screen<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        self.renderer.refresh_screen(&self.state, out)
    }

    /// Wait for one key and apply it.
    pub fn process_keypress<S: ByteSource + ?Sized>(&mut self, input: &mut S) -> Result<Action> {
        let key = read_key(input)?;
        Ok(self.handle_key(key))
    }

    pub fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::Char(QUIT_KEY) => {
                info!("Quit requested");
                return Action::Quit;
            }
            Key::Home => self.state.cursor_col = 0,
            Key::End => self.state.cursor_col = self.state.cols - 1,
            Key::PageUp | Key::PageDown => {
                let direction = if key == Key::PageUp { Direction::Up } else { Direction::Down };
                for _ in 0..self.state.rows {
                    self.state.move_cursor(direction);
                }
            }
            Key::ArrowUp => self.state.move_cursor(Direction::Up),
            Key::ArrowDown => self.state.move_cursor(Direction::Down),
            Key::ArrowLeft => self.state.move_cursor(Direction::Left),
            Key::ArrowRight => self.state.move_cursor(Direction::Right),
            Key::Char(_) | Key::Delete | Key::Escape => {}
        }
        Action::Continue
    }
}
