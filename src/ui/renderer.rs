//! Screen renderer
//!
//! Composes each frame into a [`FrameBuffer`]: a column of `~` markers
//! down the left edge, the welcome banner centered a third of the way
//! down, and the cursor placed at its editor position. The finished frame
//! reaches the terminal in one write.

use std::io::Write;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{Command, QueueableCommand};
use tracing::trace;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::frame::FrameBuffer;
use crate::editor::EditorState;
use crate::error::{EditorError, Result};

/// Version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker drawn at the start of every row
const FILL: &[u8] = b"~";

/// Screen renderer
pub struct Renderer {
    banner: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            banner: format!("Kilo editor -- version {}", VERSION),
        }
    }

    /// Compose a full frame for `state`.
    pub fn render_frame(&self, state: &EditorState) -> FrameBuffer {
        let mut frame = FrameBuffer::new();

        emit(&mut frame, Hide);
        emit(&mut frame, MoveTo(0, 0));

        self.draw_rows(state, &mut frame);

        emit(&mut frame, MoveTo(state.cursor_col, state.cursor_row));
        emit(&mut frame, Show);

        frame
    }

    /// Render and write the frame to `out` in one go.
    pub fn refresh_screen<W: Write + ?Sized>(&self, state: &EditorState, out: &mut W) -> Result<()> {
        let frame = self.render_frame(state);
        if frame.is_empty() {
            return Ok(());
        }
        trace!("Frame: {} bytes", frame.len());
        frame.write_to(out).map_err(EditorError::Write)
    }

    fn draw_rows(&self, state: &EditorState, frame: &mut FrameBuffer) {
        let banner_row = state.rows / 3;

        for y in 0..state.rows {
            if y == banner_row {
                self.draw_banner(state.cols as usize, frame);
            } else {
                frame.append(FILL);
            }

            emit(frame, Clear(ClearType::UntilNewLine));

            // No line break after the last row, or the screen would scroll
            if y < state.rows - 1 {
                frame.append(b"\r\n");
            }
        }
    }

    fn draw_banner(&self, cols: usize, frame: &mut FrameBuffer) {
        let text = truncate_to_width(&self.banner, cols);
        let mut padding = (cols - text.width()) / 2;

        if padding > 0 {
            frame.append(FILL);
            padding -= 1;
        }
        frame.append(" ".repeat(padding).as_bytes());
        frame.append(text.as_bytes());
    }
}

/// Clear the whole screen and home the cursor.
pub fn clear_screen<W: Write + ?Sized>(out: &mut W) -> Result<()> {
    let mut frame = FrameBuffer::new();
    emit(&mut frame, Clear(ClearType::All));
    emit(&mut frame, MoveTo(0, 0));
    frame.write_to(out).map_err(EditorError::Write)
}

fn emit(frame: &mut FrameBuffer, command: impl Command) {
    // Queuing into memory cannot fail
    let _ = frame.queue(command);
}

/// Longest prefix of `text` that fits in `max` columns.
fn truncate_to_width(text: &str, max: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max {
            return &text[..idx];
        }
    }
    text
}
