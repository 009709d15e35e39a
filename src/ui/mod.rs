//! Screen output.
//!
//! - **frame**: append-only buffer holding one frame until it is written
//! - **renderer**: composes the frame from the editor state
//!
//! Every frame is built in memory and reaches the terminal in a single
//! write, so partial frames are never visible.

pub mod frame;
pub mod renderer;

pub use renderer::{clear_screen, Renderer, VERSION};
