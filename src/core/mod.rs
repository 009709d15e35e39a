//! Low-level terminal components.
//!
//! - **raw_mode**: termios raw mode with guaranteed restoration
//! - **tty**: byte-at-a-time input and unbuffered output
//! - **keys**: escape sequence decoding into logical keys
//! - **viewport**: terminal size discovery with a cursor-probe fallback
//!
//! # Architecture
//!
//! ```text
//! RawModeGuard (termios snapshot, restored on drop)
//! TtyReader ──> read_key ──> Key
//!           └─> viewport_size ──> Viewport
//! ```

pub mod keys;
pub mod raw_mode;
pub mod tty;
pub mod viewport;

pub use keys::{ctrl_key, read_key, Key};
pub use raw_mode::RawModeGuard;
pub use tty::{ByteSource, TtyReader, TtyWriter};
pub use viewport::{viewport_size, Viewport};
