//! Raw mode control for the controlling terminal.
//!
//! Entering raw mode captures the original termios of standard input and
//! hands back a [`RawModeGuard`]. Dropping the guard puts the original
//! settings back, so every way out of the editor (normal return, error
//! propagation, panic unwinding) leaves the terminal usable.

use std::io;
use std::os::unix::io::RawFd;

use tracing::{debug, warn};

use crate::error::{EditorError, Result};

/// Read timeout in tenths of a second (100ms).
const READ_TIMEOUT_DECISECONDS: libc::cc_t = 1;

/// Owns the original terminal settings for as long as raw mode is active.
pub struct RawModeGuard {
    fd: RawFd,
    original: libc::termios,
}

impl RawModeGuard {
    /// Put standard input into raw mode.
    pub fn enable() -> Result<Self> {
        Self::enable_on(libc::STDIN_FILENO)
    }

    pub fn enable_on(fd: RawFd) -> Result<Self> {
        let original = get_attr(fd)?;

        let mut raw = original;
        apply_raw_flags(&mut raw);
        set_attr(fd, &raw)?;

        debug!("Raw mode enabled on fd {}", fd);
        Ok(Self { fd, original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match set_attr(self.fd, &self.original) {
            Ok(()) => debug!("Raw mode disabled on fd {}", self.fd),
            Err(e) => warn!("Failed to restore terminal mode: {}", e),
        }
    }
}

/// Clear the flags that make the line discipline interpret input.
pub(crate) fn apply_raw_flags(termios: &mut libc::termios) {
    // No break-to-SIGINT, CR-to-NL, parity check, 8th-bit strip, Ctrl-S/Ctrl-Q.
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    // "\n" is not translated to "\r\n".
    termios.c_oflag &= !libc::OPOST;
    // No echo, byte-at-a-time, no Ctrl-C/Ctrl-Z signals, no Ctrl-V.
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
}

fn get_attr(fd: RawFd) -> Result<libc::termios> {
    // SAFETY: termios is plain old data and tcgetattr fully initializes it on success.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
        return Err(EditorError::TerminalConfig {
            operation: "tcgetattr",
            source: io::Error::last_os_error(),
        });
    }
    Ok(termios)
}

fn set_attr(fd: RawFd, termios: &libc::termios) -> Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) } != 0 {
        return Err(EditorError::TerminalConfig {
            operation: "tcsetattr",
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}
