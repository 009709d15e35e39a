//! Byte-level access to the terminal.
//!
//! Input is read one byte at a time through [`ByteSource`]; a read that
//! times out yields `None` instead of blocking forever. Output goes through
//! [`TtyWriter`], which hands every buffer straight to `write(2)` on the
//! stdout descriptor without line buffering.

use std::io::{self, Read, Write};

/// A source of raw input bytes.
pub trait ByteSource {
    /// Read a single byte. `Ok(None)` means nothing arrived within the
    /// read timeout.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

/// Standard input in raw mode (VMIN = 0, VTIME = 1).
pub struct TtyReader {
    stdin: io::Stdin,
}

impl Default for TtyReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TtyReader {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl ByteSource for TtyReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.stdin.lock().read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if is_transient(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Errors that only mean "no data yet".
pub(crate) fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Unbuffered standard output.
///
/// `std::io::Stdout` is line buffered and would split a frame at its last
/// newline; this writer issues one `write(2)` per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtyWriter;

impl Write for TtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // SAFETY: buf is a valid slice for the duration of the call.
        let n = unsafe { libc::write(libc::STDOUT_FILENO, buf.as_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
