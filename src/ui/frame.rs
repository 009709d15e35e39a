//! Append-only frame buffer.
//!
//! A frame is assembled completely in memory and then handed to the
//! terminal in a single write, so the user never sees a half-drawn screen.

use std::io::{self, Write};

/// Bytes of one in-progress frame.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` onto the end of the frame.
    ///
    /// If the buffer cannot grow the bytes are dropped and the frame is
    /// simply incomplete.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.bytes.try_reserve(bytes.len()).is_err() {
            return;
        }
        self.bytes.extend_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the whole frame to `out` and discard it.
    pub fn write_to<W: Write + ?Sized>(self, out: &mut W) -> io::Result<()> {
        out.write_all(self.as_bytes())?;
        out.flush()
    }
}

/// Lets escape-sequence commands be queued straight into the frame.
impl Write for FrameBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
