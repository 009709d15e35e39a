//! Key decoding
//!
//! Turns raw input bytes into [`Key`] values. Cursor and navigation keys
//! arrive as escape sequences in either CSI (`ESC [`) or SS3 (`ESC O`)
//! form; anything the decoder does not recognise collapses to a bare
//! [`Key::Escape`] instead of an error.

use tracing::debug;

use super::tty::{is_transient, ByteSource};
use crate::error::{EditorError, Result};

const ESC: u8 = 0x1B;

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A literal byte (printable or control character)
    Char(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Escape,
}

/// Byte produced by holding Ctrl with `k`.
pub const fn ctrl_key(k: u8) -> u8 {
    k & 0x1f
}

/// Block until a key arrives and decode it.
///
/// Empty reads (the raw mode timeout elapsing) are retried.
pub fn read_key<S: ByteSource + ?Sized>(input: &mut S) -> Result<Key> {
    let byte = loop {
        match input.read_byte() {
            Ok(Some(byte)) => break byte,
            Ok(None) => continue,
            Err(e) if is_transient(&e) => continue,
            Err(e) => return Err(EditorError::Read(e)),
        }
    };

    if byte == ESC {
        read_escape(input)
    } else {
        Ok(Key::Char(byte))
    }
}

/// Decode what follows an escape byte.
fn read_escape<S: ByteSource + ?Sized>(input: &mut S) -> Result<Key> {
    let Some(first) = next_byte(input)? else {
        return Ok(Key::Escape);
    };
    let Some(second) = next_byte(input)? else {
        return Ok(Key::Escape);
    };

    let key = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => match next_byte(input)? {
            Some(b'~') => tilde_key(digit),
            _ => None,
        },
        (b'[', letter) => csi_key(letter),
        (b'O', letter) => ss3_key(letter),
        _ => None,
    };

    if key.is_none() {
        debug!("Unrecognised escape sequence: ESC {:?} {:?}", first as char, second as char);
    }
    Ok(key.unwrap_or(Key::Escape))
}

/// One attempt at the next byte of a sequence; `None` if it did not arrive.
fn next_byte<S: ByteSource + ?Sized>(input: &mut S) -> Result<Option<u8>> {
    match input.read_byte() {
        Ok(byte) => Ok(byte),
        Err(e) if is_transient(&e) => Ok(None),
        Err(e) => Err(EditorError::Read(e)),
    }
}

/// `ESC [ n ~`
fn tilde_key(digit: u8) -> Option<Key> {
    match digit {
        b'1' | b'7' => Some(Key::Home),
        b'3' => Some(Key::Delete),
        b'4' | b'8' => Some(Key::End),
        b'5' => Some(Key::PageUp),
        b'6' => Some(Key::PageDown),
        _ => None,
    }
}

/// `ESC [ x`
fn csi_key(letter: u8) -> Option<Key> {
    match letter {
        b'A' => Some(Key::ArrowUp),
        b'B' => Some(Key::ArrowDown),
        b'C' => Some(Key::ArrowRight),
        b'D' => Some(Key::ArrowLeft),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

/// `ESC O x`
fn ss3_key(letter: u8) -> Option<Key> {
    match letter {
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    const TABLE: &[(&str, Key)] = &[
        ("[1~", Key::Home),
        ("[3~", Key::Delete),
        ("[4~", Key::End),
        ("[5~", Key::PageUp),
        ("[6~", Key::PageDown),
        ("[7~", Key::Home),
        ("[8~", Key::End),
        ("[A", Key::ArrowUp),
        ("[B", Key::ArrowDown),
        ("[C", Key::ArrowRight),
        ("[D", Key::ArrowLeft),
        ("[H", Key::Home),
        ("[F", Key::End),
        ("OH", Key::Home),
        ("OF", Key::End),
    ];

    fn decode(bytes: &[u8]) -> Key {
        let mut src = bytes;
        read_key(&mut src).unwrap()
    }

    /// Source that times out a few times before every byte.
    struct Sluggish {
        bytes: Vec<u8>,
        stalls: usize,
    }

    impl ByteSource for Sluggish {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            if self.stalls > 0 {
                self.stalls -= 1;
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
            if self.bytes.is_empty() {
                return Ok(None);
            }
            Ok(Some(self.bytes.remove(0)))
        }
    }

    struct Broken;

    impl ByteSource for Broken {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(decode(b"a"), Key::Char(b'a'));
        assert_eq!(decode(&[ctrl_key(b'q')]), Key::Char(0x11));
        assert_eq!(decode(b"\r"), Key::Char(b'\r'));
    }

    #[test]
    fn test_page_up() {
        assert_eq!(decode(&[0x1B, 0x5B, 0x35, 0x7E]), Key::PageUp);
    }

    #[test]
    fn test_known_sequences() {
        for (seq, key) in TABLE {
            let mut bytes = vec![ESC];
            bytes.extend_from_slice(seq.as_bytes());
            assert_eq!(decode(&bytes), *key, "sequence {:?}", seq);
        }
    }

    #[test]
    fn test_truncated_sequences() {
        assert_eq!(decode(b"\x1b"), Key::Escape);
        assert_eq!(decode(b"\x1b["), Key::Escape);
        assert_eq!(decode(b"\x1b[5"), Key::Escape);
        assert_eq!(decode(b"\x1bO"), Key::Escape);
    }

    #[test]
    fn test_unknown_sequences() {
        assert_eq!(decode(b"\x1b[2~"), Key::Escape);
        assert_eq!(decode(b"\x1b[5x"), Key::Escape);
        assert_eq!(decode(b"\x1b[Z"), Key::Escape);
        assert_eq!(decode(b"\x1bOP"), Key::Escape);
        assert_eq!(decode(b"\x1bxy"), Key::Escape);
    }

    #[test]
    fn test_sequence_consumes_only_its_bytes() {
        let mut src: &[u8] = b"\x1b[Aq";
        assert_eq!(read_key(&mut src).unwrap(), Key::ArrowUp);
        assert_eq!(read_key(&mut src).unwrap(), Key::Char(b'q'));
    }

    #[test]
    fn test_timeouts_are_retried() {
        let mut src = Sluggish { bytes: b"x".to_vec(), stalls: 3 };
        assert_eq!(read_key(&mut src).unwrap(), Key::Char(b'x'));
    }

    #[test]
    fn test_read_error_is_fatal() {
        let err = read_key(&mut Broken).unwrap_err();
        assert_eq!(err.operation(), "read");
    }

    proptest! {
        #[test]
        fn escape_decoding_is_total(a in any::<u8>(), b in any::<u8>(), c in any::<u8>()) {
            let input = [ESC, a, b, c];
            let expected = TABLE
                .iter()
                .find(|(seq, _)| input[1..].starts_with(seq.as_bytes()))
                .map(|(_, key)| *key)
                .unwrap_or(Key::Escape);
            let mut src: &[u8] = &input;
            prop_assert_eq!(read_key(&mut src).unwrap(), expected);
        }
    }
}
