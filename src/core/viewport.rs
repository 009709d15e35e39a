//! Terminal size discovery.
//!
//! The size is normally read straight from the terminal device. When that
//! fails or reports a zero width, the cursor is pushed to the bottom-right
//! corner and its position is asked for with a Device Status Report:
//!
//! ```text
//! -> ESC [ 999 C  ESC [ 999 B  ESC [ 6 n
//! <- ESC [ rows ; cols R
//! ```

use std::io::{self, Write};

use crossterm::cursor::{MoveDown, MoveRight};
use crossterm::{queue, terminal};
use tracing::{info, warn};

use super::tty::ByteSource;
use crate::error::{EditorError, Result};

/// Cursor position query (DSR 6)
const CURSOR_POSITION_QUERY: &[u8] = b"\x1b[6n";

/// Far enough to reach the corner of any real terminal; the terminal clamps it.
const FAR_MOVE: u16 = 999;

/// Longest cursor position report we are willing to read.
const MAX_REPORT_LEN: usize = 31;

/// Visible terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: u16,
    pub cols: u16,
}

/// Discover the terminal size.
pub fn viewport_size<W, S>(out: &mut W, input: &mut S) -> Result<Viewport>
where
    W: Write + ?Sized,
    S: ByteSource + ?Sized,
{
    discover(terminal::size(), out, input)
}

/// Use the `(cols, rows)` reported by the device, or probe when it is unusable.
pub(crate) fn discover<W, S>(
    primary: io::Result<(u16, u16)>,
    out: &mut W,
    input: &mut S,
) -> Result<Viewport>
where
    W: Write + ?Sized,
    S: ByteSource + ?Sized,
{
    match primary {
        Ok((cols, rows)) if cols > 0 && rows > 0 => {
            info!("Terminal size: {}x{}", cols, rows);
            return Ok(Viewport { rows, cols });
        }
        Ok((cols, rows)) => warn!("Terminal reported {}x{}, probing cursor", cols, rows),
        Err(e) => warn!("Terminal size query failed ({}), probing cursor", e),
    }

    let viewport = probe(out, input).map_err(|e| match e {
        EditorError::ViewportDiscovery { .. } => e,
        other => EditorError::ViewportDiscovery { reason: other.to_string() },
    })?;
    info!("Terminal size (probed): {}x{}", viewport.cols, viewport.rows);
    Ok(viewport)
}

/// Move to the bottom-right corner and ask where the cursor ended up.
fn probe<W, S>(out: &mut W, input: &mut S) -> Result<Viewport>
where
    W: Write + ?Sized,
    S: ByteSource + ?Sized,
{
    let mut request: Vec<u8> = Vec::with_capacity(16);
    queue!(request, MoveRight(FAR_MOVE), MoveDown(FAR_MOVE)).map_err(EditorError::Write)?;
    request.extend_from_slice(CURSOR_POSITION_QUERY);

    out.write_all(&request)
        .and_then(|()| out.flush())
        .map_err(|e| EditorError::ViewportDiscovery {
            reason: format!("cannot move cursor: {}", e),
        })?;

    let report = read_report(input)?;
    let (rows, cols) = parse_cursor_report(&report)?;
    Ok(Viewport { rows, cols })
}

/// Collect bytes up to the terminating `R`, or until input runs dry.
fn read_report<S: ByteSource + ?Sized>(input: &mut S) -> Result<Vec<u8>> {
    let mut report = Vec::with_capacity(MAX_REPORT_LEN);
    while report.len() < MAX_REPORT_LEN {
        match input.read_byte().map_err(EditorError::Read)? {
            Some(b'R') => {
                report.push(b'R');
                break;
            }
            Some(byte) => report.push(byte),
            None => break,
        }
    }
    Ok(report)
}

/// Parse `ESC [ rows ; cols R` into `(rows, cols)`.
pub fn parse_cursor_report(report: &[u8]) -> Result<(u16, u16)> {
    let malformed = || EditorError::MalformedResponse(String::from_utf8_lossy(report).into_owned());

    let body = report
        .strip_prefix(b"\x1b[")
        .and_then(|rest| rest.strip_suffix(b"R"))
        .ok_or_else(malformed)?;
    let body = std::str::from_utf8(body).map_err(|_| malformed())?;
    let (rows, cols) = body.split_once(';').ok_or_else(malformed)?;

    let rows = parse_dimension(rows).ok_or_else(malformed)?;
    let cols = parse_dimension(cols).ok_or_else(malformed)?;
    Ok((rows, cols))
}

fn parse_dimension(text: &str) -> Option<u16> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "not a terminal"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_primary_size_wins() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"";
        let vp = discover(Ok((80, 24)), &mut out, &mut input).unwrap();
        assert_eq!(vp, Viewport { rows: 24, cols: 80 });
        assert!(out.is_empty());
    }

    #[test]
    fn test_fallback_on_zero_width() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"\x1b[50;132R";
        let vp = discover(Ok((0, 0)), &mut out, &mut input).unwrap();
        assert_eq!(vp, Viewport { rows: 50, cols: 132 });
        assert_eq!(out, b"\x1b[999C\x1b[999B\x1b[6n".to_vec());
    }

    #[test]
    fn test_fallback_on_query_error() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"\x1b[24;80Rxyz";
        let primary = Err(io::Error::new(io::ErrorKind::Other, "ioctl"));
        let vp = discover(primary, &mut out, &mut input).unwrap();
        assert_eq!(vp, Viewport { rows: 24, cols: 80 });
        // Bytes after the report are left alone
        assert_eq!(input, b"xyz");
    }

    #[test]
    fn test_truncated_report_fails() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"\x1b[24;8";
        let err = discover(Ok((0, 24)), &mut out, &mut input).unwrap_err();
        assert!(matches!(err, EditorError::ViewportDiscovery { .. }));
        assert_eq!(err.operation(), "getWindowSize");
    }

    #[test]
    fn test_unwritable_output_fails() {
        let mut input: &[u8] = b"\x1b[24;80R";
        let err = discover(Ok((0, 0)), &mut ClosedOutput, &mut input).unwrap_err();
        assert!(matches!(err, EditorError::ViewportDiscovery { .. }));
    }

    #[test]
    fn test_parse_cursor_report() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80R").unwrap(), (24, 80));
        assert_eq!(parse_cursor_report(b"\x1b[1;1R").unwrap(), (1, 1));

        for bad in [
            "",
            "24;80R",
            "\x1b[24;80",
            "\x1b[24R",
            "\x1b[;80R",
            "\x1b[24;R",
            "\x1b[2a;80R",
            "\x1b[0;80R",
            "\x1b[-1;80R",
            "\x1b[24;99999R",
        ] {
            let err = parse_cursor_report(bad.as_bytes()).unwrap_err();
            assert!(matches!(err, EditorError::MalformedResponse(_)), "{:?}", bad);
        }
    }
}
