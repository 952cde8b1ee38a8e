// SPDX-License-Identifier: MIT
//
// Output buffering and stateful frame rendering.
//
// Two components work together to minimize terminal I/O:
//
//   OutputBuffer — collects a whole frame in memory so it reaches the
//   terminal in one write() instead of hundreds of small ones.
//
//   FrameWriter — walks a `Frame` row by row and tracks the style it last
//   emitted. Spans already arrive coalesced into runs; the writer only adds
//   the SGR sequences needed to go from one run's style to the next.
//
// Every frame is a full repaint: home the cursor, draw each row followed by
// erase-to-end-of-line, then the status and message lines. No screen clear,
// so there is no flicker between frames.

use std::io::{self, Write};

use crate::ansi;
use crate::frame::{Frame, Line};
use crate::style::Style;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// Bytes of one frame, written to the terminal in a single call.
#[derive(Default)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Send everything to stdout and empty the buffer.
    ///
    /// # Errors
    ///
    /// Writing to stdout failed.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }

    /// Send everything to `w` and empty the buffer.
    ///
    /// # Errors
    ///
    /// Writing to `w` failed.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        w.write_all(&self.buf)?;
        w.flush()?;
        self.buf.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── FrameWriter ─────────────────────────────────────────────────────────────

/// Serializes a [`Frame`] into escape sequences, skipping redundant SGR.
///
/// # Transition rules
///
/// - **Inverse off**: SGR reset (which also drops the color), then the new
///   color if it isn't the default.
/// - **Inverse on**: SGR 7, then the color if it differs.
/// - **Color only**: SGR 3x / 39.
///
/// The tracked style is reset to the default at the start of every row so
/// a row never depends on how the previous one ended.
pub struct FrameWriter {
    current: Style,
}

impl FrameWriter {
    /// Create a writer that assumes the terminal is at default style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Style::DEFAULT,
        }
    }

    /// Serialize a complete frame into `out`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn write_frame(&mut self, out: &mut impl Write, frame: &Frame) -> io::Result<()> {
        out.write_all(ansi::HIDE_CURSOR)?;
        out.write_all(ansi::HOME)?;

        for line in &frame.rows {
            self.write_line(out, line)?;
            out.write_all(ansi::CLEAR_LINE)?;
            out.write_all(b"\r\n")?;
        }

        out.write_all(ansi::INVERSE)?;
        out.write_all(frame.status.as_bytes())?;
        out.write_all(ansi::RESET)?;
        out.write_all(b"\r\n")?;

        out.write_all(ansi::CLEAR_LINE)?;
        if let Some(msg) = &frame.message {
            out.write_all(msg.as_bytes())?;
        }

        let (x, y) = frame.cursor;
        ansi::cursor_to(out, x, y)?;
        out.write_all(ansi::SHOW_CURSOR)
    }

    /// Write one row of styled runs and return the terminal to default style.
    fn write_line(&mut self, out: &mut impl Write, line: &Line) -> io::Result<()> {
        self.current = Style::DEFAULT;
        for span in line.spans() {
            self.apply(out, span.style)?;
            out.write_all(span.text.as_bytes())?;
        }
        self.apply(out, Style::DEFAULT)
    }

    /// Emit the minimal SGR sequence to move from the tracked style to `next`.
    fn apply(&mut self, out: &mut impl Write, next: Style) -> io::Result<()> {
        if next == self.current {
            return Ok(());
        }

        if self.current.inverse && !next.inverse {
            out.write_all(ansi::RESET)?;
            self.current = Style::DEFAULT;
        } else if !self.current.inverse && next.inverse {
            out.write_all(ansi::INVERSE)?;
            self.current.inverse = true;
        }

        if next.fg != self.current.fg {
            ansi::fg(out, next.fg)?;
            self.current.fg = next.fg;
        }
        Ok(())
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
