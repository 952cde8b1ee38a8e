//! View — the scroll window onto a buffer, and frame rendering.
//!
//! The view owns two offsets (first visible row, first visible display
//! column) and the size of the text area. [`View::scroll`] moves the window
//! just enough to contain the cursor; [`View::render`] reads the buffer and
//! produces a [`Frame`] without touching the buffer.
//!
//! # Screen layout
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ text rows (screen_rows)      │  rows past the end show `~`
//! │ ...                          │
//! ├──────────────────────────────┤
//! │ status line (inverse video)  │  name - N lines (modified)   ft | y/N
//! ├──────────────────────────────┤
//! │ message line                 │
//! └──────────────────────────────┘
//! ```
//!
//! Each visible row is the slice `[col_off, col_off + screen_cols)` of the
//! row's render text. Highlight tags become colors and consecutive chars of
//! the same color share one styled run. Control characters are drawn as a
//! single inverse-video glyph (`^A` shows as `A`, others as `?`).

use kilo_term::frame::{Frame, Line, display_width, truncate_to_width};
use kilo_term::style::Style;
use kilo_term::terminal::Size;

use crate::buffer::Buffer;

/// Version string shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows taken by the status and message lines.
const CHROME_ROWS: u16 = 2;

/// Max chars of the filename in the status line.
const STATUS_NAME_WIDTH: usize = 20;

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Scroll offsets and text-area size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    row_off: usize,
    col_off: usize,
    screen_rows: usize,
    screen_cols: usize,
}

impl View {
    /// A view with a text area of `screen_rows` × `screen_cols`.
    #[must_use]
    pub const fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            screen_rows,
            screen_cols,
        }
    }

    /// A view filling a terminal of `size`, minus the two bottom lines.
    #[must_use]
    pub fn for_terminal(size: Size) -> Self {
        let mut view = Self::new(0, 0);
        view.resize(size);
        view
    }

    /// Adopt a new terminal size. Offsets are fixed up by the next scroll.
    pub fn resize(&mut self, size: Size) {
        self.screen_rows = usize::from(size.rows.saturating_sub(CHROME_ROWS));
        self.screen_cols = usize::from(size.cols);
    }

    #[inline]
    #[must_use]
    pub const fn row_off(&self) -> usize {
        self.row_off
    }

    #[inline]
    #[must_use]
    pub const fn col_off(&self) -> usize {
        self.col_off
    }

    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    /// Set both offsets directly (restoring a saved position, or pushing
    /// the row offset past the end so the next scroll puts the cursor row
    /// at the top).
    pub const fn set_offsets(&mut self, row_off: usize, col_off: usize) {
        self.row_off = row_off;
        self.col_off = col_off;
    }

    /// Shift the window so (`cy`, `rx`) is visible.
    pub fn scroll(&mut self, cy: usize, rx: usize) {
        if cy < self.row_off {
            self.row_off = cy;
        }
        if cy >= self.row_off + self.screen_rows {
            self.row_off = (cy + 1).saturating_sub(self.screen_rows);
        }
        if rx < self.col_off {
            self.col_off = rx;
        }
        if rx >= self.col_off + self.screen_cols {
            self.col_off = (rx + 1).saturating_sub(self.screen_cols);
        }
    }

    // -- Rendering ----------------------------------------------------------

    /// Describe the screen for `buf` with the cursor at display column `rx`.
    ///
    /// Call [`scroll`](Self::scroll) first; the cursor is assumed visible.
    #[must_use]
    pub fn render(&self, buf: &Buffer, rx: usize, message: Option<&str>) -> Frame {
        let rows = (0..self.screen_rows).map(|y| self.draw_row(buf, y)).collect();

        let message = message
            .map(|m| truncate_to_width(m, self.screen_cols))
            .filter(|m| !m.is_empty())
            .map(str::to_owned);

        let cursor = buf.cursor();
        let x = rx.saturating_sub(self.col_off);
        let y = cursor.cy.saturating_sub(self.row_off);

        Frame {
            rows,
            status: self.status_line(buf),
            message,
            cursor: (to_u16(x), to_u16(y)),
        }
    }

    fn draw_row(&self, buf: &Buffer, y: usize) -> Line {
        let filerow = y + self.row_off;

        let Some(row) = buf.row(filerow) else {
            if buf.num_rows() == 0 && y == self.screen_rows / 3 {
                return self.welcome();
            }
            return Line::styled(Style::DEFAULT, "~");
        };

        let mut line = Line::new();
        let start = self.col_off.min(row.render().len());
        let end = (self.col_off + self.screen_cols).min(row.render().len());

        for (&c, &h) in row.render()[start..end].iter().zip(&row.hl()[start..end]) {
            if c.is_ascii_control() {
                let glyph = if (c as u32) <= 26 {
                    char::from(b'@' + c as u8)
                } else {
                    '?'
                };
                line.push(h.style().inverted(), glyph);
            } else {
                line.push(h.style(), c);
            }
        }
        line
    }

    fn welcome(&self) -> Line {
        let banner = format!("Kilo editor -- version {VERSION}");
        let banner = truncate_to_width(&banner, self.screen_cols);
        let mut padding = (self.screen_cols - display_width(banner)) / 2;

        let mut line = Line::new();
        if padding > 0 {
            line.push(Style::DEFAULT, '~');
            padding -= 1;
        }
        line.push_str(Style::DEFAULT, &" ".repeat(padding));
        line.push_str(Style::DEFAULT, banner);
        line
    }

    /// Left: name, line count, modified flag. Right: file type and
    /// position, flush with the right edge when there is room for it.
    fn status_line(&self, buf: &Buffer) -> String {
        let name = buf
            .filename()
            .map_or_else(|| "[No Name]".to_owned(), |p| p.display().to_string());
        let modified = if buf.is_dirty() { "(modified)" } else { "" };
        let left = format!(
            "{name:.width$} - {} lines {modified}",
            buf.num_rows(),
            width = STATUS_NAME_WIDTH
        );
        let right = format!(
            "{} | {}/{}",
            buf.syntax().map_or("no ft", |s| s.filetype),
            buf.cursor().cy + 1,
            buf.num_rows()
        );

        let cols = self.screen_cols;
        let mut status = truncate_to_width(&left, cols).to_owned();
        let mut len = display_width(&status);
        let rlen = display_width(&right);

        while len < cols {
            if cols - len == rlen {
                status.push_str(&right);
                break;
            }
            status.push(' ');
            len += 1;
        }
        status
    }
}

#[inline]
fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::syntax::Highlight;
    use kilo_term::frame::Span;
    use kilo_term::style::Color;
    use pretty_assertions::assert_eq;

    fn texts(frame: &Frame) -> Vec<String> {
        frame.rows.iter().map(Line::text).collect()
    }

    // -- Scrolling ----------------------------------------------------------

    #[test]
    fn scroll_down_keeps_cursor_on_last_row() {
        let mut v = View::new(10, 80);
        v.scroll(15, 0);
        assert_eq!(v.row_off(), 6);
    }

    #[test]
    fn scroll_up_puts_cursor_on_first_row() {
        let mut v = View::new(10, 80);
        v.set_offsets(20, 0);
        v.scroll(5, 0);
        assert_eq!(v.row_off(), 5);
    }

    #[test]
    fn scroll_horizontally() {
        let mut v = View::new(10, 20);
        v.scroll(0, 25);
        assert_eq!(v.col_off(), 6);
        v.scroll(0, 3);
        assert_eq!(v.col_off(), 3);
    }

    #[test]
    fn scroll_within_window_is_noop() {
        let mut v = View::new(10, 20);
        v.set_offsets(5, 5);
        v.scroll(9, 10);
        assert_eq!((v.row_off(), v.col_off()), (5, 5));
    }

    #[test]
    fn resize_reserves_two_lines() {
        let v = View::for_terminal(Size { cols: 80, rows: 24 });
        assert_eq!((v.screen_rows(), v.screen_cols()), (22, 80));
        let tiny = View::for_terminal(Size { cols: 10, rows: 1 });
        assert_eq!(tiny.screen_rows(), 0);
    }

    // -- Rows ---------------------------------------------------------------

    #[test]
    fn empty_buffer_shows_welcome_and_tildes() {
        let buf = Buffer::new(8);
        let v = View::new(6, 40);
        let frame = v.render(&buf, 0, None);
        let rows = texts(&frame);
        assert_eq!(rows.len(), 6);
        let banner = format!("Kilo editor -- version {VERSION}");
        let pad = (40 - banner.len()) / 2;
        assert_eq!(rows[2], format!("~{}{banner}", " ".repeat(pad - 1)));
        for (i, r) in rows.iter().enumerate() {
            if i != 2 {
                assert_eq!(r, "~");
            }
        }
    }

    #[test]
    fn welcome_truncated_to_width() {
        let buf = Buffer::new(8);
        let v = View::new(3, 5);
        let frame = v.render(&buf, 0, None);
        assert_eq!(frame.rows[1].text(), "Kilo ");
    }

    #[test]
    fn rows_past_end_show_tilde_not_welcome() {
        let buf = Buffer::from_lines(["one"], 8);
        let frame = View::new(4, 20).render(&buf, 0, None);
        assert_eq!(texts(&frame), vec!["one", "~", "~", "~"]);
    }

    #[test]
    fn row_slice_respects_offsets() {
        let buf = Buffer::from_lines(["0123456789", "abcdefghij"], 8);
        let mut v = View::new(1, 4);
        v.set_offsets(1, 3);
        let frame = v.render(&buf, 3, None);
        assert_eq!(texts(&frame), vec!["defg"]);
    }

    #[test]
    fn col_off_past_row_end_gives_empty_row() {
        let buf = Buffer::from_lines(["ab"], 8);
        let mut v = View::new(1, 4);
        v.set_offsets(0, 10);
        let frame = v.render(&buf, 10, None);
        assert!(frame.rows[0].is_empty());
    }

    #[test]
    fn tabs_render_as_spaces() {
        let buf = Buffer::from_lines(["\tx"], 4);
        let frame = View::new(1, 20).render(&buf, 0, None);
        assert_eq!(frame.rows[0].text(), "    x");
    }

    #[test]
    fn colors_are_coalesced_into_runs() {
        let mut buf = Buffer::from_lines(["int x = 42;"], 8);
        buf.set_filename("a.c");
        let frame = View::new(1, 40).render(&buf, 0, None);
        assert_eq!(
            frame.rows[0].spans(),
            &[
                Span { style: Style::fg(Color::Green), text: "int".into() },
                Span { style: Style::DEFAULT, text: " x = ".into() },
                Span { style: Style::fg(Color::Red), text: "42".into() },
                Span { style: Style::DEFAULT, text: ";".into() },
            ]
        );
    }

    #[test]
    fn control_chars_are_inverse_glyphs() {
        let mut buf = Buffer::from_lines(["\"a\u{1}b\u{7f}\""], 8);
        buf.set_filename("a.c");
        let frame = View::new(1, 40).render(&buf, 0, None);
        let magenta = Style::fg(Color::Magenta);
        let inverse = magenta.inverted();
        assert_eq!(
            frame.rows[0].spans(),
            &[
                Span { style: magenta, text: "\"a".into() },
                Span { style: inverse, text: "A".into() },
                Span { style: magenta, text: "b".into() },
                Span { style: inverse, text: "?".into() },
                Span { style: magenta, text: "\"".into() },
            ]
        );
    }

    #[test]
    fn control_glyph_outside_tokens_is_plain_inverse() {
        let buf = Buffer::from_lines(["x\u{2}"], 8);
        let frame = View::new(1, 40).render(&buf, 0, None);
        assert_eq!(
            frame.rows[0].spans(),
            &[
                Span { style: Style::DEFAULT, text: "x".into() },
                Span { style: Style::DEFAULT.inverted(), text: "B".into() },
            ]
        );
    }

    #[test]
    fn match_overlay_is_blue() {
        assert_eq!(Highlight::Match.style(), Style::fg(Color::Blue));
    }

    // -- Status & message ---------------------------------------------------

    #[test]
    fn status_unnamed_clean() {
        let buf = Buffer::from_lines(["a", "b"], 8);
        let frame = View::new(2, 40).render(&buf, 0, None);
        let right = "no ft | 1/2";
        let left = "[No Name] - 2 lines ";
        assert_eq!(frame.status.len(), 40);
        assert!(frame.status.starts_with(left));
        assert!(frame.status.ends_with(right));
        assert_eq!(
            frame.status,
            format!("{left}{}{right}", " ".repeat(40 - left.len() - right.len()))
        );
    }

    #[test]
    fn status_named_modified() {
        let mut buf = Buffer::from_lines(["x"], 8);
        buf.set_filename("a_rather_long_file_name.c");
        buf.insert_char('y');
        let frame = View::new(1, 80).render(&buf, 0, None);
        assert!(frame.status.starts_with("a_rather_long_file_n - 1 lines (modified)"));
        assert!(frame.status.ends_with("c | 1/1"));
    }

    #[test]
    fn status_without_room_for_right_part() {
        let buf = Buffer::from_lines(["a"], 8);
        let frame = View::new(1, 22).render(&buf, 0, None);
        assert_eq!(frame.status, "[No Name] - 1 lines   ");
    }

    #[test]
    fn status_truncated_to_width() {
        let buf = Buffer::new(8);
        let frame = View::new(1, 5).render(&buf, 0, None);
        assert_eq!(frame.status, "[No N");
    }

    #[test]
    fn message_is_truncated_and_empty_is_none() {
        let buf = Buffer::new(8);
        let v = View::new(1, 5);
        assert_eq!(v.render(&buf, 0, Some("hello world")).message.as_deref(), Some("hello"));
        assert_eq!(v.render(&buf, 0, Some("")).message, None);
        assert_eq!(v.render(&buf, 0, None).message, None);
    }

    // -- Cursor -------------------------------------------------------------

    #[test]
    fn cursor_is_relative_to_offsets() {
        let mut buf = Buffer::from_lines(["a\tb"; 30], 8);
        buf.set_cursor(Cursor::new(2, 25));
        let rx = buf.render_col();
        let mut v = View::new(10, 5);
        v.scroll(buf.cursor().cy, rx);
        let frame = v.render(&buf, rx, None);
        assert_eq!(v.row_off(), 16);
        assert_eq!(v.col_off(), 4);
        assert_eq!(frame.cursor, (4, 9));
    }
}
