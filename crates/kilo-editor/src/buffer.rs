//! Text buffer — the ordered rows of one document and every edit on them.
//!
//! A `Buffer` owns its [`Row`]s, the cursor, the active [`Syntax`], and a
//! dirty counter. Every mutation re-derives the touched rows before it
//! returns, so no caller ever sees a row whose render text or highlighting
//! is stale.
//!
//! # Highlight cascade
//!
//! A row's highlighting depends on whether the row above it ended inside a
//! block comment. When an edit flips a row's `open_comment`, the next row
//! is re-highlighted, and so on until a row's state comes out unchanged or
//! the buffer ends. This runs as a loop, not recursion, so a comment opened
//! at the top of a huge file cannot blow the stack.
//!
//! # Clamping
//!
//! Out-of-range rows and columns are never errors. Row operations with an
//! invalid index do nothing; column arguments are clamped to the row.

use std::path::{Path, PathBuf};

use crate::cursor::{Cursor, Move};
use crate::row::Row;
use crate::syntax::{Highlight, Syntax};

/// An in-memory document.
#[derive(Debug)]
pub struct Buffer {
    rows: Vec<Row>,
    cursor: Cursor,
    dirty: usize,
    tab_stop: usize,
    syntax: Option<&'static Syntax>,
    filename: Option<PathBuf>,
}

impl Buffer {
    /// An empty, unnamed buffer.
    #[must_use]
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            cursor: Cursor::default(),
            dirty: 0,
            tab_stop: tab_stop.max(1),
            syntax: None,
            filename: None,
        }
    }

    /// Seed a buffer with one row per line. The result is clean.
    #[must_use]
    pub fn from_lines<I, S>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = Self::new(tab_stop);
        for line in lines {
            let at = buf.rows.len();
            buf.insert_row(at, line.as_ref());
        }
        buf.dirty = 0;
        buf
    }

    /// Seed a buffer from file contents.
    ///
    /// Splits on `\n` and strips trailing `\r`s, so `\r\n` files load as
    /// plain lines. A trailing newline does not produce an extra row.
    #[must_use]
    pub fn from_text(text: &str, tab_stop: usize) -> Self {
        Self::from_lines(text.lines().map(|l| l.trim_end_matches('\r')), tab_stop)
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    #[inline]
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of edits since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> usize {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Reset the dirty counter after a successful save.
    pub const fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Place the cursor, clamping it to the buffer.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        let cy = cursor.cy.min(self.rows.len());
        let cx = cursor.cx.min(self.rows.get(cy).map_or(0, Row::len));
        self.cursor = Cursor::new(cx, cy);
    }

    /// Move the cursor one step.
    pub fn move_cursor(&mut self, m: Move) {
        self.cursor.step(m, &self.rows);
    }

    /// Display column of the cursor in its row.
    #[must_use]
    pub fn render_col(&self) -> usize {
        self.rows
            .get(self.cursor.cy)
            .map_or(0, |row| row.cx_to_rx(self.cursor.cx, self.tab_stop))
    }

    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Name the buffer, pick the rule set for the new name, and re-highlight
    /// every row.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.syntax = Syntax::select(&path.to_string_lossy());
        tracing::debug!(
            path = %path.display(),
            filetype = self.syntax.map_or("none", |s| s.filetype),
            "selected syntax"
        );
        self.filename = Some(path);

        let mut prev_open = false;
        for row in &mut self.rows {
            row.update(self.tab_stop, self.syntax, prev_open);
            prev_open = row.open_comment();
        }
    }

    // -- Row structure ------------------------------------------------------

    /// Insert a row holding `text` at `at`. No-op unless `at <= num_rows`.
    pub fn insert_row(&mut self, at: usize, text: &str) {
        self.insert_row_chars(at, text.chars().collect());
    }

    fn insert_row_chars(&mut self, at: usize, chars: Vec<char>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::from_chars(at, chars));
        self.renumber(at + 1);
        self.rederive(at);
        // The row below now has a different neighbour above it.
        self.rederive(at + 1);
        self.dirty += 1;
    }

    /// Remove the row at `at`. No-op if out of range.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber(at);
        self.rederive(at);
        self.dirty += 1;
    }

    // -- Row content --------------------------------------------------------

    /// Insert `ch` into row `at` at column `col` (clamped).
    pub fn row_insert_char(&mut self, at: usize, col: usize, ch: char) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.insert_char(col, ch);
        self.rederive(at);
        self.dirty += 1;
    }

    /// Remove the char at column `col` of row `at`.
    pub fn row_delete_char(&mut self, at: usize, col: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        if row.delete_char(col) {
            self.rederive(at);
            self.dirty += 1;
        }
    }

    /// Append raw chars to the end of row `at`.
    pub fn row_append(&mut self, at: usize, tail: &[char]) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.append(tail);
        self.rederive(at);
        self.dirty += 1;
    }

    // -- Cursor edits -------------------------------------------------------

    /// Type `ch` at the cursor. On the virtual line past the end, a new row
    /// is appended first.
    pub fn insert_char(&mut self, ch: char) {
        if self.cursor.cy == self.rows.len() {
            self.insert_row(self.rows.len(), "");
        }
        self.row_insert_char(self.cursor.cy, self.cursor.cx, ch);
        self.cursor.cx += 1;
    }

    /// Break the line at the cursor and move to the start of the new line.
    pub fn insert_newline(&mut self) {
        let Cursor { cx, cy } = self.cursor;
        if cx == 0 {
            self.insert_row(cy, "");
        } else if let Some(row) = self.rows.get_mut(cy) {
            let tail = row.split_off(cx);
            self.rederive(cy);
            self.insert_row_chars(cy + 1, tail);
        }
        self.cursor = Cursor::new(0, cy + 1);
    }

    /// Backspace: delete the char left of the cursor, or join this row onto
    /// the previous one when the cursor is at column 0.
    ///
    /// Does nothing at the very start of the buffer or on the virtual line.
    pub fn delete_char(&mut self) {
        let Cursor { cx, cy } = self.cursor;
        if cy >= self.rows.len() || (cx == 0 && cy == 0) {
            return;
        }

        if cx > 0 {
            self.row_delete_char(cy, cx - 1);
            self.cursor.cx -= 1;
        } else {
            let tail = self.rows[cy].chars().to_vec();
            let prev_len = self.rows[cy - 1].len();
            self.row_append(cy - 1, &tail);
            self.delete_row(cy);
            self.cursor = Cursor::new(prev_len, cy - 1);
        }
    }

    // -- Search overlay -----------------------------------------------------

    /// Mutable highlight tags of row `at`, for a transient overlay.
    pub(crate) fn row_hl_mut(&mut self, at: usize) -> Option<&mut [Highlight]> {
        self.rows.get_mut(at).map(Row::hl_mut)
    }

    // -- Persistence --------------------------------------------------------

    /// The persisted form: every row followed by `\n`.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.rows.iter().map(|r| r.len() + 1).sum());
        for row in &self.rows {
            out.extend(row.chars());
            out.push('\n');
        }
        out
    }

    // -- Internals ----------------------------------------------------------

    fn renumber(&mut self, from: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.set_idx(i);
        }
    }

    /// Re-derive row `at`, then each following row while the comment state
    /// carried across the boundary keeps changing.
    fn rederive(&mut self, mut at: usize) {
        while at < self.rows.len() {
            let prev_open = at > 0 && self.rows[at - 1].open_comment();
            if !self.rows[at].update(self.tab_stop, self.syntax, prev_open) {
                break;
            }
            at += 1;
        }
    }
}
