//! Row — one line of the document in three parallel forms.
//!
//! - `chars`: the text as typed and saved, tabs included.
//! - `render`: the display form, each tab expanded with spaces up to the
//!   next multiple of the tab stop.
//! - `hl`: one [`Highlight`] per `render` character.
//!
//! `render` and `hl` are private and only ever rebuilt together by
//! [`Row::update`], so `hl.len() == render.len()` and
//! `render.len() >= chars.len()` hold after every public call. Search may
//! recolor `hl` in place through [`Row::hl_mut`], which hands out a slice
//! and so cannot change its length.
//!
//! Columns are char offsets: `cx` indexes `chars`, `rx` indexes `render`.

use crate::highlight::highlight_row;
use crate::syntax::{Highlight, Syntax};

/// A single line of text with its derived display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    idx: usize,
    chars: Vec<char>,
    render: Vec<char>,
    hl: Vec<Highlight>,
    open_comment: bool,
}

impl Row {
    /// Create a row at position `idx`. Call [`update`](Self::update) to
    /// derive its render text and highlighting.
    #[must_use]
    pub fn new(idx: usize, text: &str) -> Self {
        Self::from_chars(idx, text.chars().collect())
    }

    pub(crate) const fn from_chars(idx: usize, chars: Vec<char>) -> Self {
        Self {
            idx,
            chars,
            render: Vec::new(),
            hl: Vec::new(),
            open_comment: false,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Position of this row in its buffer.
    #[inline]
    #[must_use]
    pub const fn idx(&self) -> usize {
        self.idx
    }

    #[inline]
    pub(crate) const fn set_idx(&mut self, idx: usize) {
        self.idx = idx;
    }

    /// The raw characters.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of raw characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the row has no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The tab-expanded display characters.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[char] {
        &self.render
    }

    /// Highlight category of each display character.
    #[inline]
    #[must_use]
    pub fn hl(&self) -> &[Highlight] {
        &self.hl
    }

    /// Mutable highlight tags for a transient overlay. Fixed length.
    #[inline]
    pub(crate) fn hl_mut(&mut self) -> &mut [Highlight] {
        &mut self.hl
    }

    /// Whether a block comment is still open at the end of this row.
    #[inline]
    #[must_use]
    pub const fn open_comment(&self) -> bool {
        self.open_comment
    }

    /// The raw text as a `String`.
    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    // -- Coordinate mapping -------------------------------------------------

    /// Convert a raw column to a display column.
    ///
    /// `cx` may be one past the end (the cursor after the last char).
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        self.chars.iter().take(cx).fold(0, |rx, &c| {
            if c == '\t' {
                rx + tab_stop - rx % tab_stop
            } else {
                rx + 1
            }
        })
    }

    /// Convert a display column back to a raw column.
    ///
    /// Returns the first `cx` whose display span reaches past `rx`, so every
    /// column inside a tab's expansion maps to the tab itself. Columns past
    /// the end map to [`len`](Self::len).
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let mut cur = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            if c == '\t' {
                cur += tab_stop - cur % tab_stop;
            } else {
                cur += 1;
            }
            if cur > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    // -- Derivation ---------------------------------------------------------

    /// Rebuild `render` and `hl` from `chars`.
    ///
    /// Returns `true` when the row's end-of-row comment state changed, which
    /// means the next row must be re-highlighted too.
    pub fn update(&mut self, tab_stop: usize, syntax: Option<&Syntax>, prev_open: bool) -> bool {
        self.render.clear();
        for &c in &self.chars {
            if c == '\t' {
                self.render.push(' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(' ');
                }
            } else {
                self.render.push(c);
            }
        }

        let open = highlight_row(&self.render, syntax, prev_open, &mut self.hl);
        let changed = open != self.open_comment;
        self.open_comment = open;
        changed
    }

    // -- Raw edits (callers must follow with `update`) ------------------------

    /// Insert `ch` at `at`, clamped to the row length.
    pub(crate) fn insert_char(&mut self, at: usize, ch: char) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
    }

    /// Remove the char at `at`. Returns `false` if out of range.
    pub(crate) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        true
    }

    /// Append raw characters to the end.
    pub(crate) fn append(&mut self, tail: &[char]) {
        self.chars.extend_from_slice(tail);
    }

    /// Cut the row at `at`, returning everything from `at` on.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<char> {
        let at = at.min(self.chars.len());
        self.chars.split_off(at)
    }
}
