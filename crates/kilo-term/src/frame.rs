// SPDX-License-Identifier: MIT
//
// Frame — a complete, terminal-independent description of one screen.
//
// The editor core never writes escape sequences. It builds a `Frame`:
// one `Line` per text row, a status string, an optional message, and the
// cursor position. The `FrameWriter` in `output.rs` turns that into bytes.
//
// A `Line` is a list of styled runs (`Span`s). `Line::push` is the
// attribute-run encoder: consecutive characters with the same style are
// appended to the same span, so the writer emits one SGR change per run
// instead of one per character.

use unicode_width::UnicodeWidthChar;

use crate::style::Style;

// ─── Span ───────────────────────────────────────────────────────────────────

/// A run of characters sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub style: Style,
    pub text: String,
}

// ─── Line ───────────────────────────────────────────────────────────────────

/// One display row built from styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    /// An empty line.
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// A line holding a single run.
    #[must_use]
    pub fn styled(style: Style, text: &str) -> Self {
        let mut line = Self::new();
        line.push_str(style, text);
        line
    }

    /// Append one character, extending the last span when the style matches.
    pub fn push(&mut self, style: Style, ch: char) {
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push(ch),
            _ => self.spans.push(Span {
                style,
                text: ch.to_string(),
            }),
        }
    }

    /// Append a string with a single style.
    pub fn push_str(&mut self, style: Style, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(Span {
                style,
                text: text.to_owned(),
            }),
        }
    }

    /// The styled runs, in order.
    #[inline]
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Whether the line has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The plain text of the line with styles stripped.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

// ─── Frame ──────────────────────────────────────────────────────────────────

/// Everything needed to paint one screen.
///
/// `rows` has exactly as many entries as the text area is tall. The status
/// line is rendered in inverse video across the full width; the message
/// line sits below it. `cursor` is a 0-indexed `(x, y)` screen position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<Line>,
    pub status: String,
    pub message: Option<String>,
    pub cursor: (u16, u16),
}

// ─── Width helpers ──────────────────────────────────────────────────────────

/// Display width of a string in terminal columns.
///
/// Zero-width and control characters count as zero.
#[must_use]
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// The longest prefix of `s` that fits in `max` terminal columns.
///
/// Never splits a wide character: if it would straddle the limit, it is
/// left out entirely.
#[must_use]
pub fn truncate_to_width(s: &str, max: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            return &s[..idx];
        }
        width += w;
    }
    s
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_coalesces_same_style() {
        let mut line = Line::new();
        line.push(Style::DEFAULT, 'a');
        line.push(Style::DEFAULT, 'b');
        line.push(Style::DEFAULT, 'c');
        assert_eq!(line.spans().len(), 1);
        assert_eq!(line.text(), "abc");
    }

    #[test]
    fn push_splits_on_style_change() {
        let red = Style::fg(Color::Red);
        let mut line = Line::new();
        line.push(Style::DEFAULT, 'x');
        line.push(red, '1');
        line.push(red, '2');
        line.push(Style::DEFAULT, 'y');
        assert_eq!(
            line.spans(),
            &[
                Span { style: Style::DEFAULT, text: "x".into() },
                Span { style: red, text: "12".into() },
                Span { style: Style::DEFAULT, text: "y".into() },
            ]
        );
    }

    #[test]
    fn push_str_extends_matching_span() {
        let mut line = Line::styled(Style::DEFAULT, "foo");
        line.push_str(Style::DEFAULT, "bar");
        assert_eq!(line.spans().len(), 1);
        assert_eq!(line.text(), "foobar");
    }

    #[test]
    fn push_str_empty_is_noop() {
        let mut line = Line::new();
        line.push_str(Style::DEFAULT, "");
        assert!(line.is_empty());
    }

    #[test]
    fn width_ascii() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn width_wide_chars() {
        assert_eq!(display_width("中文"), 4);
    }

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate_to_width("abc", 10), "abc");
    }

    #[test]
    fn truncate_cuts() {
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn truncate_never_splits_wide_char() {
        assert_eq!(truncate_to_width("a中b", 2), "a");
    }

    #[test]
    fn truncate_zero() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
