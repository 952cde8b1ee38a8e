// SPDX-License-Identifier: MIT
//
// Style — the display attribute attached to every run of output text.
//
// The editor paints with the classic eight-color ANSI palette plus the
// terminal default, and one attribute (inverse video) used for the status
// line and for control-character glyphs. That is the whole vocabulary:
// anything richer belongs in a theme engine, not a kilo-sized editor.
//
// Styles are `Copy` and compared by value. The frame writer compares the
// style of each span with the style it last emitted and only writes SGR
// sequences on a change.

// ─── Color ──────────────────────────────────────────────────────────────────

/// Foreground color from the eight-color ANSI palette.
///
/// Maps one-to-one onto SGR 30–37; [`Default`](Color::Default) is SGR 39
/// and inherits whatever the user's terminal theme uses for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// The SGR parameter that selects this color as foreground.
    #[inline]
    #[must_use]
    pub const fn sgr(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Default => 39,
        }
    }
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// Display attribute for a run of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// SGR 7 — swap foreground and background.
    pub inverse: bool,
}

impl Style {
    /// Terminal default: default foreground, no inverse.
    pub const DEFAULT: Self = Self {
        fg: Color::Default,
        inverse: false,
    };

    /// A plain foreground color.
    #[inline]
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            inverse: false,
        }
    }

    /// The same style with inverse video turned on.
    #[inline]
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            fg: self.fg,
            inverse: true,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
