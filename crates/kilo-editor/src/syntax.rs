//! Syntax rules — highlight categories and the built-in file-type table.
//!
//! A [`Syntax`] is a static, declarative description of one file type:
//! which filenames it applies to, its two keyword classes, comment markers,
//! and which optional token kinds (numbers, strings) are recognized. The
//! highlighter in [`crate::highlight`] consumes it; nothing here runs any
//! scanning logic.
//!
//! Selection is by filename: a pattern starting with `.` must be a suffix
//! of the name, any other pattern matches as a substring. The first entry
//! with a matching pattern wins. No match means no highlighting at all.

use bitflags::bitflags;
use kilo_term::style::{Color, Style};

// ---------------------------------------------------------------------------
// Highlight category
// ---------------------------------------------------------------------------

/// Highlight category of one rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    /// Transient search-match overlay.
    Match,
}

impl Highlight {
    /// Foreground color used to paint this category.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Comment | Self::MlComment => Color::Cyan,
            Self::Keyword1 => Color::Yellow,
            Self::Keyword2 => Color::Green,
            Self::String => Color::Magenta,
            Self::Number => Color::Red,
            Self::Match => Color::Blue,
            Self::Normal => Color::Default,
        }
    }

    /// Display style for this category.
    #[inline]
    #[must_use]
    pub const fn style(self) -> Style {
        Style::fg(self.color())
    }
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

bitflags! {
    /// Optional token kinds a rule set enables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 0b01;
        const STRINGS = 0b10;
    }
}

/// Highlighting rules for one file type.
///
/// Keywords ending in `|` belong to the second class (types, usually); the
/// marker is not part of the matched text.
#[derive(Debug)]
pub struct Syntax {
    /// Short label shown in the status line.
    pub filetype: &'static str,
    /// Filename patterns: `.ext` suffixes or plain substrings.
    pub patterns: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub line_comment: &'static str,
    pub block_comment: (&'static str, &'static str),
    pub flags: SyntaxFlags,
}

impl Syntax {
    /// Whether this rule set applies to `filename`.
    #[must_use]
    pub fn matches(&self, filename: &str) -> bool {
        self.patterns.iter().any(|pat| {
            if pat.starts_with('.') {
                filename.ends_with(pat)
            } else {
                filename.contains(pat)
            }
        })
    }

    /// Pick the first rule set in [`HLDB`] that applies to `filename`.
    #[must_use]
    pub fn select(filename: &str) -> Option<&'static Self> {
        HLDB.iter().find(|s| s.matches(filename))
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

const C_PATTERNS: &[&str] = &[".c", ".h", ".cpp"];

const C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
    "typedef", "static", "enum", "class", "case", //
    "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|", "void|",
];

const RUST_PATTERNS: &[&str] = &[".rs"];

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self",
    "static", "struct", "super", "trait", "type", "unsafe", "use", "where", "while", //
    "bool|", "char|", "str|", "String|", "Self|", "Option|", "Result|", "Vec|", "i8|", "i16|",
    "i32|", "i64|", "isize|", "u8|", "u16|", "u32|", "u64|", "usize|", "f32|", "f64|",
];

/// The highlight database, searched in order.
pub static HLDB: &[Syntax] = &[
    Syntax {
        filetype: "c",
        patterns: C_PATTERNS,
        keywords: C_KEYWORDS,
        line_comment: "//",
        block_comment: ("/*", "*/"),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    Syntax {
        filetype: "rust",
        patterns: RUST_PATTERNS,
        keywords: RUST_KEYWORDS,
        line_comment: "//",
        block_comment: ("/*", "*/"),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];
