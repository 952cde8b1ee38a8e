// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into logical key events. The editor only ever
// sees the closed set of keys defined here — printable characters, the
// editing/navigation keys, and Ctrl/Alt-modified letters:
//
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, Home/End, Delete, PageUp/PageDown,
//   with optional xterm modifier parameters)
// - SS3 sequences (arrows, Home/End from application-cursor mode)
// - Alt+key (ESC followed by a printable character)
// - UTF-8 multi-byte characters
//
// # Design
//
// The parser maintains a small internal byte buffer because escape
// sequences can span multiple `read()` calls. Feed bytes with
// [`Parser::advance`], retrieve events from the returned `Vec`.
// After a timeout with no new bytes, call [`Parser::flush`] to
// emit any pending lone ESC as a real Escape keypress.
//
// Unknown sequences are consumed and dropped rather than leaking their
// bytes into the document as text.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl).
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + a letter.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Ctrl + `ch` (and nothing else).
    #[inline]
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers == Modifiers::CTRL
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable, or a letter when Ctrl is held).
    Char(char),
    // ── Editing keys ────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding where `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. The parser buffers incomplete sequences internally and
/// resumes parsing when more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be either a standalone Escape keypress
/// or the start of a multi-byte escape sequence. The parser holds it as
/// pending. The caller should wait a short timeout and then call
/// [`flush`](Parser::flush) to emit the pending ESC as a real Escape key.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return all events that can be parsed.
    ///
    /// Bytes that form an incomplete sequence are kept in the internal
    /// buffer and will be combined with future [`advance`](Parser::advance)
    /// calls.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        // Compact: remove consumed bytes, keep unconsumed remainder.
        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// Called after a timeout to resolve the ESC ambiguity: an ESC that
    /// never grew into a sequence becomes an Escape key and the bytes after
    /// it are parsed on their own. A truncated UTF-8 tail is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let pending = std::mem::take(&mut self.buf);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < pending.len() {
            match try_parse(&pending[pos..]) {
                Parsed::Key(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Skip(n) => pos += n.max(1),
                Parsed::Incomplete if pending[pos] == 0x1B => {
                    events.push(KeyEvent::plain(KeyCode::Escape));
                    pos += 1;
                }
                Parsed::Incomplete => break,
            }
        }

        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// All parse functions are pure — they read from the front of `buf` and
// return what they found plus how many bytes to consume.

/// Result of trying to parse one event from the buffer.
enum Parsed {
    /// Successfully parsed a key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete — need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single event from the front of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        // ESC — could be escape sequence or standalone Escape key.
        0x1B => parse_escape(buf),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Key(KeyEvent::ctrl((b + b'a' - 1) as char), 1)
        }
        // ASCII printable.
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::plain(KeyCode::Char(b as char)), 1),
        // UTF-8 multi-byte.
        0xC0..=0xFF => parse_utf8(buf),
        // NUL, remaining C0 controls, bare continuation bytes.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        // CSI: ESC [
        b'[' => parse_csi(buf),
        // SS3: ESC O
        b'O' => parse_ss3(buf),
        // Alt+printable character.
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent {
                code: KeyCode::Char(b as char),
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        // Anything else after ESC — emit standalone Escape, reparse the rest.
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Scan for the final byte (0x40..=0x7E).
    // CSI parameter bytes are in 0x30..=0x3F, intermediate in 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            // Invalid byte in CSI sequence — abort.
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;

    // ── Tilde-terminated sequences (editing keys) ───────────────────
    if final_byte == b'~' {
        let first = params.first().copied().unwrap_or(0);
        let modifiers = params
            .get(1)
            .map_or(Modifiers::empty(), |&p| decode_modifiers(p));

        let code = match first {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Key(KeyEvent { code, modifiers }, consumed);
    }

    // ── Letter-terminated sequences ─────────────────────────────────
    let modifiers = params
        .get(1)
        .map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Key(KeyEvent { code, modifiers }, consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(KeyEvent::plain(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(expected), |ch| {
            Parsed::Key(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
    })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Parse semicolon-separated numeric CSI parameters.
///
/// Examples:
/// - `1;5` → `[1, 5]`
/// - `3~`'s params `3` → `[3]`
/// - (empty) → `[]`
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode a CSI modifier parameter into `Modifiers` bitflags.
///
/// The encoding is `1 + bitmask`. A parameter of 0 or 1 means no modifiers.
/// The truncation to u8 is intentional: only the low bits carry flags.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes (continuation bytes, 0xF8..).
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
