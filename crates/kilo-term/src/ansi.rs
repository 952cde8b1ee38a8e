// SPDX-License-Identifier: MIT
//
// ANSI escape sequences used by the editor.
//
// Fixed sequences are byte constants; the two that take parameters (cursor
// placement and foreground color) are functions. Nothing here decides when
// to emit; that is the frame writer's job. Positions are 0-based in our
// API and converted to the terminal's 1-based CUP coordinates.

use std::io::{self, Write};

use crate::style::Color;

/// Hide the cursor (DECTCEM reset).
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
/// Show the cursor (DECTCEM set).
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
/// Cursor to the top-left cell.
pub const HOME: &[u8] = b"\x1b[H";
/// Erase the whole screen (ED 2).
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
/// Erase from the cursor to the end of the line (EL 0).
pub const CLEAR_LINE: &[u8] = b"\x1b[K";
/// Drop every SGR attribute, inverse and color alike.
pub const RESET: &[u8] = b"\x1b[m";
/// Inverse video (SGR 7).
pub const INVERSE: &[u8] = b"\x1b[7m";
/// Switch to the alternate screen; the shell's screen is kept aside.
pub const ENTER_ALT_SCREEN: &[u8] = b"\x1b[?1049h";
/// Back to the shell's screen.
pub const EXIT_ALT_SCREEN: &[u8] = b"\x1b[?1049l";

/// Move the cursor to column `x`, row `y` (0-based).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Set the foreground color: SGR 30–37, or 39 for [`Color::Default`].
#[inline]
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.sgr())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(
            emit(|w| cursor_to(w, u16::MAX, u16::MAX)),
            "\x1b[65536;65536H"
        );
    }

    #[test]
    fn fg_codes() {
        assert_eq!(emit(|w| fg(w, Color::Default)), "\x1b[39m");
        assert_eq!(emit(|w| fg(w, Color::Red)), "\x1b[31m");
        assert_eq!(emit(|w| fg(w, Color::Cyan)), "\x1b[36m");
    }

    #[test]
    fn fixed_sequences_are_csi() {
        for seq in [
            HIDE_CURSOR,
            SHOW_CURSOR,
            HOME,
            CLEAR_SCREEN,
            CLEAR_LINE,
            RESET,
            INVERSE,
            ENTER_ALT_SCREEN,
            EXIT_ALT_SCREEN,
        ] {
            assert!(seq.starts_with(b"\x1b["), "{seq:?}");
        }
    }
}
