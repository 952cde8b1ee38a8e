// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal layer for the kilo editor.
//
// Raw mode and the alternate screen over termios, a key decoder for the
// escape sequences terminals actually send, and a frame writer that turns
// styled runs into ANSI output with one write per frame.
//
// No TUI framework sits underneath: the crate speaks termios and ANSI
// directly. The editor core only produces `Frame` values and consumes
// `KeyEvent`s, so everything above this crate runs in tests without a tty.

pub mod ansi;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod output;
pub mod reader;
pub mod style;
pub mod terminal;
