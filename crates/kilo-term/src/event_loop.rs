// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — the heartbeat of the terminal application.
//
// This is the module that wires everything together: stdin bytes are read
// with a deadline, parsed into key events, the application handles them and
// paints a `Frame`, and the frame writer sends it to the terminal in one
// write. One thread. One loop.
//
// # Timing
//
// The loop waits on stdin with one of two deadlines:
//
//   1. **Escape timeout** (short): while the parser holds a lone ESC, wait
//      only briefly for the rest of a sequence. If nothing arrives, flush
//      it as a real Escape key.
//
//   2. **Tick interval** (long): otherwise the loop sleeps in `poll()` and
//      wakes periodically so time-based state (the status message
//      expiring) can request a repaint through `on_tick`.
//
// # SIGWINCH Handling
//
// Terminal resize is detected via a SIGWINCH handler that sets an
// `AtomicBool`. The signal also interrupts `poll()`, so the loop notices
// the flag right away, re-queries the size, and repaints.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::frame::Frame;
use crate::input::{KeyEvent, Parser};
use crate::output::{FrameWriter, OutputBuffer};
use crate::reader::{Read, StdinReader};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler. Checked each loop iteration.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH (terminal resize).
///
/// The handler simply sets the [`SIGWINCH_RECEIVED`] flag. Writing to an
/// atomic is async-signal-safe. `SA_RESTART` is deliberately not set so
/// the signal interrupts a waiting `poll()`.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {
    // No-op on non-unix platforms.
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// What the event loop drives.
///
/// Per iteration: [`on_key`](App::on_key) for each decoded key, then
/// [`on_resize`](App::on_resize) if the window changed, then
/// [`on_tick`](App::on_tick), and finally [`paint`](App::paint) when any of
/// those asked for a repaint.
pub trait App {
    /// Handle one key press. Return [`Action::Quit`] to exit the loop.
    fn on_key(&mut self, _key: &KeyEvent) -> Action {
        Action::Continue
    }

    /// Handle terminal resize. Called with the new dimensions.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every loop iteration, even when no input arrived.
    ///
    /// Return `true` if time-based state changed and a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Build the frame describing the current state.
    ///
    /// Takes `&mut self` because painting may adjust scroll offsets so the
    /// cursor stays visible.
    fn paint(&mut self) -> Frame;
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Configuration for the event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long to wait for the rest of an escape sequence after a lone ESC.
    pub escape_timeout: Duration,
    /// How long to sleep between ticks when no input arrives.
    pub tick_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout: Duration::from_millis(25),
            tick_interval: Duration::from_millis(250),
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Single-threaded read → dispatch → paint loop over the terminal.
///
/// [`run`](Self::run) returns on [`Action::Quit`] or end of input, with the
/// terminal restored either way.
///
/// ```no_run
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::frame::Frame;
/// use kilo_term::input::KeyEvent;
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_key(&mut self, key: &KeyEvent) -> Action {
///         if key.is_ctrl('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self) -> Frame {
///         Frame::default()
///     }
/// }
///
/// EventLoop::new()?.run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    writer: FrameWriter,
    out: OutputBuffer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create a new event loop with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// Create a new event loop with custom timing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            writer: FrameWriter::new(),
            out: OutputBuffer::new(),
            config,
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run the event loop until the application returns [`Action::Quit`].
    ///
    /// This method:
    /// 1. Enters raw mode on the alternate screen
    /// 2. Installs the SIGWINCH handler
    /// 3. Runs the read / dispatch / paint loop
    /// 4. Restores the terminal on exit (even on error)
    ///
    /// # Errors
    ///
    /// Returns an error if terminal enter/leave, reading, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let mut reader = StdinReader::new();
        let result = self.run_inner(app, &mut reader);

        // Always clean up, even if the loop errored.
        self.terminal.leave()?;

        result
    }

    /// The inner loop, separated so cleanup runs regardless of outcome.
    fn run_inner(&mut self, app: &mut impl App, reader: &mut StdinReader) -> io::Result<()> {
        let mut dirty = true; // First frame always renders.

        loop {
            // ── Read stdin ───────────────────────────────────────
            let timeout = if self.parser.has_pending() {
                self.config.escape_timeout
            } else {
                self.config.tick_interval
            };

            let keys = match reader.read(timeout)? {
                Read::Bytes(bytes) => self.parser.advance(bytes),
                // Lone ESC → Escape key.
                Read::Timeout => self.parser.flush(),
                Read::Eof => {
                    tracing::debug!("stdin closed, leaving event loop");
                    return Ok(());
                }
            };

            match dispatch(app, &keys) {
                Action::Quit => return Ok(()),
                Action::Continue => dirty |= !keys.is_empty(),
            }

            // ── Check for terminal resize ────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
                app.on_resize(size);
                dirty = true;
            }

            // ── Tick (time-based state) ──────────────────────────
            if app.on_tick() {
                dirty = true;
            }

            // ── Render if dirty ──────────────────────────────────
            if dirty {
                let frame = app.paint();
                self.writer.write_frame(&mut self.out, &frame)?;
                self.out.flush_stdout()?;
                dirty = false;
            }
        }
    }
}

/// Deliver keys to the app in order, stopping at the first quit.
fn dispatch(app: &mut impl App, keys: &[KeyEvent]) -> Action {
    for key in keys {
        if app.on_key(key) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

// ─── Tests ───────────────────────────────────────────────────────────────────
