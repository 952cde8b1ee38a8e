// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal control — window size, raw mode, and restore on exit or panic.
//
// Raw mode turns off everything the tty driver normally does for a shell:
// echo, canonical line buffering, signal keys (Ctrl-C, Ctrl-Z), flow
// control (Ctrl-S, Ctrl-Q), CR→NL input translation, and output
// post-processing. The editor then sees every key byte as typed and writes
// `\r\n` itself.
//
// `RawMode` remembers the termios it replaced so `leave` can put it back.
// A copy also lives in a global so the panic hook can
// restore the tty without access to the guard. The hook writes its escape
// sequence straight to fd 1, bypassing the stdout lock a panicking frame
// flush may still hold.

use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when neither the tty nor the environment reports a size.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Ask the tty for its size with `ioctl(TIOCGWINSZ)`.
#[cfg(unix)]
fn query_winsize() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
fn query_winsize() -> Option<Size> {
    None
}

/// Parse a size from `COLUMNS` / `LINES` style values.
fn size_from_env(cols: Option<&str>, rows: Option<&str>) -> Option<Size> {
    let cols = cols?.trim().parse::<u16>().ok().filter(|&c| c > 0)?;
    let rows = rows?.trim().parse::<u16>().ok().filter(|&r| r > 0)?;
    Some(Size { cols, rows })
}

/// Current terminal size: the tty, then `COLUMNS`/`LINES`, then 80×24.
#[must_use]
pub fn current_size() -> Size {
    query_winsize()
        .or_else(|| {
            let cols = std::env::var("COLUMNS").ok();
            let rows = std::env::var("LINES").ok();
            size_from_env(cols.as_deref(), rows.as_deref())
        })
        .unwrap_or(Size::FALLBACK)
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Termios to restore from the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// The tty in raw mode, with the settings it replaced.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `Ok(None)` when stdin is not a tty.
    fn enable() -> io::Result<Option<Self>> {
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(None);
        }

        let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let saved = attrs;

        attrs.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        attrs.c_oflag &= !libc::OPOST;
        attrs.c_cflag |= libc::CS8;
        attrs.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        // The reader polls first, so a blocking one-byte read never stalls.
        attrs.c_cc[libc::VMIN] = 1;
        attrs.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        tracing::debug!("raw mode on");
        Ok(Some(Self { saved }))
    }

    fn disable(&self) -> io::Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.saved) }
            != 0
        {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        tracing::debug!("raw mode off");
        Ok(())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    fn disable(&self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic hook ─────────────────────────────────────────────────────────────

/// Written to fd 1 when panicking: reset attributes, show the cursor,
/// leave the alternate screen (last, so the shell reappears clean).
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
        if let Ok(slot) = SAVED_TERMIOS.lock() {
            if let Some(saved) = slot.as_ref() {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
            }
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The controlling terminal: cached size plus the raw-mode session.
///
/// [`enter`](Self::enter) puts the tty in raw mode on the alternate screen;
/// [`leave`](Self::leave), dropping the handle, or a panic undoes it.
///
/// ```no_run
/// use kilo_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// // ... draw frames, read keys ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    size: Size,
    raw: Option<RawMode>,
    active: bool,
}

impl Terminal {
    /// A handle with the current size. Does not touch tty settings.
    ///
    /// # Errors
    ///
    /// Infallible today; kept fallible for platforms that need setup.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            size: current_size(),
            raw: None,
            active: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-read the size after a resize and cache it.
    pub fn refresh_size(&mut self) -> Size {
        self.size = current_size();
        self.size
    }

    /// Whether [`enter`](Self::enter) is in effect.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen.
    /// A second call does nothing.
    ///
    /// # Errors
    ///
    /// Changing tty settings or writing to stdout failed.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        write_enter(&mut io::stdout().lock())?;

        self.active = true;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). A call while inactive does nothing.
    ///
    /// # Errors
    ///
    /// Writing to stdout or restoring tty settings failed.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        write_leave(&mut io::stdout().lock())?;

        if let Some(raw) = self.raw.take() {
            raw.disable()?;
        }
        self.active = false;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Alternate screen, hidden cursor, cleared screen.
fn write_enter(out: &mut impl Write) -> io::Result<()> {
    out.write_all(ansi::ENTER_ALT_SCREEN)?;
    out.write_all(ansi::HIDE_CURSOR)?;
    out.write_all(ansi::CLEAR_SCREEN)?;
    out.flush()
}

/// Plain attributes, visible cursor, then back to the shell's screen.
fn write_leave(out: &mut impl Write) -> io::Result<()> {
    out.write_all(ansi::RESET)?;
    out.write_all(ansi::SHOW_CURSOR)?;
    out.write_all(ansi::EXIT_ALT_SCREEN)?;
    out.flush()
}
