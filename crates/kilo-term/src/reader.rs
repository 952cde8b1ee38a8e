// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin reader — collects raw bytes from the terminal.
//
// The editor is single-threaded: the event loop asks the reader for input
// with a deadline, and the reader waits on stdin's file descriptor with
// `poll()`. A timeout returns control to the loop so it can resolve a
// pending lone ESC, expire the status message, and notice a resize.
//
// An interrupted poll (EINTR, e.g. from SIGWINCH) is reported as a
// timeout rather than an error, which gives the caller the same chance
// to re-query the terminal size.

use std::io;
use std::time::Duration;

/// Byte chunk read from stdin.
///
/// Sized for typical terminal input: a single keypress is 1-6 bytes,
/// a paste can be kilobytes. 4 KB handles both without waste.
const READ_BUF_SIZE: usize = 4096;

/// Outcome of one [`StdinReader::read`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read<'a> {
    /// Raw bytes arrived.
    Bytes(&'a [u8]),
    /// Nothing arrived before the deadline.
    Timeout,
    /// Stdin was closed.
    Eof,
}

/// Blocking-with-deadline stdin reader.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use kilo_term::reader::{Read, StdinReader};
///
/// let mut reader = StdinReader::new();
/// if let Read::Bytes(bytes) = reader.read(Duration::from_millis(50))? {
///     println!("got {} bytes", bytes.len());
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StdinReader {
    buf: Box<[u8; READ_BUF_SIZE]>,
}

impl StdinReader {
    /// Create a reader over the process's stdin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Box::new([0u8; READ_BUF_SIZE]),
        }
    }

    /// Wait up to `timeout` for input and return whatever is available.
    ///
    /// # Errors
    ///
    /// Returns an error if `poll()` or `read()` fails for any reason other
    /// than a signal interruption.
    #[cfg(unix)]
    pub fn read(&mut self, timeout: Duration) -> io::Result<Read<'_>> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, millis)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(Read::Timeout)
            } else {
                Err(err)
            };
        }
        if ready == 0 {
            return Ok(Read::Timeout);
        }

        let n = unsafe { libc::read(fd, self.buf.as_mut_ptr().cast(), self.buf.len()) };

        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(Read::Timeout),
                _ => Err(err),
            };
        }
        if n == 0 {
            return Ok(Read::Eof);
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
        Ok(Read::Bytes(&self.buf[..n as usize]))
    }

    /// Non-unix fallback: a plain blocking read that ignores the deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin fails.
    #[cfg(not(unix))]
    pub fn read(&mut self, _timeout: Duration) -> io::Result<Read<'_>> {
        use std::io::Read as _;

        match io::stdin().lock().read(&mut self.buf[..])? {
            0 => Ok(Read::Eof),
            n => Ok(Read::Bytes(&self.buf[..n])),
        }
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_buf_size_reasonable() {
        assert!(READ_BUF_SIZE >= 1024);
        assert!(READ_BUF_SIZE <= 65536);
    }

    #[test]
    fn new_reader_has_full_buffer() {
        let reader = StdinReader::new();
        assert_eq!(reader.buf.len(), READ_BUF_SIZE);
    }

    #[test]
    fn read_outcomes_compare_by_content() {
        assert_eq!(Read::Bytes(b"ab"), Read::Bytes(b"ab"));
        assert_ne!(Read::Timeout, Read::Eof);
    }
}
