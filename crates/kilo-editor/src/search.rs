//! Search — incremental, wrap-around substring search over rendered rows.
//!
//! A [`Search`] lives for one search-prompt session. It remembers where the
//! cursor and viewport were when the session began (so Escape can put them
//! back), which row matched last, and which way to go next.
//!
//! # Match highlighting
//!
//! The current match is shown by recoloring its span in the row's own
//! highlight tags. The row's previous tags are saved first and put back
//! before the next step or when the session ends. There is exactly one
//! save slot: at most one row carries the overlay at any time.
//!
//! # Search flow
//!
//! 1. The prompt opens → [`Search::begin`] records the origin
//! 2. Every keystroke → [`Search::find`] restores the overlay and scans,
//!    starting one row past the last match in the current direction
//! 3. Enter keeps the cursor where the last match put it
//! 4. Escape restores the overlay, then the caller puts back [`Search::origin`]

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::syntax::Highlight;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Cursor and scroll offsets recorded when a session begins.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Origin {
    pub cursor: Cursor,
    pub row_off: usize,
    pub col_off: usize,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Saved highlight tags of the row carrying the match overlay.
#[derive(Debug)]
struct Overlay {
    row: usize,
    saved: Vec<Highlight>,
}

/// State of one search session.
#[derive(Debug)]
pub struct Search {
    origin: Origin,
    last_match: Option<usize>,
    direction: Direction,
    overlay: Option<Overlay>,
}

/// A successful search step: the matched row and raw column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Match {
    pub row: usize,
    pub cx: usize,
}

impl Search {
    /// Open a session starting from `origin`.
    #[must_use]
    pub const fn begin(origin: Origin) -> Self {
        Self {
            origin,
            last_match: None,
            direction: Direction::Forward,
            overlay: None,
        }
    }

    /// Where the session started.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Search `Direction` for the next step, continuing from the last match.
    pub const fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Forget the last match: the next step starts over, forward, from the
    /// top of the buffer.
    pub const fn reset(&mut self) {
        self.last_match = None;
        self.direction = Direction::Forward;
    }

    /// Put back the highlight tags hidden by the match overlay, if any.
    pub fn restore(&mut self, buf: &mut Buffer) {
        let Some(Overlay { row, saved }) = self.overlay.take() else {
            return;
        };
        if let Some(hl) = buf.row_hl_mut(row) {
            if hl.len() == saved.len() {
                hl.copy_from_slice(&saved);
            }
        }
    }

    /// Run one search step for `query`.
    ///
    /// Scans every row at most once, wrapping at both ends. On a match the
    /// cursor moves to it and the matched span is overlaid with
    /// [`Highlight::Match`]. An empty query matches column 0 of the first
    /// row scanned. With no match the cursor and highlighting are left
    /// alone.
    pub fn find(&mut self, buf: &mut Buffer, query: &str) -> Option<Match> {
        self.restore(buf);

        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        let needle: Vec<char> = query.chars().collect();
        let n = buf.num_rows();
        if n == 0 {
            return None;
        }

        let mut current = self.last_match;
        for _ in 0..n {
            let at = match (current, self.direction) {
                (None, _) => 0,
                (Some(c), Direction::Forward) => {
                    if c + 1 >= n {
                        0
                    } else {
                        c + 1
                    }
                }
                (Some(c), Direction::Backward) => {
                    if c == 0 || c > n {
                        n - 1
                    } else {
                        c - 1
                    }
                }
            };
            current = Some(at);

            let Some(row) = buf.row(at) else { continue };
            let Some(rx) = find_in(row.render(), &needle) else {
                continue;
            };

            let cx = row.rx_to_cx(rx, buf.tab_stop());
            self.last_match = Some(at);
            buf.set_cursor(Cursor::new(cx, at));

            if let Some(hl) = buf.row_hl_mut(at) {
                self.overlay = Some(Overlay {
                    row: at,
                    saved: hl.to_vec(),
                });
                hl[rx..rx + needle.len()].fill(Highlight::Match);
            }

            tracing::debug!(query, row = at, cx, "search match");
            return Some(Match { row: at, cx });
        }

        tracing::debug!(query, "search: no match");
        None
    }
}

/// First index where `needle` occurs in `haystack`.
fn find_in(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines, 8)
    }

    fn begin(buf: &Buffer) -> Search {
        Search::begin(Origin {
            cursor: buf.cursor(),
            row_off: 0,
            col_off: 0,
        })
    }

    #[test]
    fn find_in_basics() {
        let hay: Vec<char> = "hello world".chars().collect();
        let needle: Vec<char> = "world".chars().collect();
        assert_eq!(find_in(&hay, &needle), Some(6));
        assert_eq!(find_in(&hay, &['z']), None);
        assert_eq!(find_in(&['a'], &['a', 'b']), None);
        assert_eq!(find_in(&hay, &[]), Some(0));
        assert_eq!(find_in(&[], &[]), Some(0));
    }

    #[test]
    fn first_step_starts_at_top() {
        let mut buf = buffer(&["foo", "bar", "foo"]);
        buf.set_cursor(Cursor::new(0, 2));
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, "foo"), Some(Match { row: 0, cx: 0 }));
        assert_eq!(buf.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn forward_steps_wrap() {
        let mut buf = buffer(&["xa", "b", "a"]);
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(0));
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(2));
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(0));
    }

    #[test]
    fn backward_steps_wrap() {
        let mut buf = buffer(&["a", "b", "a", "c"]);
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(0));
        s.set_direction(Direction::Backward);
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(2));
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(0));
    }

    #[test]
    fn direction_forced_forward_without_last_match() {
        let mut buf = buffer(&["a", "a"]);
        let mut s = begin(&buf);
        s.set_direction(Direction::Backward);
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(0));
        assert_eq!(s.direction(), Direction::Forward);
    }

    #[test]
    fn single_matching_row_matches_itself_again() {
        let mut buf = buffer(&["x", "needle", "y"]);
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, "needle").map(|m| m.row), Some(1));
        assert_eq!(s.find(&mut buf, "needle").map(|m| m.row), Some(1));
    }

    #[test]
    fn no_match_leaves_cursor() {
        let mut buf = buffer(&["abc"]);
        buf.set_cursor(Cursor::new(2, 0));
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, "zzz"), None);
        assert_eq!(buf.cursor(), Cursor::new(2, 0));
        assert_eq!(s.last_match(), None);
    }

    #[test]
    fn empty_query_matches_start_of_next_row() {
        let mut buf = buffer(&["abc", "xbz"]);
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, "b"), Some(Match { row: 0, cx: 1 }));
        assert_eq!(s.find(&mut buf, "b"), Some(Match { row: 1, cx: 1 }));

        s.reset();
        assert_eq!(s.find(&mut buf, ""), Some(Match { row: 0, cx: 0 }));
        assert_eq!(buf.cursor(), Cursor::new(0, 0));
        assert!(buf.rows().iter().all(|r| !r.hl().contains(&Highlight::Match)));
    }

    #[test]
    fn empty_query_in_empty_buffer() {
        let mut buf = buffer(&[]);
        let mut s = begin(&buf);
        assert_eq!(s.find(&mut buf, ""), None);
    }

    #[test]
    fn match_column_is_raw_column() {
        let mut buf = buffer(&["\tfoo"]);
        let mut s = begin(&buf);
        let m = s.find(&mut buf, "foo").unwrap();
        assert_eq!(m.cx, 1);
        assert_eq!(buf.render_col(), 8);
    }

    #[test]
    fn overlay_marks_span_and_restores() {
        let mut buf = buffer(&["int abc;"]);
        buf.set_filename("a.c");
        let before = buf.rows()[0].hl().to_vec();

        let mut s = begin(&buf);
        s.find(&mut buf, "abc").unwrap();
        assert_eq!(&buf.rows()[0].hl()[4..7], &[Highlight::Match; 3]);
        assert_eq!(buf.rows()[0].hl()[0], Highlight::Keyword2);

        s.restore(&mut buf);
        assert_eq!(buf.rows()[0].hl(), before.as_slice());
    }

    #[test]
    fn only_one_row_overlaid_at_a_time() {
        let mut buf = buffer(&["ab", "ab"]);
        let mut s = begin(&buf);
        s.find(&mut buf, "ab");
        s.find(&mut buf, "ab");
        assert_eq!(buf.rows()[0].hl(), &[Highlight::Normal; 2]);
        assert_eq!(buf.rows()[1].hl(), &[Highlight::Match; 2]);
    }

    #[test]
    fn reset_starts_over() {
        let mut buf = buffer(&["a", "a"]);
        let mut s = begin(&buf);
        s.find(&mut buf, "a");
        s.find(&mut buf, "a");
        assert_eq!(s.last_match(), Some(1));
        s.reset();
        assert_eq!(s.find(&mut buf, "a").map(|m| m.row), Some(0));
    }
}
