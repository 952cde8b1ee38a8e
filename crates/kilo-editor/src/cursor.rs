//! Cursor — a position in raw-character coordinates plus movement rules.
//!
//! `cy` may equal the row count: that is the virtual empty line after the
//! last row, where typing appends a new row. `cx` is always clamped to the
//! current row's length after a vertical move.

use crate::row::Row;

/// A single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
    /// Start of the row.
    Home,
    /// End of the row.
    End,
}

/// Cursor position: `cx` indexes the row's chars, `cy` indexes rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
}

impl Cursor {
    /// A cursor at (`cx`, `cy`).
    #[must_use]
    pub const fn new(cx: usize, cy: usize) -> Self {
        Self { cx, cy }
    }

    /// Apply one movement over `rows`.
    ///
    /// Left at column 0 wraps to the end of the previous row, Right at the
    /// end wraps to the start of the next. Up stops at row 0, Down at the
    /// virtual line past the end.
    pub fn step(&mut self, m: Move, rows: &[Row]) {
        let row_len = |cy: usize| rows.get(cy).map_or(0, Row::len);

        match m {
            Move::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = row_len(self.cy);
                }
            }
            Move::Right => {
                if let Some(row) = rows.get(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Move::Up => self.cy = self.cy.saturating_sub(1),
            Move::Down => {
                if self.cy < rows.len() {
                    self.cy += 1;
                }
            }
            Move::Home => self.cx = 0,
            Move::End => self.cx = row_len(self.cy),
        }

        self.cx = self.cx.min(row_len(self.cy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<Row> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| Row::new(i, l))
            .collect()
    }

    #[test]
    fn left_wraps_to_previous_end() {
        let rs = rows(&["abc", "de"]);
        let mut c = Cursor::new(0, 1);
        c.step(Move::Left, &rs);
        assert_eq!(c, Cursor::new(3, 0));
    }

    #[test]
    fn left_at_origin_stays() {
        let rs = rows(&["abc"]);
        let mut c = Cursor::new(0, 0);
        c.step(Move::Left, &rs);
        assert_eq!(c, Cursor::new(0, 0));
    }

    #[test]
    fn right_wraps_to_next_start() {
        let rs = rows(&["ab", "cd"]);
        let mut c = Cursor::new(2, 0);
        c.step(Move::Right, &rs);
        assert_eq!(c, Cursor::new(0, 1));
    }

    #[test]
    fn right_on_virtual_line_is_noop() {
        let rs = rows(&["ab"]);
        let mut c = Cursor::new(0, 1);
        c.step(Move::Right, &rs);
        assert_eq!(c, Cursor::new(0, 1));
    }

    #[test]
    fn down_reaches_virtual_line_then_stops() {
        let rs = rows(&["a"]);
        let mut c = Cursor::new(1, 0);
        c.step(Move::Down, &rs);
        assert_eq!(c, Cursor::new(0, 1));
        c.step(Move::Down, &rs);
        assert_eq!(c, Cursor::new(0, 1));
    }

    #[test]
    fn vertical_move_snaps_column() {
        let rs = rows(&["long line", "ab"]);
        let mut c = Cursor::new(7, 0);
        c.step(Move::Down, &rs);
        assert_eq!(c, Cursor::new(2, 1));
        c.step(Move::Up, &rs);
        assert_eq!(c, Cursor::new(2, 0));
    }

    #[test]
    fn home_and_end() {
        let rs = rows(&["hello"]);
        let mut c = Cursor::new(2, 0);
        c.step(Move::End, &rs);
        assert_eq!(c.cx, 5);
        c.step(Move::Home, &rs);
        assert_eq!(c.cx, 0);
    }
}
