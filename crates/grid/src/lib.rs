//! The program grid.
//!
//! A program is a rectangle of characters whose edges wrap around: stepping off the right edge
//! lands on the left edge of the same row, and stepping off the bottom lands on the top of the
//! same column.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

use std::fmt;
use toroid_config::GridSize;
use toroid_interface::Pos;

mod direction;
pub use direction::Direction;

/// An immutable, wrap-around grid of characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    /// Row-major cells, `height * width` long.
    cells: Box<[char]>,
    size: GridSize,
}

impl Grid {
    /// The character every cell not covered by the source holds.
    pub const BLANK: char = ' ';

    /// Reflows `source` into a grid of the given size.
    ///
    /// Rows are split on `\n`, `\r\n` and a lone `\r`. Short rows and missing rows are padded with
    /// [`BLANK`](Self::BLANK); characters past the width and rows past the height are ignored.
    pub fn new(source: &str, size: GridSize) -> Self {
        let (height, width) = (size.height.get(), size.width.get());
        let mut cells = vec![Self::BLANK; size.cells()].into_boxed_slice();
        let mut truncated = false;
        for (y, line) in toroid_interface::source::rows(source).enumerate() {
            if y >= height {
                truncated = true;
                break;
            }
            let row = &mut cells[y * width..(y + 1) * width];
            let mut chars = line.chars();
            for (cell, c) in row.iter_mut().zip(chars.by_ref()) {
                *cell = c;
            }
            truncated |= chars.next().is_some();
        }
        if truncated {
            debug!(height, width, "source does not fit the grid, extra characters are ignored");
        }
        Self { cells, size }
    }

    /// Reflows `source` into a grid of the default size.
    pub fn with_default_size(source: &str) -> Self {
        Self::new(source, GridSize::default())
    }

    /// Returns the dimensions of the grid.
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width.get()
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height.get()
    }

    /// Returns the character at `pos`, wrapped around the edges.
    #[inline]
    pub fn lookup(&self, pos: Pos) -> char {
        let pos = self.wrap(pos);
        self.cells[pos.y * self.width() + pos.x]
    }

    /// Moves one cell from `pos` in `direction`, returning the new position and its character.
    pub fn step(&self, pos: Pos, direction: Direction) -> (Pos, char) {
        let (w, h) = (self.width(), self.height());
        let pos = self.wrap(pos);
        let next = match direction {
            Direction::Up => Pos::new(pos.x, (pos.y + h - 1) % h),
            Direction::Down => Pos::new(pos.x, (pos.y + 1) % h),
            Direction::Left => Pos::new((pos.x + w - 1) % w, pos.y),
            Direction::Right => Pos::new((pos.x + 1) % w, pos.y),
        };
        (next, self.lookup(next))
    }

    /// Returns the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[char]> + '_ {
        self.cells.chunks_exact(self.width())
    }

    #[inline]
    fn wrap(&self, pos: Pos) -> Pos {
        Pos::new(pos.x % self.width(), pos.y % self.height())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("height", &self.height())
            .field("width", &self.width())
            .finish_non_exhaustive()
    }
}

/// Renders the padded grid, one row per line.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row {
                fmt::Write::write_char(f, *c)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn size(height: usize, width: usize) -> GridSize {
        GridSize::new(NonZeroUsize::new(height).unwrap(), NonZeroUsize::new(width).unwrap())
    }

    #[test]
    fn padding_and_truncation() {
        let grid = Grid::new("ab\r\ncdefg\nh\ni", size(3, 4));
        assert_eq!(grid.to_string(), "ab  \ncdef\nh   \n");
        assert_eq!(grid.lookup(Pos::new(3, 1)), 'f');
        assert_eq!(grid.lookup(Pos::new(2, 0)), Grid::BLANK);
    }

    #[test]
    fn carriage_returns_end_rows() {
        let grid = Grid::new("ab\rcd\r\ne", size(3, 2));
        assert_eq!(grid.to_string(), "ab\ncd\ne \n");
        assert_eq!(grid.lookup(Pos::new(0, 1)), 'c');
    }

    #[test]
    fn missing_rows_are_blank() {
        let grid = Grid::new("", size(2, 2));
        assert!(grid.rows().all(|row| row == [' ', ' ']));
        assert_eq!(grid.rows().len(), 2);
    }

    #[test]
    fn unicode_cells() {
        let grid = Grid::new("é→@", size(1, 3));
        assert_eq!(grid.lookup(Pos::new(1, 0)), '→');
        assert_eq!(grid.step(Pos::new(1, 0), Direction::Right), (Pos::new(2, 0), '@'));
    }

    #[test]
    fn lookup_wraps() {
        let grid = Grid::new("ab\ncd", size(2, 2));
        assert_eq!(grid.lookup(Pos::new(2, 0)), 'a');
        assert_eq!(grid.lookup(Pos::new(3, 3)), 'd');
    }

    #[test]
    fn corners() {
        use Direction::*;

        let grid = Grid::with_default_size("");
        let (right, bottom) = (79, 24);
        #[rustfmt::skip]
        let cases = [
            // top left
            ((0, 0), Up, (0, bottom)),
            ((0, 0), Left, (right, 0)),
            ((0, 0), Right, (1, 0)),
            ((0, 0), Down, (0, 1)),
            // top right
            ((right, 0), Up, (right, bottom)),
            ((right, 0), Left, (right - 1, 0)),
            ((right, 0), Right, (0, 0)),
            ((right, 0), Down, (right, 1)),
            // bottom left
            ((0, bottom), Up, (0, bottom - 1)),
            ((0, bottom), Left, (right, bottom)),
            ((0, bottom), Right, (1, bottom)),
            ((0, bottom), Down, (0, 0)),
            // bottom right
            ((right, bottom), Up, (right, bottom - 1)),
            ((right, bottom), Left, (right - 1, bottom)),
            ((right, bottom), Right, (0, bottom)),
            ((right, bottom), Down, (right, 0)),
        ];
        for (from, direction, to) in cases {
            let (pos, _) = grid.step(Pos::from(from), direction);
            assert_eq!(pos, Pos::from(to), "going {direction} from {from:?}");
        }
    }

    #[test]
    fn step_returns_character() {
        let grid = Grid::new(">v\n^<", size(2, 2));
        assert_eq!(grid.step(Pos::ORIGIN, Direction::Right), (Pos::new(1, 0), 'v'));
        assert_eq!(grid.step(Pos::new(1, 0), Direction::Down), (Pos::new(1, 1), '<'));
        assert_eq!(grid.step(Pos::new(1, 1), Direction::Left), (Pos::new(0, 1), '^'));
        assert_eq!(grid.step(Pos::new(0, 1), Direction::Up), (Pos::ORIGIN, '>'));
    }
}
