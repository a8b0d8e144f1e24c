use std::fmt;

/// A cell of the grid: zero-based column `x` and row `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Pos {
    /// The top-left cell, where execution starts.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new position.
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    #[inline]
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Pos::new(3, 7).to_string(), "(3, 7)");
        assert_eq!(Pos::from((0, 0)), Pos::ORIGIN);
    }

    #[test]
    fn ordering_compares_columns_first() {
        assert!(Pos::new(0, 1) > Pos::new(0, 0));
        assert!(Pos::new(1, 0) > Pos::new(0, 9));
    }
}
