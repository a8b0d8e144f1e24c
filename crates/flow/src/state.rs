use std::fmt;
use toroid_grid::Direction;
use toroid_interface::Pos;

/// The unit of cycle detection: where the instruction pointer is, where it is heading, and
/// whether it is reading a string literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    /// `None` once the pointer is about to terminate and its direction no longer matters.
    pub direction: Option<Direction>,
    pub pos: Pos,
    pub string_mode: bool,
}

impl State {
    /// The entry state: top-left cell, heading right, outside of string mode.
    pub const ENTRY: Self =
        Self { direction: Some(Direction::Right), pos: Pos::ORIGIN, string_mode: false };

    /// Creates a new state.
    #[inline]
    pub const fn new(direction: Option<Direction>, pos: Pos, string_mode: bool) -> Self {
        Self { direction, pos, string_mode }
    }
}

/// Formats the state as an identifier, e.g. `right_3_0`, `str_up_1_2` or `any_4_4`.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.string_mode {
            f.write_str("str_")?;
        }
        let direction = self.direction.map_or("any", Direction::to_str);
        write!(f, "{direction}_{}_{}", self.pos.x, self.pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(State::ENTRY.to_string(), "right_0_0");
        let s = State::new(Some(Direction::Up), Pos::new(1, 2), true);
        assert_eq!(s.to_string(), "str_up_1_2");
        assert_eq!(State::new(None, Pos::new(4, 4), false).to_string(), "any_4_4");
    }

    #[test]
    fn identity_includes_every_field() {
        let a = State::ENTRY;
        assert_ne!(a, State { string_mode: true, ..a });
        assert_ne!(a, State { direction: None, ..a });
        assert_ne!(a, State { pos: Pos::new(1, 0), ..a });
        assert_eq!(a, State::new(Some(Direction::Right), Pos::new(0, 0), false));
    }
}
