use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four rotating auction positions. Partnerships sit opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seat {
    North,
    East,
    South,
    West,
}

impl Seat {
    pub const ALL: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub fn index(self) -> usize {
        match self {
            Seat::North => 0,
            Seat::East => 1,
            Seat::South => 2,
            Seat::West => 3,
        }
    }

    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    /// The seat to the left, who calls next.
    pub fn next(self) -> Self {
        self.offset(1)
    }

    /// The seat that calls `turns` calls after this one.
    pub fn offset(self, turns: usize) -> Self {
        Self::from_index(self.index() + turns % 4)
    }

    pub fn partner(self) -> Self {
        self.offset(2)
    }

    /// True for this seat and its partner.
    pub fn same_side(self, other: Seat) -> bool {
        other == self || other == self.partner()
    }

    pub fn to_char(self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Seat::North),
            'E' => Some(Seat::East),
            'S' => Some(Seat::South),
            'W' => Some(Seat::West),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        }
    }
}

impl FromStr for Seat {
    type Err = ParseError;

    /// Accepts `N`/`E`/`S`/`W` or the full seat name, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Seat::ALL
            .into_iter()
            .find(|seat| seat.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Seat::from_char(c),
                    _ => None,
                }
            })
            .ok_or_else(|| ParseError::InvalidSeat(trimmed.to_string()))
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_next_wraps() {
        assert_eq!(Seat::North.next(), Seat::East);
        assert_eq!(Seat::West.next(), Seat::North);
    }

    #[test]
    fn test_partner() {
        assert_eq!(Seat::North.partner(), Seat::South);
        assert_eq!(Seat::East.partner(), Seat::West);
        assert_eq!(Seat::West.partner(), Seat::East);
    }

    #[test]
    fn test_offset_from_dealer() {
        assert_eq!(Seat::South.offset(1), Seat::West);
        assert_eq!(Seat::South.offset(5), Seat::West);
        assert_eq!(Seat::East.offset(0), Seat::East);
    }

    #[test]
    fn test_same_side() {
        assert!(Seat::North.same_side(Seat::South));
        assert!(Seat::North.same_side(Seat::North));
        assert!(!Seat::North.same_side(Seat::East));
    }

    #[test]
    fn test_seat_parsing() {
        assert_eq!("n".parse::<Seat>(), Ok(Seat::North));
        assert_eq!("West".parse::<Seat>(), Ok(Seat::West));
        assert!("Q".parse::<Seat>().is_err());
        assert!("NE".parse::<Seat>().is_err());
    }
}
