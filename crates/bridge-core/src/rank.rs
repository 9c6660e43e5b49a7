use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

const RANK_CHARS: [(Rank, char); 13] = [
    (Rank::Two, '2'),
    (Rank::Three, '3'),
    (Rank::Four, '4'),
    (Rank::Five, '5'),
    (Rank::Six, '6'),
    (Rank::Seven, '7'),
    (Rank::Eight, '8'),
    (Rank::Nine, '9'),
    (Rank::Ten, 'T'),
    (Rank::Jack, 'J'),
    (Rank::Queen, 'Q'),
    (Rank::King, 'K'),
    (Rank::Ace, 'A'),
];

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    pub fn to_char(self) -> char {
        RANK_CHARS[self as usize - 2].1
    }

    /// Accepts `T` or `0` for the ten.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if c == '0' {
            return Some(Rank::Ten);
        }
        RANK_CHARS
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(rank, _)| *rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
