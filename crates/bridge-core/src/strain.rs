use serde::{Deserialize, Serialize};
use std::fmt;

/// The denomination of a bid: one of the four suits or no-trump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strain {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

impl Strain {
    /// Parses the strain part of a call token: `C`, `D`, `H`, `S`, `NT` (or `N`).
    pub fn from_token(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "C" => Some(Strain::Clubs),
            "D" => Some(Strain::Diamonds),
            "H" => Some(Strain::Hearts),
            "S" => Some(Strain::Spades),
            "NT" | "N" => Some(Strain::NoTrump),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strain::Clubs => "C",
            Strain::Diamonds => "D",
            Strain::Hearts => "H",
            Strain::Spades => "S",
            Strain::NoTrump => "NT",
        }
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strain_tokens() {
        assert_eq!(Strain::from_token("s"), Some(Strain::Spades));
        assert_eq!(Strain::from_token("NT"), Some(Strain::NoTrump));
        assert_eq!(Strain::from_token("N"), Some(Strain::NoTrump));
        assert_eq!(Strain::from_token("X"), None);
    }

    #[test]
    fn test_strain_display() {
        assert_eq!(Strain::NoTrump.to_string(), "NT");
        assert_eq!(Strain::Clubs.to_string(), "C");
    }
}
