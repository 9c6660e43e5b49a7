// cspell:ignore AKQJT AKQJ
use crate::card::Card;
use crate::rank::Rank;
use crate::suit::Suit;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Where the aces sit when a hand holds exactly two of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AceTopology {
    /// Not exactly two aces.
    None,
    /// Both majors or both minors.
    Rank,
    /// Both black or both red, and not a same-rank pair.
    Color,
    /// Neither same rank nor same color (e.g. spades and diamonds).
    Mixed,
}

impl AceTopology {
    pub fn label(self) -> &'static str {
        match self {
            AceTopology::None => "NONE",
            AceTopology::Rank => "RANK",
            AceTopology::Color => "COLOR",
            AceTopology::Mixed => "MIXED",
        }
    }
}

impl FromStr for AceTopology {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(AceTopology::None),
            "RANK" => Ok(AceTopology::Rank),
            "COLOR" | "COLOUR" => Ok(AceTopology::Color),
            "MIXED" => Ok(AceTopology::Mixed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AceTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    /// Parse a space-separated hand string such as `"SAK43 HQJ2 DK2 C432"`.
    pub fn parse(s: &str) -> Result<Self, crate::io::hand_parser::HandParseError> {
        crate::io::hand_parser::parse_hand(s)
    }

    /// Deal 13 cards from a freshly shuffled deck.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut deck: Vec<Card> = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
            .collect();
        deck.shuffle(rng);
        deck.truncate(13);
        Self::new(deck)
    }

    /// True when the hand holds exactly 13 distinct cards.
    pub fn is_complete(&self) -> bool {
        let distinct: HashSet<&Card> = self.cards.iter().collect();
        self.cards.len() == 13 && distinct.len() == 13
    }

    pub fn hcp(&self) -> u8 {
        self.cards.iter().map(|c| c.hcp()).sum()
    }

    pub fn length(&self, suit: Suit) -> u8 {
        self.cards.iter().filter(|c| c.suit == suit).count() as u8
    }

    /// Suit lengths indexed by `Suit::idx` (clubs first).
    pub fn distribution(&self) -> [u8; 4] {
        Suit::ALL.map(|suit| self.length(suit))
    }

    /// HCP plus shortness (void 3, singleton 2, doubleton 1), less one point
    /// for every suit shorter than three cards that holds a jack or better.
    pub fn total_points(&self) -> u8 {
        let mut shortness = 0;
        let mut short_honors = 0;
        for suit in Suit::ALL {
            let len = self.length(suit);
            shortness += match len {
                0 => 3,
                1 => 2,
                2 => 1,
                _ => 0,
            };
            if len < 3 && self.cards.iter().any(|c| c.suit == suit && c.is_honor()) {
                short_honors += 1;
            }
        }
        (self.hcp() + shortness).saturating_sub(short_honors)
    }

    /// Ace = 2, King = 1.
    pub fn controls(&self) -> u8 {
        self.cards
            .iter()
            .map(|c| match c.rank {
                Rank::Ace => 2,
                Rank::King => 1,
                _ => 0,
            })
            .sum()
    }

    pub fn ace_count(&self) -> u8 {
        self.aces().count() as u8
    }

    pub fn ace_topology(&self) -> AceTopology {
        let aces: Vec<Suit> = self.aces().collect();
        let (a, b) = match aces.as_slice() {
            [a, b] => (*a, *b),
            _ => return AceTopology::None,
        };
        if a.is_major() == b.is_major() {
            AceTopology::Rank
        } else if a.is_black() == b.is_black() {
            AceTopology::Color
        } else {
            AceTopology::Mixed
        }
    }

    /// Returns true if the hand is 4-3-3-3, 4-4-3-2 or 5-3-3-2.
    pub fn is_balanced(&self) -> bool {
        let mut lengths = self.distribution();
        lengths.sort_unstable();
        matches!(lengths, [3, 3, 3, 4] | [2, 3, 4, 4] | [2, 3, 3, 5])
    }

    /// Sort spades first, high cards first within a suit.
    pub fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| b.suit.cmp(&a.suit).then_with(|| b.rank.cmp(&a.rank)));
    }

    fn aces(&self) -> impl Iterator<Item = Suit> + '_ {
        self.cards
            .iter()
            .filter(|c| c.rank == Rank::Ace)
            .map(|c| c.suit)
    }
}

impl fmt::Display for Hand {
    /// Renders as `S:AK43 H:QJ2 D:K2 C:432`, with `-` for a void.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted = self.clone();
        sorted.sort();
        for (i, suit) in Suit::ALL.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:", suit)?;
            let ranks: String = sorted
                .cards
                .iter()
                .filter(|c| c.suit == *suit)
                .map(|c| c.rank.to_char())
                .collect();
            if ranks.is_empty() {
                f.write_str("-")?;
            } else {
                f.write_str(&ranks)?;
            }
        }
        Ok(())
    }
}
