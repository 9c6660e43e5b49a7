use crate::card::Card;
use crate::hand::Hand;
use crate::rank::Rank;
use crate::suit::Suit;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandParseError {
    #[error("unknown card format `{0}`")]
    UnknownFormat(String),

    #[error("unknown rank `{rank}` in `{token}`")]
    UnknownRank { token: String, rank: char },

    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}

/// Parses a space-separated hand string.
///
/// Each token is either a suit holding (`SAK43`, `S-` for a void) or a
/// single card written rank first (`AS`, `TD`, `10D`). Tokens may be mixed:
/// `"SAKJ2 HAKJ2 DAQJ2 2C"`.
pub fn parse_hand(s: &str) -> Result<Hand, HandParseError> {
    let mut cards = Vec::new();
    let mut seen = HashSet::new();

    for token in s.split_whitespace() {
        for card in parse_token(token)? {
            if !seen.insert(card) {
                return Err(HandParseError::DuplicateCard(card));
            }
            cards.push(card);
        }
    }

    Ok(Hand::new(cards))
}

fn parse_token(token: &str) -> Result<Vec<Card>, HandParseError> {
    let upper = token.to_ascii_uppercase();
    let mut chars = upper.chars();
    let first = chars
        .next()
        .ok_or_else(|| HandParseError::UnknownFormat(token.to_string()))?;
    let rest = chars.as_str();

    if let Some(suit) = Suit::from_char(first) {
        if rest == "-" {
            return Ok(Vec::new());
        }
        if !rest.is_empty() {
            return rest
                .chars()
                .map(|c| {
                    Rank::from_char(c)
                        .map(|rank| Card::new(suit, rank))
                        .ok_or_else(|| HandParseError::UnknownRank {
                            token: token.to_string(),
                            rank: c,
                        })
                })
                .collect();
        }
    }

    parse_single_card(token, &upper).map(|card| vec![card])
}

/// `<Rank><Suit>`, with `10` accepted for the ten.
fn parse_single_card(token: &str, upper: &str) -> Result<Card, HandParseError> {
    let unknown = || HandParseError::UnknownFormat(token.to_string());
    let suit_char = upper.chars().last().ok_or_else(unknown)?;
    let suit = Suit::from_char(suit_char).ok_or_else(unknown)?;
    let rank_str = &upper[..upper.len() - suit_char.len_utf8()];
    let rank = match rank_str {
        "10" => Rank::Ten,
        _ => {
            let mut rank_chars = rank_str.chars();
            match (rank_chars.next(), rank_chars.next()) {
                (Some(c), None) => Rank::from_char(c).ok_or(HandParseError::UnknownRank {
                    token: token.to_string(),
                    rank: c,
                })?,
                _ => return Err(unknown()),
            }
        }
    };
    Ok(Card::new(suit, rank))
}
