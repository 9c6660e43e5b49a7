use crate::error::ParseError;
use crate::strain::Strain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Call {
    Pass,
    Double,
    Redouble,
    Bid { level: u8, strain: Strain },
}

impl Call {
    pub fn bid(level: u8, strain: Strain) -> Self {
        Call::Bid { level, strain }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, Call::Pass)
    }

    pub fn is_bid(self) -> bool {
        matches!(self, Call::Bid { .. })
    }

    /// Returns the level of this call, if it's a bid.
    pub fn level(self) -> Option<u8> {
        match self {
            Call::Bid { level, .. } => Some(level),
            _ => None,
        }
    }

    /// Returns the strain of this call, if it's a bid.
    pub fn strain(self) -> Option<Strain> {
        match self {
            Call::Bid { strain, .. } => Some(strain),
            _ => None,
        }
    }

    /// Renders the call in convention text syntax (`PASS`, `X`, `XX`, `1NT`).
    pub fn render(self) -> String {
        match self {
            Call::Pass => "PASS".to_string(),
            Call::Double => "X".to_string(),
            Call::Redouble => "XX".to_string(),
            Call::Bid { level, strain } => format!("{}{}", level, strain),
        }
    }
}

impl FromStr for Call {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        match token.as_str() {
            "P" | "PASS" => return Ok(Call::Pass),
            "X" | "DBL" | "DOUBLE" => return Ok(Call::Double),
            "XX" | "RDBL" | "REDOUBLE" => return Ok(Call::Redouble),
            _ => {}
        }

        let mut chars = token.chars();
        let level = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
            .filter(|l| (1..=7).contains(l));
        let strain = Strain::from_token(chars.as_str());
        match (level, strain) {
            (Some(level), Some(strain)) => Ok(Call::Bid { level, strain }),
            _ => Err(ParseError::InvalidCall(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Parse a call list such as `"1C P 1S P"` or `"1C,P,1S"` into an auction history.
pub fn parse_calls(calls: &str) -> Result<Vec<Call>, ParseError> {
    calls
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
