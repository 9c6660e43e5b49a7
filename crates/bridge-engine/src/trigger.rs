//! Auction triggers: when a rule's call is on the menu.
//!
//! A trigger only sees the calls made so far, oldest first. It has no idea
//! which seat is about to call; that is the engine's business.

use bridge_core::Call;
use std::fmt;

/// How a sequence step relates to the calls made after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    /// Any number of passes may follow the step's call.
    Standard,
    /// The step's call must be followed directly by the next step (or be the
    /// last call of the auction). Written `(CALL)` in convention text.
    Direct,
}

/// One call of a sequence trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub call: Call,
    pub adjacency: Adjacency,
}

impl Step {
    pub fn standard(call: Call) -> Self {
        Self {
            call,
            adjacency: Adjacency::Standard,
        }
    }

    pub fn direct(call: Call) -> Self {
        Self {
            call,
            adjacency: Adjacency::Direct,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.adjacency {
            Adjacency::Standard => write!(f, "{}", self.call),
            Adjacency::Direct => write!(f, "({})", self.call),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Nobody has opened yet and the auction has not been passed out.
    Opening,
    /// The auction's non-pass calls are exactly these steps.
    Sequence(Vec<Step>),
}

impl Trigger {
    pub fn matches(&self, history: &[Call]) -> bool {
        match self {
            Trigger::Opening => opening_matches(history),
            Trigger::Sequence(steps) => sequence_matches(steps, history),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Opening => f.write_str("OPEN"),
            Trigger::Sequence(steps) => {
                let parts: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
                f.write_str(&parts.join(" - "))
            }
        }
    }
}

fn opening_matches(history: &[Call]) -> bool {
    history.len() < 4 && history.iter().all(|c| c.is_pass())
}

/// Walks the steps and the history backwards from their most recent ends.
///
/// A standard step first skips trailing passes; a direct step does not. A
/// standard step whose call is itself a pass is satisfied by the skipped
/// passes. Whatever history is left once every step has matched may only
/// contain passes.
fn sequence_matches(steps: &[Step], history: &[Call]) -> bool {
    let mut rest = history;
    for step in steps.iter().rev() {
        if step.adjacency == Adjacency::Standard {
            rest = trim_trailing_passes(rest);
            if step.call.is_pass() {
                continue;
            }
        }
        match rest.split_last() {
            Some((last, older)) if *last == step.call => rest = older,
            _ => return false,
        }
    }
    rest.iter().all(|c| c.is_pass())
}

fn trim_trailing_passes(calls: &[Call]) -> &[Call] {
    let keep = calls
        .iter()
        .rposition(|c| !c.is_pass())
        .map_or(0, |i| i + 1);
    &calls[..keep]
}
