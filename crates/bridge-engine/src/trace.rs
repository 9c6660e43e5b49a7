use crate::constraints::HandConstraints;
use bridge_core::{Call, Hand};
use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct RuleTrace {
    pub description: String,
    pub call: Call,
    pub priority: i32,
    pub constraints: HandConstraints,
    pub trigger_matched: bool,
    pub constraints_matched: bool,
}

impl RuleTrace {
    pub fn satisfied(&self) -> bool {
        self.trigger_matched && self.constraints_matched
    }
}

/// Every rule the engine looked at, in priority order, up to and including
/// the one it chose.
#[derive(Debug, Serialize, Clone)]
pub struct BidTrace {
    pub system: String,
    pub hand: Hand,
    pub history: Vec<Call>,
    pub rules_considered: Vec<RuleTrace>,
    pub selected_call: Option<Call>,
}
