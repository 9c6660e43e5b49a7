use bridge_core::{Call, Hand, Suit};
use bridge_engine::{BiddingSystem, BidTrace, Rule};
use serde::Serialize;
use std::fmt::Write;

pub fn get_hand_suits(hand: &Hand) -> Vec<String> {
    let mut hand = hand.clone();
    hand.sort();

    let mut suits = Vec::new();
    for suit in [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs] {
        let cards: String = hand
            .cards
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.rank.to_char())
            .collect();
        suits.push(format!(
            "{}: {}",
            suit.to_char(),
            if cards.is_empty() { "-" } else { &cards }
        ));
    }
    suits
}

/// The hand by suit followed by every feature the conventions can test.
pub fn format_hand_features(hand: &Hand) -> String {
    let mut out = String::new();
    for line in get_hand_suits(hand) {
        writeln!(out, "  {}", line).unwrap();
    }
    writeln!(
        out,
        "HCP: {}  TP: {}  Controls: {}  Aces: {} ({})  {}",
        hand.hcp(),
        hand.total_points(),
        hand.controls(),
        hand.ace_count(),
        hand.ace_topology(),
        if hand.is_balanced() {
            "balanced"
        } else {
            "unbalanced"
        }
    )
    .unwrap();
    out
}

/// One row per rule, highest priority first.
pub fn format_rules_table(system: &BiddingSystem) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{:>4}  {:<24} {:<5} {}",
        "Prio", "Trigger", "Call", "Constraints"
    )
    .unwrap();
    for rule in system.rules() {
        writeln!(out, "{}", format_rule_row(rule)).unwrap();
    }
    out
}

pub fn format_rule_row(rule: &Rule) -> String {
    format!(
        "{:>4}  {:<24} {:<5} {}",
        rule.priority,
        rule.trigger.to_string(),
        rule.call.to_string(),
        rule.constraints
    )
}

pub fn format_full_trace(trace: &BidTrace) -> String {
    let mut out = String::new();
    writeln!(out, "--- Trace ({}) ---", trace.system).unwrap();
    for step in &trace.rules_considered {
        let status = if step.satisfied() {
            "SELECTED"
        } else if step.trigger_matched {
            "hand does not match"
        } else {
            "auction does not match"
        };
        writeln!(
            out,
            "{:>4}  {:<28} {:<5} {}",
            step.priority,
            step.description,
            step.call.to_string(),
            status
        )
        .unwrap();
    }
    if trace.selected_call.is_none() {
        writeln!(out, "No rule matched").unwrap();
    }
    out
}

/// Machine-readable answer of the `bid` command.
#[derive(Debug, Serialize)]
pub struct BidReport {
    pub call: Call,
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<BidTrace>,
}

impl BidReport {
    pub fn new(rule: Option<&Rule>, trace: Option<BidTrace>) -> Self {
        Self {
            call: rule.map_or(Call::Pass, |r| r.call),
            rule: rule.map(|r| r.description.clone()),
            trace,
        }
    }

    /// `1NT  (OPEN 1NT)` or `PASS (no rule)`.
    pub fn summary(&self) -> String {
        match &self.rule {
            Some(rule) => format!("{}  ({})", self.call, rule),
            None => format!("{} (no rule)", self.call),
        }
    }
}
