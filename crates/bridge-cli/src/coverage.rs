//! How a convention opens random hands, and which strong hands it passes.

use bridge_core::{Call, Hand};
use bridge_engine::Engine;
use rand::Rng;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Write;

/// A passed hand with at least this many HCP counts as a missed opening.
pub const OPENING_STRENGTH: u8 = 11;

/// Missed hands listed in full by the report.
const MISSED_EXAMPLES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct OpeningCoverage {
    pub system: String,
    pub hands: usize,
    /// Opening calls with their counts, most frequent first.
    pub openings: Vec<(Call, usize)>,
    pub missed: Vec<Hand>,
}

impl OpeningCoverage {
    /// Ask `engine` for an opening call on every hand.
    pub fn survey(engine: &Engine, hands: impl IntoIterator<Item = Hand>) -> Self {
        let mut openings: Vec<(Call, usize)> = Vec::new();
        let mut missed = Vec::new();
        let mut total = 0;

        for hand in hands {
            total += 1;
            let call = engine.get_bid(&[], &hand);
            match openings.iter_mut().find(|(c, _)| *c == call) {
                Some((_, count)) => *count += 1,
                None => openings.push((call, 1)),
            }
            if !call.is_bid() && hand.hcp() >= OPENING_STRENGTH {
                missed.push(hand);
            }
        }

        // Ties list the lower call first.
        openings.sort_by_key(|&(call, count)| (Reverse(count), call.level(), call.strain()));

        Self {
            system: engine.system().name().to_string(),
            hands: total,
            openings,
            missed,
        }
    }

    /// Survey `count` freshly dealt hands.
    pub fn random(engine: &Engine, count: usize, rng: &mut impl Rng) -> Self {
        Self::survey(engine, (0..count).map(|_| Hand::random(&mut *rng)))
    }

    pub fn opened(&self) -> usize {
        self.openings
            .iter()
            .filter(|(call, _)| call.is_bid())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn passed(&self) -> usize {
        self.hands - self.opened()
    }

    /// Missed openings grouped by HCP.
    pub fn missed_by_hcp(&self) -> BTreeMap<u8, usize> {
        let mut by_hcp = BTreeMap::new();
        for hand in &self.missed {
            *by_hcp.entry(hand.hcp()).or_insert(0) += 1;
        }
        by_hcp
    }

    fn percent(&self, count: usize) -> f64 {
        if self.hands == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.hands as f64
        }
    }

    pub fn report(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "=== Opening distribution: {} over {} hands ===",
            self.system, self.hands
        )
        .unwrap();
        for (call, count) in &self.openings {
            writeln!(
                out,
                "{:<5} {:>6} ({:.1}%)",
                call.to_string(),
                count,
                self.percent(*count)
            )
            .unwrap();
        }
        writeln!(out).unwrap();
        writeln!(out, "Opened: {} ({:.1}%)", self.opened(), self.percent(self.opened())).unwrap();
        writeln!(out, "Passed: {} ({:.1}%)", self.passed(), self.percent(self.passed())).unwrap();
        writeln!(out).unwrap();

        writeln!(out, "=== Passed with {}+ HCP ===", OPENING_STRENGTH).unwrap();
        if self.missed.is_empty() {
            writeln!(out, "None.").unwrap();
            return out;
        }
        writeln!(out, "{} hands", self.missed.len()).unwrap();
        for (i, hand) in self.missed.iter().take(MISSED_EXAMPLES).enumerate() {
            writeln!(out, "{}. {} (HCP: {})", i + 1, hand, hand.hcp()).unwrap();
        }
        for (hcp, count) in self.missed_by_hcp() {
            writeln!(out, "HCP {}: {} hands", hcp, count).unwrap();
        }
        out
    }
}
