//! Hand constraints: a conjunctive predicate over hand features.
//!
//! The same type describes what a rule requires of a hand and what the
//! auction has revealed about a seat, so it comes with a meet operator
//! (`intersect`) for accumulating knowledge.

use bridge_core::{AceTopology, Hand, Suit};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub const MAX_HCP: u8 = 37;
pub const MAX_TOTAL_POINTS: u8 = 50;
pub const MAX_CONTROLS: u8 = 12;
pub const MAX_LENGTH: u8 = 13;

/// A closed, inclusive range. `min > max` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub min: u8,
    pub max: u8,
}

impl Range {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: u8) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn intersect(self, other: Range) -> Range {
        Range::new(self.min.max(other.min), self.max.min(other.max))
    }

    pub fn is_empty(self) -> bool {
        self.min > self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Constraints that a hand must satisfy.
///
/// Every field defaults to "unconstrained". Values are never mutated once a
/// rule is compiled; `intersect` always produces a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandConstraints {
    pub hcp: Range,
    pub total_points: Range,
    pub controls: Range,
    /// Length range per suit, indexed by `Suit::idx`.
    pub lengths: [Range; 4],
    /// Permitted ace counts; `None` means any.
    pub aces: Option<BTreeSet<u8>>,
    /// Permitted ace topologies; `None` means any.
    pub ace_topology: Option<BTreeSet<AceTopology>>,
    /// `Some(true)` requires balanced, `Some(false)` requires unbalanced.
    pub balanced: Option<bool>,
}

impl Default for HandConstraints {
    fn default() -> Self {
        Self {
            hcp: Range::new(0, MAX_HCP),
            total_points: Range::new(0, MAX_TOTAL_POINTS),
            controls: Range::new(0, MAX_CONTROLS),
            lengths: [Range::new(0, MAX_LENGTH); 4],
            aces: None,
            ace_topology: None,
            balanced: None,
        }
    }
}

impl HandConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hcp(mut self, min: u8, max: u8) -> Self {
        self.hcp = Range::new(min, max);
        self
    }

    pub fn with_total_points(mut self, min: u8, max: u8) -> Self {
        self.total_points = Range::new(min, max);
        self
    }

    pub fn with_controls(mut self, min: u8, max: u8) -> Self {
        self.controls = Range::new(min, max);
        self
    }

    pub fn with_length(mut self, suit: Suit, min: u8, max: u8) -> Self {
        self.lengths[suit.idx()] = Range::new(min, max);
        self
    }

    pub fn with_aces(mut self, aces: impl IntoIterator<Item = u8>) -> Self {
        self.aces = Some(aces.into_iter().collect());
        self
    }

    pub fn with_ace_topology(mut self, topologies: impl IntoIterator<Item = AceTopology>) -> Self {
        self.ace_topology = Some(topologies.into_iter().collect());
        self
    }

    pub fn with_balanced(mut self, balanced: bool) -> Self {
        self.balanced = Some(balanced);
        self
    }

    pub fn length(&self, suit: Suit) -> Range {
        self.lengths[suit.idx()]
    }

    /// Check whether a hand satisfies every constraint.
    pub fn matches(&self, hand: &Hand) -> bool {
        if !self.hcp.contains(hand.hcp()) {
            return false;
        }
        if !self.total_points.contains(hand.total_points()) {
            return false;
        }
        if !self.controls.contains(hand.controls()) {
            return false;
        }
        if let Some(aces) = &self.aces {
            if !aces.contains(&hand.ace_count()) {
                return false;
            }
        }
        if let Some(topologies) = &self.ace_topology {
            if !topologies.contains(&hand.ace_topology()) {
                return false;
            }
        }
        if let Some(balanced) = self.balanced {
            if hand.is_balanced() != balanced {
                return false;
            }
        }
        Suit::ALL
            .iter()
            .all(|&suit| self.length(suit).contains(hand.length(suit)))
    }

    /// Combine two constraints, e.g. prior knowledge and what a new call shows.
    ///
    /// Ranges and sets take their meet. The balanced flag is not a meet: an
    /// explicit value on `other` replaces whatever `self` held, even when the
    /// two contradict.
    pub fn intersect(&self, other: &HandConstraints) -> HandConstraints {
        let mut lengths = self.lengths;
        for (range, theirs) in lengths.iter_mut().zip(other.lengths) {
            *range = range.intersect(theirs);
        }
        HandConstraints {
            hcp: self.hcp.intersect(other.hcp),
            total_points: self.total_points.intersect(other.total_points),
            controls: self.controls.intersect(other.controls),
            lengths,
            aces: intersect_sets(&self.aces, &other.aces),
            ace_topology: intersect_sets(&self.ace_topology, &other.ace_topology),
            balanced: other.balanced.or(self.balanced),
        }
    }

    /// True when every field is at its default.
    pub fn is_unconstrained(&self) -> bool {
        *self == HandConstraints::default()
    }

    /// False when some range is empty or some permitted set has no members.
    /// An unsatisfiable predicate matches no hand.
    pub fn is_satisfiable(&self) -> bool {
        let ranges_ok = [self.hcp, self.total_points, self.controls]
            .iter()
            .chain(self.lengths.iter())
            .all(|r| !r.is_empty());
        let aces_ok = self.aces.as_ref().map_or(true, |s| !s.is_empty());
        let topology_ok = self.ace_topology.as_ref().map_or(true, |s| !s.is_empty());
        ranges_ok && aces_ok && topology_ok
    }
}

fn intersect_sets<T: Ord + Copy>(
    a: &Option<BTreeSet<T>>,
    b: &Option<BTreeSet<T>>,
) -> Option<BTreeSet<T>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.intersection(b).copied().collect()),
        (Some(s), None) | (None, Some(s)) => Some(s.clone()),
        (None, None) => None,
    }
}

impl fmt::Display for HandConstraints {
    /// Lists only the fields that constrain something, e.g.
    /// `HCP: 15-17, BAL, S:5-13`. Renders `any` when nothing is constrained.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defaults = HandConstraints::default();
        let mut parts = Vec::new();
        if self.hcp != defaults.hcp {
            parts.push(format!("HCP: {}", self.hcp));
        }
        if self.total_points != defaults.total_points {
            parts.push(format!("TP: {}", self.total_points));
        }
        if self.controls != defaults.controls {
            parts.push(format!("CTRL: {}", self.controls));
        }
        if let Some(aces) = &self.aces {
            let list: Vec<String> = aces.iter().map(|a| a.to_string()).collect();
            parts.push(format!("ACES: {}", list.join(",")));
        }
        if let Some(topologies) = &self.ace_topology {
            let list: Vec<&str> = topologies.iter().map(|t| t.label()).collect();
            parts.push(format!("TOPO: {}", list.join(",")));
        }
        if let Some(balanced) = self.balanced {
            parts.push(if balanced { "BAL" } else { "UNBAL" }.to_string());
        }
        for suit in Suit::ALL.iter().rev() {
            let range = self.length(*suit);
            if range != defaults.length(*suit) {
                parts.push(format!("{}:{}", suit, range));
            }
        }

        if parts.is_empty() {
            f.write_str("any")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> Hand {
        Hand::parse(s).unwrap()
    }

    #[test]
    fn test_default_matches_any_hand() {
        let c = HandConstraints::default();
        assert!(c.matches(&hand("SAKQJ HAKQ DAKQ CAKQ")));
        assert!(c.matches(&hand("S5432 H5432 D5432 C2")));
        assert!(c.matches(&hand("SAKQJT98765432")));
        assert!(c.is_unconstrained());
    }

    #[test]
    fn test_hcp_and_shape() {
        let notrump = HandConstraints::new().with_hcp(15, 17).with_balanced(true);
        assert!(notrump.matches(&hand("SKQJ2 HKQJ2 DKJ2 C32")));
        // 14 HCP
        assert!(!notrump.matches(&hand("SKQ32 HKQJ2 DK32 C32")));
        // 16 HCP but 5-4-2-2
        assert!(!notrump.matches(&hand("SKQJ2 HKQJ32 DKJ C32")));
    }

    #[test]
    fn test_length_range() {
        let hearts = HandConstraints::new().with_length(Suit::Hearts, 5, MAX_LENGTH);
        assert!(hearts.matches(&hand("S432 HAKJ32 DK432 C43")));
        assert!(!hearts.matches(&hand("SAKJ32 H432 DK432 C43")));
    }

    #[test]
    fn test_aces_and_topology() {
        let one_or_four = HandConstraints::new().with_aces([1, 4]);
        assert!(one_or_four.matches(&hand("SA432 HKQ3 DKQJ2 C432")));
        assert!(!one_or_four.matches(&hand("SKQ43 HKQ3 DKQJ2 C432")));

        let rank = HandConstraints::new()
            .with_aces([2])
            .with_ace_topology([AceTopology::Rank]);
        assert!(rank.matches(&hand("SA432 HA43 DKQJ2 CK32")));
        assert!(!rank.matches(&hand("SA432 HK43 DA432 CK32")));
    }

    #[test]
    fn test_intersect_takes_meet_of_ranges() {
        let a = HandConstraints::new()
            .with_hcp(10, 20)
            .with_length(Suit::Spades, 4, 13);
        let b = HandConstraints::new()
            .with_hcp(15, 25)
            .with_length(Suit::Spades, 0, 6);
        let c = a.intersect(&b);
        assert_eq!(c.hcp, Range::new(15, 20));
        assert_eq!(c.length(Suit::Spades), Range::new(4, 6));
        assert_eq!(c, b.intersect(&a));
    }

    #[test]
    fn test_intersect_sets() {
        let a = HandConstraints::new().with_aces([0, 3]);
        let b = HandConstraints::new().with_aces([1, 3, 4]);
        assert_eq!(a.intersect(&b).aces, Some(BTreeSet::from([3])));
        assert_eq!(a.intersect(&HandConstraints::new()).aces, a.aces);
        assert_eq!(HandConstraints::new().intersect(&b).aces, b.aces);
    }

    #[test]
    fn test_intersect_is_idempotent() {
        let a = HandConstraints::new()
            .with_hcp(11, 16)
            .with_controls(3, 3)
            .with_aces([1, 4])
            .with_balanced(false);
        assert_eq!(a.intersect(&a), a);
    }

    #[test]
    fn test_intersect_balanced_right_operand_wins() {
        let bal = HandConstraints::new().with_balanced(true);
        let unbal = HandConstraints::new().with_balanced(false);
        let none = HandConstraints::new();
        assert_eq!(bal.intersect(&unbal).balanced, Some(false));
        assert_eq!(unbal.intersect(&bal).balanced, Some(true));
        assert_eq!(bal.intersect(&none).balanced, Some(true));
        assert_eq!(none.intersect(&unbal).balanced, Some(false));
    }

    #[test]
    fn test_contradiction_matches_nothing() {
        let low = HandConstraints::new().with_hcp(0, 10);
        let high = HandConstraints::new().with_hcp(15, MAX_HCP);
        let both = low.intersect(&high);
        assert!(!both.is_satisfiable());
        assert!(!both.matches(&hand("SKQJ2 HKQJ2 DKJ2 C32")));
        assert!(!both.matches(&hand("S5432 H5432 D5432 C2")));

        let no_aces = HandConstraints::new()
            .with_aces([1])
            .intersect(&HandConstraints::new().with_aces([2]));
        assert!(!no_aces.is_satisfiable());
        assert!(!no_aces.matches(&hand("SA432 HKQ3 DKQJ2 C432")));
    }

    #[test]
    fn test_intersection_only_accepts_hands_both_accept() {
        let a = HandConstraints::new().with_hcp(12, 21);
        let b = HandConstraints::new().with_length(Suit::Hearts, 5, 13);
        let c = a.intersect(&b);
        for s in [
            "S432 HAKJ32 DK432 C43",
            "SAKJ32 H432 DK432 C43",
            "S32 HKQJ987 D432 C32",
            "SKQJ2 HKQJ2 DKJ2 C32",
        ] {
            let h = hand(s);
            assert_eq!(c.matches(&h), a.matches(&h) && b.matches(&h), "{}", s);
        }
    }

    #[test]
    fn test_display_omits_defaults() {
        assert_eq!(HandConstraints::new().to_string(), "any");
        let c = HandConstraints::new()
            .with_hcp(15, 17)
            .with_balanced(true)
            .with_length(Suit::Spades, 5, 13);
        assert_eq!(c.to_string(), "HCP: 15-17, BAL, S:5-13");
        let c = HandConstraints::new().with_controls(3, 3).with_aces([1, 4]);
        assert_eq!(c.to_string(), "CTRL: 3-3, ACES: 1,4");
    }
}
