use crate::constraints::HandConstraints;
use crate::trigger::Trigger;
use bridge_core::{Call, Hand, Strain};

/// Base priority of a compiled rule.
pub const BASE_PRIORITY: i32 = 10;
/// Added when a rule explicitly requires a balanced hand.
pub const BALANCED_BONUS: i32 = 5;
/// Fixed priority of every rule whose call is 1NT.
pub const ONE_NOTRUMP_PRIORITY: i32 = 20;

/// Priority the convention compiler assigns to a rule.
///
/// Balanced rules outrank the unbalanced catch-alls they overlap with, and
/// a natural 1NT outranks everything else at the same point in the auction.
pub fn priority_for(call: Call, balanced: Option<bool>) -> i32 {
    if call == Call::bid(1, Strain::NoTrump) {
        return ONE_NOTRUMP_PRIORITY;
    }
    match balanced {
        Some(true) => BASE_PRIORITY + BALANCED_BONUS,
        _ => BASE_PRIORITY,
    }
}

/// One bidding agreement: after `trigger`, a hand matching `constraints` calls `call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub priority: i32,
    pub trigger: Trigger,
    pub constraints: HandConstraints,
    pub call: Call,
    pub description: String,
}

impl Rule {
    pub fn new(
        priority: i32,
        trigger: Trigger,
        constraints: HandConstraints,
        call: Call,
        description: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            trigger,
            constraints,
            call,
            description: description.into(),
        }
    }

    pub fn applies(&self, history: &[Call], hand: &Hand) -> bool {
        self.trigger.matches(history) && self.constraints.matches(hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_function() {
        let one_nt = Call::bid(1, Strain::NoTrump);
        assert_eq!(priority_for(one_nt, None), 20);
        assert_eq!(priority_for(one_nt, Some(true)), 20);
        assert_eq!(priority_for(Call::bid(2, Strain::NoTrump), Some(true)), 15);
        assert_eq!(priority_for(Call::bid(1, Strain::Clubs), Some(false)), 10);
        assert_eq!(priority_for(Call::Pass, None), 10);
    }

    #[test]
    fn test_applies_needs_trigger_and_hand() {
        let rule = Rule::new(
            10,
            Trigger::Opening,
            HandConstraints::new().with_hcp(12, 21),
            Call::bid(1, Strain::Diamonds),
            "OPEN 1D",
        );
        let opener = Hand::parse("SKQJ HQJ3 DAQJ2 CJ32").unwrap();
        let weak = Hand::parse("S5432 H5432 D5432 C2").unwrap();
        assert!(rule.applies(&[], &opener));
        assert!(!rule.applies(&[], &weak));
        assert!(!rule.applies(&[Call::bid(1, Strain::Clubs)], &opener));
    }
}
