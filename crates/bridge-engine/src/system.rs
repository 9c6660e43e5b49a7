use crate::rule::Rule;
use bridge_core::{Call, Hand};
use log::trace;

/// A named set of rules for one partnership, highest priority first.
///
/// Rules of equal priority keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiddingSystem {
    name: String,
    rules: Vec<Rule>,
}

impl BiddingSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn from_rules(name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut system = Self::new(name);
        system.rules.extend(rules);
        system.sort();
        system
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
        self.sort();
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The highest-priority rule that applies to this hand after `history`.
    pub fn get_rule(&self, history: &[Call], hand: &Hand) -> Option<&Rule> {
        let rule = self.rules.iter().find(|r| r.applies(history, hand));
        if let Some(rule) = rule {
            trace!("{}: '{}' applies", self.name, rule.description);
        }
        rule
    }

    pub fn get_call(&self, history: &[Call], hand: &Hand) -> Option<Call> {
        self.get_rule(history, hand).map(|r| r.call)
    }

    /// Rules whose trigger matches `history`, in priority order.
    pub fn candidates<'a>(&'a self, history: &'a [Call]) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.trigger.matches(history))
    }

    /// Rules that could have produced `call` after `history`, in priority order.
    pub fn rules_for_call<'a>(
        &'a self,
        history: &'a [Call],
        call: Call,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.candidates(history).filter(move |r| r.call == call)
    }

    fn sort(&mut self) {
        // Stable, so insertion order breaks ties.
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::HandConstraints;
    use crate::trigger::{Step, Trigger};
    use bridge_core::Strain;

    fn rule(priority: i32, call: Call, description: &str) -> Rule {
        Rule::new(
            priority,
            Trigger::Opening,
            HandConstraints::new(),
            call,
            description,
        )
    }

    #[test]
    fn test_rules_sorted_by_priority_stable() {
        let mut system = BiddingSystem::new("test");
        system.add_rule(rule(10, Call::bid(1, Strain::Clubs), "first ten"));
        system.add_rule(rule(20, Call::bid(1, Strain::NoTrump), "twenty"));
        system.add_rule(rule(10, Call::bid(1, Strain::Diamonds), "second ten"));
        system.add_rule(rule(15, Call::bid(2, Strain::NoTrump), "fifteen"));

        let order: Vec<&str> = system.rules().iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["twenty", "fifteen", "first ten", "second ten"]);
    }

    #[test]
    fn test_get_rule_picks_first_applicable() {
        let system = BiddingSystem::from_rules(
            "test",
            [
                rule(10, Call::bid(1, Strain::Clubs), "catch-all"),
                Rule::new(
                    20,
                    Trigger::Opening,
                    HandConstraints::new().with_hcp(15, 17).with_balanced(true),
                    Call::bid(1, Strain::NoTrump),
                    "1NT",
                ),
            ],
        );
        let notrump = Hand::parse("SKQJ2 HKQJ2 DKJ2 C32").unwrap();
        let weak = Hand::parse("S5432 H5432 D5432 C2").unwrap();
        assert_eq!(system.get_call(&[], &notrump), Some(Call::bid(1, Strain::NoTrump)));
        assert_eq!(system.get_call(&[], &weak), Some(Call::bid(1, Strain::Clubs)));
        assert_eq!(system.get_rule(&[], &weak).map(|r| r.description.as_str()), Some("catch-all"));
    }

    #[test]
    fn test_no_rule_applies() {
        let system = BiddingSystem::new("empty");
        let hand = Hand::parse("SKQJ2 HKQJ2 DKJ2 C32").unwrap();
        assert!(system.is_empty());
        assert_eq!(system.get_call(&[], &hand), None);
    }

    #[test]
    fn test_rules_for_call_filters_trigger_and_call() {
        let one_club = Call::bid(1, Strain::Clubs);
        let system = BiddingSystem::new("test")
            .with_rule(rule(10, one_club, "open 1C"))
            .with_rule(Rule::new(
                10,
                Trigger::Sequence(vec![Step::standard(one_club)]),
                HandConstraints::new(),
                Call::bid(1, Strain::Spades),
                "respond 1S",
            ));

        let found: Vec<&str> = system
            .rules_for_call(&[], one_club)
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(found, vec!["open 1C"]);

        let history = [one_club, Call::Pass];
        assert_eq!(system.candidates(&history).count(), 1);
        assert_eq!(system.rules_for_call(&history, one_club).count(), 0);
    }
}
