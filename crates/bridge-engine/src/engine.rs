use crate::constraints::HandConstraints;
use crate::rule::Rule;
use crate::system::BiddingSystem;
use crate::trace::{BidTrace, RuleTrace};
use bridge_core::{Call, Hand, Seat};
use log::{debug, info, trace};
use serde::Serialize;
use std::fmt;

/// Where the engine sits at the table and what the other side plays.
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    pub my_seat: Seat,
    pub dealer: Seat,
    pub opponents: &'a BiddingSystem,
}

pub struct Engine {
    system: BiddingSystem,
}

impl Engine {
    pub fn new(system: BiddingSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> &BiddingSystem {
        &self.system
    }

    /// The call our system makes with `hand` after `history`. Pass when no
    /// rule applies.
    pub fn get_bid(&self, history: &[Call], hand: &Hand) -> Call {
        match self.select_rule(history, hand) {
            Some(rule) => {
                debug!(
                    "{}: selected '{}' -> {}",
                    self.system.name(),
                    rule.description,
                    rule.call
                );
                rule.call
            }
            None => {
                debug!("{}: no rule applies, passing", self.system.name());
                Call::Pass
            }
        }
    }

    pub fn select_rule(&self, history: &[Call], hand: &Hand) -> Option<&Rule> {
        self.system.get_rule(history, hand)
    }

    /// Like `get_bid`, but bids from whichever system belongs to the seat
    /// whose turn it is.
    pub fn get_bid_in_context(
        &self,
        history: &[Call],
        hand: &Hand,
        table: TableContext<'_>,
    ) -> Call {
        self.select_rule_in_context(history, hand, table)
            .map_or(Call::Pass, |rule| rule.call)
    }

    pub fn select_rule_in_context<'a>(
        &'a self,
        history: &[Call],
        hand: &Hand,
        table: TableContext<'a>,
    ) -> Option<&'a Rule> {
        let system = self.system_for_turn(history.len(), table);
        let rule = system.get_rule(history, hand);
        match rule {
            Some(rule) => debug!(
                "{}: selected '{}' -> {}",
                system.name(),
                rule.description,
                rule.call
            ),
            None => debug!("{}: no rule applies, passing", system.name()),
        }
        rule
    }

    /// Selection with a record of every rule examined.
    pub fn select_with_trace(&self, history: &[Call], hand: &Hand) -> BidTrace {
        trace_selection(&self.system, history, hand)
    }

    /// Like `select_with_trace`, but walks the system of the seat whose turn
    /// it is, so the trace agrees with `select_rule_in_context`.
    pub fn select_with_trace_in_context(
        &self,
        history: &[Call],
        hand: &Hand,
        table: TableContext<'_>,
    ) -> BidTrace {
        trace_selection(self.system_for_turn(history.len(), table), history, hand)
    }

    /// Infer what each seat's calls promise.
    ///
    /// Every call is explained by the first rule, in priority order, of the
    /// caller's system whose trigger matched the history before it and whose
    /// call is the one made. That rule's constraints are intersected into the
    /// seat's running estimate. Calls no rule explains add nothing.
    pub fn estimate(
        history: &[Call],
        my_seat: Seat,
        dealer: Seat,
        mine: &BiddingSystem,
        theirs: &BiddingSystem,
    ) -> Estimate {
        let mut estimate = Estimate::default();

        for (i, &call) in history.iter().enumerate() {
            let seat = dealer.offset(i);
            let system = if seat.same_side(my_seat) { mine } else { theirs };
            let prior = &history[..i];
            let rule = system.rules_for_call(prior, call).next();

            match rule {
                Some(rule) => {
                    let narrowed = estimate.seats[seat.index()].intersect(&rule.constraints);
                    debug!(
                        "{} {} explained by {} '{}': {}",
                        seat.name(),
                        call,
                        system.name(),
                        rule.description,
                        narrowed
                    );
                    estimate.seats[seat.index()] = narrowed;
                }
                None => debug!("{} {} not explained by {}", seat.name(), call, system.name()),
            }

            estimate.steps.push(EstimateStep {
                seat,
                call,
                rule: rule.map(|r| r.description.clone()),
            });
        }

        info!(
            "estimated {} calls, {} explained",
            history.len(),
            estimate.steps.iter().filter(|s| s.rule.is_some()).count()
        );
        estimate
    }

    /// Estimate with our own system explaining every seat's calls.
    pub fn explain_auction(&self, history: &[Call], dealer: Seat) -> Estimate {
        Self::estimate(history, dealer, dealer, &self.system, &self.system)
    }

    fn system_for_turn<'a>(
        &'a self,
        calls_made: usize,
        table: TableContext<'a>,
    ) -> &'a BiddingSystem {
        let turn = table.dealer.offset(calls_made);
        if table.my_seat.same_side(turn) {
            &self.system
        } else {
            table.opponents
        }
    }
}

fn trace_selection(system: &BiddingSystem, history: &[Call], hand: &Hand) -> BidTrace {
    let mut rules_considered = Vec::new();
    let mut selected_call = None;

    for rule in system.rules() {
        let trigger_matched = rule.trigger.matches(history);
        let constraints_matched = trigger_matched && rule.constraints.matches(hand);
        trace!(
            "'{}': trigger {}, hand {}",
            rule.description,
            trigger_matched,
            constraints_matched
        );
        rules_considered.push(RuleTrace {
            description: rule.description.clone(),
            call: rule.call,
            priority: rule.priority,
            constraints: rule.constraints.clone(),
            trigger_matched,
            constraints_matched,
        });
        if constraints_matched {
            selected_call = Some(rule.call);
            break;
        }
    }

    BidTrace {
        system: system.name().to_string(),
        hand: hand.clone(),
        history: history.to_vec(),
        rules_considered,
        selected_call,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateStep {
    pub seat: Seat,
    pub call: Call,
    pub rule: Option<String>,
}

/// Per-seat constraints inferred from an auction, indexed N, E, S, W.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Estimate {
    seats: [HandConstraints; 4],
    pub steps: Vec<EstimateStep>,
}

impl Estimate {
    pub fn get(&self, seat: Seat) -> &HandConstraints {
        &self.seats[seat.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Seat, &HandConstraints)> {
        Seat::ALL.iter().map(move |&s| (s, self.get(s)))
    }
}

/// Renders one seat's inferred constraints, e.g. `HCP: 15-17, BAL`.
pub fn format_estimate(constraints: &HandConstraints) -> String {
    constraints.to_string()
}

impl fmt::Display for Estimate {
    /// One line per seat, then one line per call with the rule that
    /// explained it (`-` when none did).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (seat, constraints) in self.iter() {
            writeln!(f, "{:<5} {}", seat.name(), format_estimate(constraints))?;
        }
        for step in &self.steps {
            let meaning = step.rule.as_deref().unwrap_or("-");
            writeln!(f, "  {} {:<5} {}", step.seat, step.call.to_string(), meaning)?;
        }
        Ok(())
    }
}
