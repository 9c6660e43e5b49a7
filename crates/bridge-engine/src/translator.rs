//! Compiles line-oriented convention text into a `BiddingSystem`.
//!
//! ```text
//! # Strong club
//! OPEN 1C:
//!   HCP: 17+
//!
//! 1C - 1S - 4NT - 5C:
//!   ACES: 1,4
//!
//! 1H - (X) - XX:
//!   HCP: 10+
//! ```
//!
//! A line ending in `:` starts a rule. `KEYWORD CALL:` is an opening rule;
//! `STEP - STEP - ... - CALL:` is a sequence rule whose parenthesised steps
//! must be directly adjacent. Attribute lines below a header constrain the
//! hand. `#` starts a comment.

use crate::constraints::{HandConstraints, Range, MAX_CONTROLS, MAX_HCP, MAX_LENGTH, MAX_TOTAL_POINTS};
use crate::error::{CompileError, CompileResult};
use crate::rule::{priority_for, Rule};
use crate::system::BiddingSystem;
use crate::trigger::{Step, Trigger};
use bridge_core::{AceTopology, Call, Strain, Suit};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(PASS)|(XX)|(X)|([1-7])(C|D|H|S|NT))$").unwrap());
static SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*-\s*(\d+)$").unwrap());
static MIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*\+$").unwrap());
static EXACT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static LEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^LEN\s+(\S+)$").unwrap());

const DEFAULT_NAME: &str = "ParsedSystem";

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTranslator;

impl SystemTranslator {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> CompileResult<BiddingSystem> {
        self.parse_named(DEFAULT_NAME, text)
    }

    /// Compile `text` into a system called `name`. Any malformed line rejects
    /// the whole text.
    pub fn parse_named(&self, name: &str, text: &str) -> CompileResult<BiddingSystem> {
        let mut rules = Vec::new();
        let mut current: Option<RuleBlock> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(heading) = line.strip_suffix(':') {
                if let Some(block) = current.take() {
                    rules.push(block.into_rule());
                }
                current = Some(RuleBlock::from_header(line_no, heading.trim())?);
            } else {
                let block = current
                    .as_mut()
                    .ok_or_else(|| CompileError::AttributeOutsideRule {
                        line: line_no,
                        text: line.to_string(),
                    })?;
                block.apply_attribute(line_no, line)?;
            }
        }

        if let Some(block) = current.take() {
            rules.push(block.into_rule());
        }

        let system = BiddingSystem::from_rules(name, rules);
        info!("compiled system '{}' with {} rules", name, system.len());
        Ok(system)
    }

    /// Compile a convention file; the system is named after the file stem.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> CompileResult<BiddingSystem> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_NAME);
        self.parse_named(name, &text)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Attributes collected for one rule until the next header.
#[derive(Debug)]
struct RuleBlock {
    description: String,
    trigger: Trigger,
    call: Call,
    constraints: HandConstraints,
}

impl RuleBlock {
    fn from_header(line: usize, heading: &str) -> CompileResult<Self> {
        let malformed = || CompileError::MalformedHeader {
            line,
            text: heading.to_string(),
        };

        if heading.contains('-') {
            let parts: Vec<&str> = heading.split('-').map(str::trim).collect();
            if parts.iter().any(|p| p.is_empty()) {
                return Err(malformed());
            }
            let (last, prior) = parts.split_last().ok_or_else(malformed)?;
            let call = parse_call(line, last)?;
            let steps = prior
                .iter()
                .map(|token| parse_step(line, token))
                .collect::<CompileResult<Vec<_>>>()?;
            let trigger = Trigger::Sequence(steps);
            Ok(Self {
                description: format!("{} - {}", trigger, call),
                trigger,
                call,
                constraints: HandConstraints::default(),
            })
        } else {
            let tokens: Vec<&str> = heading.split_whitespace().collect();
            let [keyword, call_token] = tokens.as_slice() else {
                return Err(malformed());
            };
            let call = parse_call(line, call_token)?;
            Ok(Self {
                description: format!("{} {}", keyword.to_ascii_uppercase(), call),
                trigger: Trigger::Opening,
                call,
                constraints: HandConstraints::default(),
            })
        }
    }

    fn apply_attribute(&mut self, line: usize, text: &str) -> CompileResult<()> {
        let unknown = || CompileError::UnknownAttribute {
            line,
            text: text.to_string(),
        };
        let (key, value) = text.split_once(':').ok_or_else(unknown)?;
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();
        let c = &mut self.constraints;

        match key.as_str() {
            "HCP" => c.hcp = parse_range(line, "HCP", value, MAX_HCP, false)?,
            "TP" => c.total_points = parse_range(line, "TP", value, MAX_TOTAL_POINTS, false)?,
            "CONTROLS" => c.controls = parse_range(line, "CONTROLS", value, MAX_CONTROLS, true)?,
            "ACES" => c.aces = Some(parse_aces(line, value)?),
            "ACE_TOPOLOGY" => {
                let topology: AceTopology =
                    value
                        .parse()
                        .map_err(|_| CompileError::UnknownAceTopology {
                            line,
                            text: value.to_string(),
                        })?;
                c.ace_topology.get_or_insert_with(BTreeSet::new).insert(topology);
            }
            "SHAPE" => {
                c.balanced = Some(match value.to_ascii_uppercase().as_str() {
                    "BALANCED" => true,
                    "UNBALANCED" => false,
                    _ => {
                        return Err(CompileError::UnknownShape {
                            line,
                            text: value.to_string(),
                        })
                    }
                })
            }
            _ => {
                let caps = LEN_RE.captures(&key).ok_or_else(unknown)?;
                let suit_text = &caps[1];
                let suit = single_char(suit_text)
                    .and_then(Suit::from_char)
                    .ok_or_else(|| CompileError::UnknownSuit {
                        line,
                        text: suit_text.to_string(),
                    })?;
                c.lengths[suit.idx()] = parse_range(line, "LEN", value, MAX_LENGTH, true)?;
            }
        }
        Ok(())
    }

    fn into_rule(self) -> Rule {
        let priority = priority_for(self.call, self.constraints.balanced);
        debug!(
            "compiled rule '{}' (priority {}): {}",
            self.description, priority, self.constraints
        );
        Rule::new(
            priority,
            self.trigger,
            self.constraints,
            self.call,
            self.description,
        )
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// `PASS`, `X`, `XX` or `<level 1-7><C|D|H|S|NT>`.
fn parse_call(line: usize, token: &str) -> CompileResult<Call> {
    let invalid = || CompileError::InvalidCall {
        line,
        text: token.to_string(),
    };
    let upper = token.trim().to_ascii_uppercase();
    let caps = CALL_RE.captures(&upper).ok_or_else(invalid)?;

    if caps.get(1).is_some() {
        return Ok(Call::Pass);
    }
    if caps.get(2).is_some() {
        return Ok(Call::Redouble);
    }
    if caps.get(3).is_some() {
        return Ok(Call::Double);
    }
    let level: u8 = caps[4].parse().map_err(|_| invalid())?;
    let strain = Strain::from_token(&caps[5]).ok_or_else(invalid)?;
    Ok(Call::bid(level, strain))
}

/// A sequence step; `(CALL)` marks direct adjacency.
fn parse_step(line: usize, token: &str) -> CompileResult<Step> {
    match token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => parse_call(line, inner).map(Step::direct),
        None => parse_call(line, token).map(Step::standard),
    }
}

/// `min-max`, `min+` (up to `ceiling`), or a bare number when `allow_exact`.
fn parse_range(
    line: usize,
    field: &'static str,
    text: &str,
    ceiling: u8,
    allow_exact: bool,
) -> CompileResult<Range> {
    let invalid = || CompileError::InvalidRange {
        line,
        field,
        text: text.to_string(),
    };
    let number = |s: &str| s.parse::<u8>().map_err(|_| invalid());

    if let Some(caps) = SPAN_RE.captures(text) {
        return Ok(Range::new(number(&caps[1])?, number(&caps[2])?));
    }
    if let Some(caps) = MIN_RE.captures(text) {
        return Ok(Range::new(number(&caps[1])?, ceiling));
    }
    if allow_exact && EXACT_RE.is_match(text) {
        let n = number(text)?;
        return Ok(Range::new(n, n));
    }
    Err(invalid())
}

fn parse_aces(line: usize, text: &str) -> CompileResult<BTreeSet<u8>> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>()
                .ok()
                .filter(|n| *n <= 4)
                .ok_or_else(|| CompileError::InvalidAceCount {
                    line,
                    text: part.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::Adjacency;
    use bridge_core::Hand;

    fn compile(text: &str) -> BiddingSystem {
        SystemTranslator::new().parse(text).unwrap()
    }

    #[test]
    fn test_opening_rule() {
        let system = compile(
            "
OPEN 1NT:
  HCP: 15-17
  SHAPE: BALANCED
",
        );
        assert_eq!(system.len(), 1);
        let rule = &system.rules()[0];
        assert_eq!(rule.trigger, Trigger::Opening);
        assert_eq!(rule.call, Call::bid(1, Strain::NoTrump));
        assert_eq!(rule.constraints.hcp, Range::new(15, 17));
        assert_eq!(rule.constraints.balanced, Some(true));
        assert_eq!(rule.priority, 20);
        assert_eq!(rule.description, "OPEN 1NT");
    }

    #[test]
    fn test_sequence_rule_with_direct_step() {
        let system = compile(
            "
1H - (X) - XX:
  HCP: 10+
",
        );
        let rule = &system.rules()[0];
        assert_eq!(rule.call, Call::Redouble);
        assert_eq!(
            rule.trigger,
            Trigger::Sequence(vec![
                Step::standard(Call::bid(1, Strain::Hearts)),
                Step::direct(Call::Double),
            ])
        );
        assert_eq!(rule.constraints.hcp, Range::new(10, MAX_HCP));
        assert_eq!(rule.description, "1H - (X) - XX");
    }

    #[test]
    fn test_compact_sequence_header() {
        let system = compile("1C-1S-4NT-5C:\n  ACES: 1,4\n");
        let rule = &system.rules()[0];
        match &rule.trigger {
            Trigger::Sequence(steps) => {
                assert_eq!(steps.len(), 3);
                assert!(steps.iter().all(|s| s.adjacency == Adjacency::Standard));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
        assert_eq!(rule.constraints.aces, Some(BTreeSet::from([1, 4])));
    }

    #[test]
    fn test_all_attributes_in_any_order() {
        let system = compile(
            "
OPEN 2D:
  LEN S: 4
  ACE_TOPOLOGY: RANK
  TP: 20+
  SHAPE: UNBALANCED   # comment after a value
  CONTROLS: 4-5
  ACE_TOPOLOGY: COLOR
  LEN D: 5+
  ACES: 2
  HCP: 17-24
",
        );
        let c = &system.rules()[0].constraints;
        assert_eq!(c.hcp, Range::new(17, 24));
        assert_eq!(c.total_points, Range::new(20, MAX_TOTAL_POINTS));
        assert_eq!(c.controls, Range::new(4, 5));
        assert_eq!(c.length(Suit::Spades), Range::new(4, 4));
        assert_eq!(c.length(Suit::Diamonds), Range::new(5, MAX_LENGTH));
        assert_eq!(c.length(Suit::Hearts), Range::new(0, MAX_LENGTH));
        assert_eq!(c.aces, Some(BTreeSet::from([2])));
        assert_eq!(
            c.ace_topology,
            Some(BTreeSet::from([AceTopology::Rank, AceTopology::Color]))
        );
        assert_eq!(c.balanced, Some(false));
        assert_eq!(system.rules()[0].priority, 10);
    }

    #[test]
    fn test_controls_bare_number_is_exact() {
        let system = compile("1C - 1S:\n  CONTROLS: 3\n");
        assert_eq!(system.rules()[0].constraints.controls, Range::new(3, 3));
    }

    #[test]
    fn test_absent_attributes_stay_unconstrained() {
        let system = compile("OPEN PASS:\n");
        let rule = &system.rules()[0];
        assert_eq!(rule.call, Call::Pass);
        assert!(rule.constraints.is_unconstrained());
    }

    #[test]
    fn test_priorities() {
        let system = compile(
            "
OPEN 1C:
  HCP: 12-21
OPEN 2NT:
  HCP: 20-21
  SHAPE: BALANCED
OPEN 1NT:
  HCP: 15-17
",
        );
        let priorities: Vec<(String, i32)> = system
            .rules()
            .iter()
            .map(|r| (r.call.to_string(), r.priority))
            .collect();
        assert_eq!(
            priorities,
            vec![
                ("1NT".to_string(), 20),
                ("2NT".to_string(), 15),
                ("1C".to_string(), 10)
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let system = compile(
            "
# Natural openings
OPEN 1H: # five-card majors
  HCP: 12-21

  # at least five
  LEN H: 5+
",
        );
        assert_eq!(system.len(), 1);
        let hand = Hand::parse("S32 HAKJ32 DK432 C43").unwrap();
        // 11 HCP
        assert_eq!(system.get_call(&[], &hand), None);
        let hand = Hand::parse("S32 HAKJ32 DK432 CK3").unwrap();
        assert_eq!(system.get_call(&[], &hand), Some(Call::bid(1, Strain::Hearts)));
    }

    #[test]
    fn test_rejects_bad_range() {
        let err = SystemTranslator::new()
            .parse("OPEN 1NT:\n  HCP: 15..17\n")
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidRange { line: 2, field: "HCP", .. }));
    }

    #[test]
    fn test_rejects_bare_number_for_hcp() {
        let err = SystemTranslator::new()
            .parse("OPEN 1NT:\n  HCP: 15\n")
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_unknown_strain() {
        let err = SystemTranslator::new().parse("OPEN 1Z:\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidCall { line: 1, .. }));
        let err = SystemTranslator::new().parse("OPEN 8C:\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidCall { .. }));
        let err = SystemTranslator::new().parse("1C - 1Q - 2C:\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidCall { .. }));
    }

    #[test]
    fn test_rejects_unknown_suit() {
        let err = SystemTranslator::new()
            .parse("OPEN 1H:\n  LEN Q: 5+\n")
            .unwrap_err();
        assert!(matches!(err, CompileError::UnknownSuit { line: 2, .. }));
    }

    #[test]
    fn test_rejects_malformed_lines() {
        let t = SystemTranslator::new();
        assert!(matches!(
            t.parse("OPEN:\n").unwrap_err(),
            CompileError::MalformedHeader { .. }
        ));
        assert!(matches!(
            t.parse("1C - - 1S:\n").unwrap_err(),
            CompileError::MalformedHeader { .. }
        ));
        assert!(matches!(
            t.parse("OPEN 1C:\n  POINTS: 12\n").unwrap_err(),
            CompileError::UnknownAttribute { .. }
        ));
        assert!(matches!(
            t.parse("HCP: 12-14\nOPEN 1C:\n").unwrap_err(),
            CompileError::AttributeOutsideRule { line: 1, .. }
        ));
        assert!(matches!(
            t.parse("OPEN 1C:\n  SHAPE: FLAT\n").unwrap_err(),
            CompileError::UnknownShape { .. }
        ));
        assert!(matches!(
            t.parse("OPEN 1C:\n  ACE_TOPOLOGY: DIAGONAL\n").unwrap_err(),
            CompileError::UnknownAceTopology { .. }
        ));
        assert!(matches!(
            t.parse("OPEN 1C:\n  ACES: 1,x\n").unwrap_err(),
            CompileError::InvalidAceCount { .. }
        ));
    }

    #[test]
    fn test_error_anywhere_rejects_everything() {
        let text = "
OPEN 1NT:
  HCP: 15-17
OPEN 1H:
  LEN H: five
";
        assert!(SystemTranslator::new().parse(text).is_err());
    }

    #[test]
    fn test_parse_file_names_system_after_stem() {
        let dir = std::env::temp_dir().join("bridge-engine-translator-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("natural.dsl");
        fs::write(&path, "OPEN 1NT:\n  HCP: 15-17\n").unwrap();
        let system = SystemTranslator::new().parse_file(&path).unwrap();
        assert_eq!(system.name(), "natural");
        assert_eq!(system.len(), 1);

        let missing = SystemTranslator::new().parse_file(dir.join("missing.dsl"));
        assert!(matches!(missing, Err(CompileError::Io(_))));
    }
}
