//! Declarative bidding conventions: compile convention text into a
//! `BiddingSystem`, pick calls for a hand, and infer what an auction says
//! about each seat.

pub mod constraints;
pub mod engine;
pub mod error;
pub mod rule;
pub mod system;
pub mod trace;
pub mod translator;
pub mod trigger;

pub use constraints::{HandConstraints, Range};
pub use engine::{format_estimate, Engine, Estimate, EstimateStep, TableContext};
pub use error::{CompileError, CompileResult};
pub use rule::{priority_for, Rule};
pub use system::BiddingSystem;
pub use trace::{BidTrace, RuleTrace};
pub use translator::SystemTranslator;
pub use trigger::{Adjacency, Step, Trigger};
