//! convbid: compile bidding conventions, pick calls and read auctions.

use anyhow::{Context, Result};
use bridge_cli::bidding_utils::*;
use bridge_cli::coverage::OpeningCoverage;
use bridge_core::{parse_calls, Call, Hand, Seat};
use bridge_engine::{BiddingSystem, Engine, SystemTranslator, TableContext};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// Bidding conventions as rules: forward call selection and backward
/// hand inference.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use -vv for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Choose a call for a hand
    Bid(BidArgs),
    /// Infer what each seat's calls promise
    Estimate(EstimateArgs),
    /// Deal a random hand, open it and read a sample auction
    Demo(DemoArgs),
    /// Compile a convention file and list its rules
    Check(CheckArgs),
    /// Open many random hands and report the distribution
    Coverage(CoverageArgs),
}

#[derive(Args, Debug)]
struct BidArgs {
    /// Convention file for our side
    #[arg(short, long, value_name = "FILE", env = "CONVBID_SYSTEM")]
    system: PathBuf,

    /// Hand, e.g. "SAKQJ HKQJ DQJ432 C2"
    #[arg(long)]
    hand: String,

    /// Calls so far, oldest first, e.g. "1C PASS 1S PASS"
    #[arg(long, default_value = "")]
    history: String,

    /// Our seat; enables switching to the opponents' convention on their turn
    #[arg(long)]
    seat: Option<Seat>,

    #[arg(long, default_value = "N")]
    dealer: Seat,

    /// Convention file for the other side (defaults to ours)
    #[arg(long, value_name = "FILE")]
    opponents: Option<PathBuf>,

    /// Show every rule considered
    #[arg(long, default_value_t = false)]
    trace: bool,

    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[arg(short, long, value_name = "FILE", env = "CONVBID_SYSTEM")]
    system: PathBuf,

    #[arg(long, value_name = "FILE")]
    opponents: Option<PathBuf>,

    #[arg(long)]
    history: String,

    #[arg(long, default_value = "N")]
    dealer: Seat,

    #[arg(long, default_value = "N")]
    seat: Seat,

    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[arg(short, long, value_name = "FILE", env = "CONVBID_SYSTEM")]
    system: PathBuf,

    /// Seed for a reproducible deal
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(short, long, value_name = "FILE", env = "CONVBID_SYSTEM")]
    system: PathBuf,
}

#[derive(Args, Debug)]
struct CoverageArgs {
    #[arg(short, long, value_name = "FILE", env = "CONVBID_SYSTEM")]
    system: PathBuf,

    /// Number of hands to deal
    #[arg(long, default_value_t = 1000)]
    hands: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    debug!("convbid v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Bid(args) => run_bid(args),
        Command::Estimate(args) => run_estimate(args),
        Command::Demo(args) => run_demo(args),
        Command::Check(args) => run_check(args),
        Command::Coverage(args) => run_coverage(args),
    }
}

fn load_system(path: &Path) -> Result<BiddingSystem> {
    if !path.exists() {
        anyhow::bail!("Convention file not found: {:?}", path);
    }
    SystemTranslator::new()
        .parse_file(path)
        .with_context(|| format!("Failed to compile {:?}", path))
}

fn load_opponents(path: Option<&PathBuf>, ours: &BiddingSystem) -> Result<BiddingSystem> {
    match path {
        Some(p) => load_system(p),
        None => Ok(ours.clone()),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn parse_history(history: &str) -> Result<Vec<Call>> {
    parse_calls(history).with_context(|| format!("Invalid auction: {:?}", history))
}

fn run_bid(args: BidArgs) -> Result<()> {
    let system = load_system(&args.system)?;
    let opponents = load_opponents(args.opponents.as_ref(), &system)?;
    let hand = Hand::parse(&args.hand).with_context(|| format!("Invalid hand: {:?}", args.hand))?;
    if !hand.is_complete() {
        anyhow::bail!("Hand must hold 13 distinct cards, got {}", hand.cards.len());
    }
    let history = parse_history(&args.history)?;
    let engine = Engine::new(system);

    let (rule, trace) = match args.seat {
        Some(my_seat) => {
            let table = TableContext {
                my_seat,
                dealer: args.dealer,
                opponents: &opponents,
            };
            (
                engine.select_rule_in_context(&history, &hand, table),
                args.trace
                    .then(|| engine.select_with_trace_in_context(&history, &hand, table)),
            )
        }
        None => (
            engine.select_rule(&history, &hand),
            args.trace.then(|| engine.select_with_trace(&history, &hand)),
        ),
    };
    let report = BidReport::new(rule, trace);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", format_hand_features(&hand));
    println!("{}", report.summary());
    if let Some(trace) = &report.trace {
        print!("{}", format_full_trace(trace));
    }
    Ok(())
}

fn run_estimate(args: EstimateArgs) -> Result<()> {
    let system = load_system(&args.system)?;
    let opponents = load_opponents(args.opponents.as_ref(), &system)?;
    let history = parse_history(&args.history)?;

    let estimate = Engine::estimate(&history, args.seat, args.dealer, &system, &opponents);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print!("{}", estimate);
    }
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let system = load_system(&args.system)?;
    let engine = Engine::new(system);

    let hand = Hand::random(&mut seeded_rng(args.seed));

    println!("{}", hand);
    print!("{}", format_hand_features(&hand));
    let report = BidReport::new(engine.select_rule(&[], &hand), None);
    println!("Opening: {}", report.summary());

    let sample = parse_history("1NT PASS PASS")?;
    info!("Reading sample auction 1NT PASS PASS, North deals");
    println!();
    print!("{}", engine.explain_auction(&sample, Seat::North));
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let system = load_system(&args.system)?;
    println!("{}: {} rules", system.name(), system.len());
    print!("{}", format_rules_table(&system));
    Ok(())
}

fn run_coverage(args: CoverageArgs) -> Result<()> {
    let system = load_system(&args.system)?;
    let engine = Engine::new(system);

    info!("Dealing {} hands for {}", args.hands, engine.system().name());
    let coverage = OpeningCoverage::random(&engine, args.hands, &mut seeded_rng(args.seed));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&coverage)?);
    } else {
        print!("{}", coverage.report());
    }
    Ok(())
}
