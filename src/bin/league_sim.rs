//! League Simulator CLI
//!
//! Plays a double round-robin season and prints results, the table and the
//! championship forecast.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use league_core::{
    make_rng, simulate_title_odds, CompetitorRecord, LeagueState, MatchResult, Prediction, Roster,
    SeasonStatus, SimulationConfig, TitleOdds,
};

#[derive(Parser)]
#[command(name = "league_sim")]
#[command(about = "Simulate a round-robin league season", long_about = None)]
struct Cli {
    /// Roster CSV file (name,strength per line); defaults to the four-club roster
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Seed for a reproducible season
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds to play; plays the whole season when omitted
    #[arg(long)]
    rounds: Option<usize>,

    /// Simulation config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Monte Carlo playouts for title odds (0 to skip)
    #[arg(long, default_value_t = 0)]
    simulations: usize,

    /// Emit a JSON report instead of text
    #[arg(long, default_value = "false")]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    status: SeasonStatus,
    current_round: usize,
    total_rounds: usize,
    results: Vec<MatchResult>,
    standings: Vec<CompetitorRecord>,
    predictions: Vec<Prediction>,
    title_odds: Option<Vec<TitleOdds>>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let roster = match &cli.roster {
        Some(path) => Roster::read_from_file(path)
            .with_context(|| format!("reading roster {}", path.display()))?,
        None => Roster::default_roster(),
    };
    let config = match &cli.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut rng = make_rng(cli.seed);
    let mut league = LeagueState::new(1, roster, config, &mut rng)?;

    let rounds = cli
        .rounds
        .unwrap_or(league.total_rounds())
        .min(league.total_rounds());
    info!("playing {} of {} rounds", rounds, league.total_rounds());

    for _ in 0..rounds {
        league.advance_one_round(&mut rng)?;
    }

    let title_odds = if cli.simulations > 0 {
        let forecast_seed = cli.seed.map(|s| s.wrapping_add(1));
        Some(simulate_title_odds(&league, cli.simulations, forecast_seed, 0.95)?)
    } else {
        None
    };

    let report = Report {
        status: league.status(),
        current_round: league.current_round(),
        total_rounds: league.total_rounds(),
        results: league.results().to_vec(),
        standings: league.current_ranking(),
        predictions: league.predict_championship(),
        title_odds,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    let mut round = 0;
    for result in &report.results {
        if result.round != round {
            round = result.round;
            println!("Round {}", round);
        }
        println!(
            "  {:<20} {} - {}  {}",
            result.home, result.home_score, result.away_score, result.away
        );
    }

    println!();
    println!(
        "{:?} after round {}/{}",
        report.status, report.current_round, report.total_rounds
    );
    println!(
        "{:>3} {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "Pos", "Competitor", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for (i, r) in report.standings.iter().enumerate() {
        println!(
            "{:>3} {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
            i + 1,
            r.name,
            r.played,
            r.won,
            r.drawn,
            r.lost,
            r.goals_for,
            r.goals_against,
            r.goal_difference,
            r.points
        );
    }

    println!();
    println!("Championship prediction");
    for p in &report.predictions {
        println!("  {:<20} {:>5.1}%", p.name, p.percentage);
    }

    if let Some(odds) = &report.title_odds {
        println!();
        println!("Title odds (95% interval)");
        for o in odds {
            println!(
                "  {:<20} {:>5.1}%  [{:.1}, {:.1}]",
                o.name,
                o.probability * 100.0,
                o.lower_bound * 100.0,
                o.upper_bound * 100.0
            );
        }
    }
}
