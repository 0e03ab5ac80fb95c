//! League Core - round-robin league simulation library.
//!
//! Schedules a double round-robin, simulates matches from competitor
//! strength, form and home advantage, folds results into a ranked table and
//! forecasts the champion. Optional Python bindings via PyO3 (feature
//! `python`).

pub mod competitor;
pub mod config;
pub mod constants;
pub mod error;
pub mod forecast;
pub mod league;
pub mod match_sim;
pub mod prediction;
pub mod roster;
pub mod schedule;
pub mod standings;
pub mod store;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

pub use competitor::Competitor;
pub use config::SimulationConfig;
pub use constants::{POINTS_FOR_DRAW, POINTS_FOR_LOSS, POINTS_FOR_WIN};
pub use error::{LeagueError, Result};
pub use forecast::{simulate_title_odds, TitleOdds};
pub use league::{make_rng, LeagueId, LeagueState, SeasonStatus};
pub use match_sim::{simulate_fixture, simulate_match, FormResult, MatchResult};
pub use prediction::{predict_championship, Prediction};
pub use roster::Roster;
pub use schedule::{generate_schedule, Fixture, Round};
pub use standings::{CompetitorRecord, Standings};
pub use store::{LeagueService, LeagueStore, MemoryStore};
pub use win_prob::{home_win_probability, outcome_probabilities, OutcomeProbabilities};
