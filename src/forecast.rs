use log::debug;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;

use crate::error::{LeagueError, Result};
use crate::league::{make_rng, LeagueState};
use crate::match_sim::simulate_fixture;
use crate::standings::Standings;

/// Estimated probability of a competitor finishing the season top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TitleOdds {
    pub name: String,
    /// Simulations in which this competitor led the final table
    pub titles: usize,
    pub probability: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Monte Carlo title odds over the rest of the season.
///
/// Plays the remaining fixtures `n_simulations` times from the current state
/// and counts final-table leaders. Per-simulation seeds are drawn up front
/// from `seed`, so a seeded run is reproducible regardless of thread count.
/// Bounds are a normal-approximation interval at `confidence_level`,
/// clipped to `[0, 1]`.
///
/// # Arguments
/// * `state` - League to forecast; left untouched
/// * `n_simulations` - Number of season playouts
/// * `seed` - Optional seed for reproducibility
/// * `confidence_level` - Interval coverage, strictly between 0 and 1
///
/// # Returns
/// One entry per competitor, in current ranking order
pub fn simulate_title_odds(
    state: &LeagueState,
    n_simulations: usize,
    seed: Option<u64>,
    confidence_level: f64,
) -> Result<Vec<TitleOdds>> {
    if n_simulations == 0 {
        return Err(LeagueError::InvalidConfig(
            "at least one simulation is required".to_string(),
        ));
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(LeagueError::InvalidConfig(format!(
            "confidence level must be in (0, 1), got {}",
            confidence_level
        )));
    }

    let z = Normal::new(0.0, 1.0)
        .map_err(|e| LeagueError::InvalidConfig(e.to_string()))?
        .inverse_cdf(0.5 + confidence_level / 2.0);

    let mut rng = make_rng(seed);
    let seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen::<u64>()).collect();

    let champions = seeds
        .par_iter()
        .map(|&sim_seed| play_out(state, sim_seed))
        .collect::<Result<Vec<String>>>()?;

    let mut titles: HashMap<String, usize> = HashMap::new();
    for champion in champions {
        *titles.entry(champion).or_insert(0) += 1;
    }

    debug!(
        "league {}: {} playouts from round {}, {} distinct champions",
        state.id(),
        n_simulations,
        state.current_round(),
        titles.len()
    );

    let n = n_simulations as f64;
    Ok(state
        .current_ranking()
        .into_iter()
        .map(|record| {
            let count = titles.get(&record.name).copied().unwrap_or(0);
            let probability = count as f64 / n;
            let half_width = z * (probability * (1.0 - probability) / n).sqrt();
            TitleOdds {
                name: record.name,
                titles: count,
                probability,
                lower_bound: (probability - half_width).max(0.0),
                upper_bound: (probability + half_width).min(1.0),
            }
        })
        .collect())
}

/// Play the remaining fixtures on a scratch table and return the leader.
fn play_out(state: &LeagueState, seed: u64) -> Result<String> {
    let mut rng = make_rng(Some(seed));
    let mut history = state.results().to_vec();
    let mut standings: Standings = state.standings().clone();

    for fixture in state.remaining_fixtures() {
        let result = simulate_fixture(fixture, state.roster(), &history, state.config(), &mut rng)?;
        standings.fold(&result)?;
        history.push(result);
    }

    standings
        .rank()
        .into_iter()
        .next()
        .map(|leader| leader.name)
        .ok_or(LeagueError::InvalidRoster { count: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitor::Competitor;
    use crate::config::SimulationConfig;
    use crate::roster::Roster;

    fn make_league(roster: Roster) -> LeagueState {
        let mut rng = make_rng(Some(11));
        LeagueState::new(1, roster, SimulationConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let league = make_league(Roster::default_roster());
        let odds = simulate_title_odds(&league, 400, Some(42), 0.95).unwrap();

        assert_eq!(odds.len(), 4);
        let total: f64 = odds.iter().map(|o| o.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(odds.iter().map(|o| o.titles).sum::<usize>(), 400);

        for o in &odds {
            assert!(o.lower_bound <= o.probability && o.probability <= o.upper_bound);
            assert!(o.lower_bound >= 0.0 && o.upper_bound <= 1.0);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let league = make_league(Roster::default_roster());
        let a = simulate_title_odds(&league, 200, Some(7), 0.9).unwrap();
        let b = simulate_title_odds(&league, 200, Some(7), 0.9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_state_untouched() {
        let league = make_league(Roster::default_roster());
        simulate_title_odds(&league, 50, Some(1), 0.95).unwrap();
        assert_eq!(league.current_round(), 0);
        assert!(league.results().is_empty());
    }

    #[test]
    fn test_dominant_competitor_favoured() {
        let roster = Roster::from_competitors(vec![
            Competitor::new("Giant", 100).unwrap(),
            Competitor::new("Minnow A", 5).unwrap(),
            Competitor::new("Minnow B", 5).unwrap(),
            Competitor::new("Minnow C", 5).unwrap(),
        ])
        .unwrap();
        let league = make_league(roster);

        let odds = simulate_title_odds(&league, 300, Some(3), 0.95).unwrap();
        let giant = odds.iter().find(|o| o.name == "Giant").unwrap();
        assert!(giant.probability > 0.5, "giant odds {}", giant.probability);
    }

    #[test]
    fn test_complete_season_is_certain() {
        let mut league = make_league(Roster::default_roster());
        league.play_all_rounds(&mut make_rng(Some(5))).unwrap();
        let leader = league.current_ranking()[0].name.clone();

        let odds = simulate_title_odds(&league, 20, Some(5), 0.95).unwrap();
        assert_eq!(odds[0].name, leader);
        assert_eq!(odds[0].probability, 1.0);
        assert!(odds[1..].iter().all(|o| o.probability == 0.0));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let league = make_league(Roster::default_roster());
        assert!(simulate_title_odds(&league, 0, Some(1), 0.95).is_err());
        assert!(simulate_title_odds(&league, 10, Some(1), 1.0).is_err());
        assert!(simulate_title_odds(&league, 10, Some(1), 0.0).is_err());
    }
}
