use log::{error, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::SimulationConfig;
use crate::error::{LeagueError, Result};
use crate::match_sim::{simulate_fixture, MatchResult};
use crate::prediction::{predict_championship, Prediction};
use crate::roster::Roster;
use crate::schedule::{generate_schedule, validate_round, validate_schedule, Fixture, Round};
use crate::standings::{CompetitorRecord, Standings};

/// Identifier of a league in a store.
pub type LeagueId = u64;

/// Seeded RNG for reproducible runs, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    NotStarted,
    InProgress,
    Complete,
}

/// Everything one league needs: roster, schedule, history and table.
///
/// Passed explicitly into every operation; several leagues can live side by
/// side. Advancing needs `&mut self`, so at most one advance per league is in
/// flight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeagueState {
    id: LeagueId,
    roster: Roster,
    schedule: Vec<Round>,
    results: Vec<MatchResult>,
    standings: Standings,
    /// Number of completed rounds
    current_round: usize,
    config: SimulationConfig,
}

impl LeagueState {
    /// Create a league and generate its schedule.
    pub fn new<R: Rng>(
        id: LeagueId,
        roster: Roster,
        config: SimulationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if roster.len() < 2 {
            return Err(LeagueError::InvalidRoster {
                count: roster.len(),
            });
        }
        config.validate()?;

        let schedule = generate_schedule(roster.competitors(), rng);
        validate_schedule(&schedule, &roster)?;

        info!(
            "league {} created: {} competitors, {} rounds",
            id,
            roster.len(),
            schedule.len()
        );

        Ok(LeagueState {
            id,
            standings: Standings::new(&roster),
            roster,
            schedule,
            results: Vec::new(),
            current_round: 0,
            config,
        })
    }

    /// Rebuild a league from persisted parts.
    ///
    /// Standings are recomputed by folding `results`, which must cover whole
    /// rounds from the start of the schedule.
    pub fn restore(
        id: LeagueId,
        roster: Roster,
        schedule: Vec<Round>,
        results: Vec<MatchResult>,
        config: SimulationConfig,
    ) -> Result<Self> {
        if roster.len() < 2 {
            return Err(LeagueError::InvalidRoster {
                count: roster.len(),
            });
        }
        config.validate()?;
        validate_schedule(&schedule, &roster)?;

        let mut current_round = 0;
        let mut covered = 0;
        while current_round < schedule.len()
            && covered + schedule[current_round].len() <= results.len()
        {
            covered += schedule[current_round].len();
            current_round += 1;
        }
        if covered != results.len() {
            return Err(LeagueError::ScheduleInconsistency(format!(
                "{} stored results do not cover whole rounds",
                results.len()
            )));
        }

        let mut seen: HashSet<(usize, &str, &str)> = HashSet::with_capacity(results.len());
        for result in &results {
            let scheduled = result.round >= 1
                && result.round <= current_round
                && schedule[result.round - 1].contains(&result.fixture());
            if !scheduled {
                return Err(LeagueError::ScheduleInconsistency(format!(
                    "{} v {} in round {} is not a scheduled fixture",
                    result.home, result.away, result.round
                )));
            }
            if !seen.insert((result.round, result.home.as_str(), result.away.as_str())) {
                return Err(LeagueError::ScheduleInconsistency(format!(
                    "{} v {} in round {} is stored twice",
                    result.home, result.away, result.round
                )));
            }
        }

        let mut standings = Standings::new(&roster);
        standings.fold_all(&results)?;

        Ok(LeagueState {
            id,
            roster,
            schedule,
            results,
            standings,
            current_round,
            config,
        })
    }

    /// Simulate every fixture of the next round and fold the results.
    ///
    /// The round is applied as a whole: on error nothing changes.
    pub fn advance_one_round<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<MatchResult>> {
        let Some(round) = self.schedule.get(self.current_round) else {
            warn!("league {}: no rounds left to play", self.id);
            return Err(LeagueError::SeasonExhausted);
        };

        if let Err(e) = validate_round(round, self.roster.len()) {
            error!("league {}: {}", self.id, e);
            return Err(e);
        }

        let mut played = Vec::with_capacity(round.len());
        for fixture in round {
            played.push(simulate_fixture(
                fixture,
                &self.roster,
                &self.results,
                &self.config,
                rng,
            )?);
        }

        let mut standings = self.standings.clone();
        standings.fold_all(&played)?;

        self.standings = standings;
        self.results.extend(played.iter().cloned());
        self.current_round += 1;

        info!(
            "league {}: round {}/{} played",
            self.id,
            self.current_round,
            self.schedule.len()
        );

        Ok(played)
    }

    /// Play every remaining round, returning all results produced.
    pub fn play_all_rounds<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<MatchResult>> {
        if self.is_complete() {
            warn!("league {}: season already complete", self.id);
            return Err(LeagueError::SeasonExhausted);
        }

        let mut played = Vec::new();
        while !self.is_complete() {
            played.extend(self.advance_one_round(rng)?);
        }
        Ok(played)
    }

    /// Current table, recomputed from the records.
    pub fn current_ranking(&self) -> Vec<CompetitorRecord> {
        self.standings.rank()
    }

    pub fn predict_championship(&self) -> Vec<Prediction> {
        predict_championship(&self.current_ranking())
    }

    /// 1-based table position of a competitor.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.standings.position_of(name)
    }

    /// Clear history and records, keeping roster and schedule.
    pub fn reset(&mut self) {
        self.results.clear();
        self.standings.reset();
        self.current_round = 0;
        info!("league {} reset", self.id);
    }

    pub fn status(&self) -> SeasonStatus {
        if self.current_round == 0 {
            SeasonStatus::NotStarted
        } else if self.is_complete() {
            SeasonStatus::Complete
        } else {
            SeasonStatus::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_round >= self.schedule.len()
    }

    /// Fixtures of a 1-based round.
    pub fn fixtures_for_round(&self, round: usize) -> Option<&[Fixture]> {
        round
            .checked_sub(1)
            .and_then(|i| self.schedule.get(i))
            .map(Vec::as_slice)
    }

    /// Results of a 1-based round; empty if it has not been played.
    pub fn results_for_round(&self, round: usize) -> Vec<&MatchResult> {
        self.results.iter().filter(|r| r.round == round).collect()
    }

    /// Fixtures not played yet, in schedule order.
    pub fn remaining_fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.schedule[self.current_round.min(self.schedule.len())..]
            .iter()
            .flatten()
    }

    pub fn id(&self) -> LeagueId {
        self.id
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn total_rounds(&self) -> usize {
        self.schedule.len()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn schedule(&self) -> &[Round] {
        &self.schedule
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn standings(&self) -> &Standings {
        &self.standings
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitor::Competitor;

    fn make_league(seed: u64) -> LeagueState {
        let mut rng = make_rng(Some(seed));
        LeagueState::new(1, Roster::default_roster(), SimulationConfig::default(), &mut rng)
            .unwrap()
    }

    #[test]
    fn test_rejects_single_competitor() {
        let roster = Roster::from_competitors(vec![Competitor::new("A", 50).unwrap()]).unwrap();
        let mut rng = make_rng(Some(1));
        let err = LeagueState::new(1, roster, SimulationConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidRoster { count: 1 }));
    }

    #[test]
    fn test_advance_one_round() {
        let mut league = make_league(42);
        assert_eq!(league.status(), SeasonStatus::NotStarted);

        let mut rng = make_rng(Some(1));
        let played = league.advance_one_round(&mut rng).unwrap();

        assert_eq!(played.len(), 2);
        assert!(played.iter().all(|r| r.round == 1));
        assert_eq!(league.current_round(), 1);
        assert_eq!(league.status(), SeasonStatus::InProgress);

        let played_total: u32 = league.current_ranking().iter().map(|r| r.played).sum();
        assert_eq!(played_total, 4);
    }

    #[test]
    fn test_season_exhausted() {
        let mut league = make_league(42);
        let mut rng = make_rng(Some(2));

        let all = league.play_all_rounds(&mut rng).unwrap();
        assert_eq!(all.len(), 12);
        assert_eq!(league.status(), SeasonStatus::Complete);

        assert!(matches!(
            league.advance_one_round(&mut rng),
            Err(LeagueError::SeasonExhausted)
        ));
        assert!(matches!(
            league.play_all_rounds(&mut rng),
            Err(LeagueError::SeasonExhausted)
        ));
    }

    #[test]
    fn test_same_seeds_same_season() {
        let mut a = make_league(9);
        let mut b = make_league(9);
        a.play_all_rounds(&mut make_rng(Some(3))).unwrap();
        b.play_all_rounds(&mut make_rng(Some(3))).unwrap();
        assert_eq!(a.results(), b.results());
        assert_eq!(a.current_ranking(), b.current_ranking());
    }

    #[test]
    fn test_round_queries() {
        let mut league = make_league(4);
        league.advance_one_round(&mut make_rng(Some(5))).unwrap();

        assert_eq!(league.fixtures_for_round(1).unwrap().len(), 2);
        assert!(league.fixtures_for_round(0).is_none());
        assert!(league.fixtures_for_round(7).is_none());
        assert_eq!(league.results_for_round(1).len(), 2);
        assert!(league.results_for_round(2).is_empty());
        assert_eq!(league.remaining_fixtures().count(), 10);
    }

    #[test]
    fn test_reset() {
        let mut league = make_league(4);
        league.play_all_rounds(&mut make_rng(Some(6))).unwrap();
        let schedule = league.schedule().to_vec();

        league.reset();
        assert_eq!(league.status(), SeasonStatus::NotStarted);
        assert!(league.results().is_empty());
        assert_eq!(league.standings().total_points(), 0);
        assert_eq!(league.schedule(), schedule.as_slice());
    }

    #[test]
    fn test_restore_rebuilds_standings() {
        let mut league = make_league(12);
        let mut rng = make_rng(Some(8));
        league.advance_one_round(&mut rng).unwrap();
        league.advance_one_round(&mut rng).unwrap();

        let restored = LeagueState::restore(
            league.id(),
            league.roster().clone(),
            league.schedule().to_vec(),
            league.results().to_vec(),
            SimulationConfig::default(),
        )
        .unwrap();

        assert_eq!(restored.current_round(), 2);
        assert_eq!(restored.current_ranking(), league.current_ranking());
    }

    #[test]
    fn test_restore_rejects_partial_round() {
        let mut league = make_league(12);
        league.advance_one_round(&mut make_rng(Some(8))).unwrap();
        let mut results = league.results().to_vec();
        results.pop();

        let err = LeagueState::restore(
            1,
            league.roster().clone(),
            league.schedule().to_vec(),
            results,
            SimulationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LeagueError::ScheduleInconsistency(_)));
    }

    #[test]
    fn test_restore_rejects_duplicate_result() {
        let mut league = make_league(12);
        league.advance_one_round(&mut make_rng(Some(8))).unwrap();
        let mut results = league.results().to_vec();
        // Same count as a whole round, but the second fixture is never played
        results[1] = results[0].clone();

        let err = LeagueState::restore(
            1,
            league.roster().clone(),
            league.schedule().to_vec(),
            results,
            SimulationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LeagueError::ScheduleInconsistency(_)));
    }

    #[test]
    fn test_restore_rejects_unscheduled_result() {
        let league = make_league(12);
        let fixture = &league.schedule()[0][0];
        // Same pairing with venues swapped belongs to the second half of the season
        let bogus = vec![
            MatchResult {
                round: 1,
                home: fixture.away.clone(),
                away: fixture.home.clone(),
                home_score: 1,
                away_score: 0,
            },
            MatchResult {
                round: 1,
                home: league.schedule()[0][1].home.clone(),
                away: league.schedule()[0][1].away.clone(),
                home_score: 0,
                away_score: 0,
            },
        ];

        assert!(LeagueState::restore(
            1,
            league.roster().clone(),
            league.schedule().to_vec(),
            bogus,
            SimulationConfig::default(),
        )
        .is_err());
    }

    #[test]
    fn test_prediction_after_round() {
        let mut league = make_league(3);
        let before = league.predict_championship();
        assert!(before.iter().all(|p| (p.percentage - 25.0).abs() < 1e-9));

        league.advance_one_round(&mut make_rng(Some(4))).unwrap();
        let after = league.predict_championship();
        assert_eq!(after.len(), 4);
        assert_eq!(after[0].name, league.current_ranking()[0].name);
    }
}
