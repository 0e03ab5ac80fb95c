use log::info;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use crate::config::SimulationConfig;
use crate::error::{LeagueError, Result};
use crate::forecast::{simulate_title_odds, TitleOdds};
use crate::league::{make_rng, LeagueId, LeagueState};
use crate::match_sim::MatchResult;
use crate::prediction::Prediction;
use crate::roster::Roster;
use crate::schedule::{generate_schedule, validate_schedule, Round};
use crate::standings::CompetitorRecord;

/// Durable home of league state, keyed by league id.
///
/// `load` must observe every earlier `save` for the same id.
pub trait LeagueStore {
    fn load(&self, id: LeagueId) -> Result<LeagueState>;

    fn save(&mut self, state: LeagueState) -> Result<()>;

    /// Remove a league, returning its last saved state.
    fn remove(&mut self, id: LeagueId) -> Result<LeagueState>;

    fn next_id(&mut self) -> LeagueId;
}

/// Process-lifetime store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    leagues: HashMap<LeagueId, LeagueState>,
    last_id: LeagueId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }

    /// Stored league ids in ascending order.
    pub fn ids(&self) -> Vec<LeagueId> {
        let mut ids: Vec<LeagueId> = self.leagues.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl LeagueStore for MemoryStore {
    fn load(&self, id: LeagueId) -> Result<LeagueState> {
        self.leagues
            .get(&id)
            .cloned()
            .ok_or(LeagueError::UnknownLeague(id))
    }

    fn save(&mut self, state: LeagueState) -> Result<()> {
        self.leagues.insert(state.id(), state);
        Ok(())
    }

    fn remove(&mut self, id: LeagueId) -> Result<LeagueState> {
        self.leagues.remove(&id).ok_or(LeagueError::UnknownLeague(id))
    }

    fn next_id(&mut self) -> LeagueId {
        self.last_id += 1;
        self.last_id
    }
}

/// League operations over a store.
///
/// Every mutating call loads, changes and saves one league. Taking
/// `&mut self` keeps one advance per league in flight.
pub struct LeagueService<S: LeagueStore> {
    store: S,
    config: SimulationConfig,
    rng: ChaCha8Rng,
}

impl<S: LeagueStore> LeagueService<S> {
    pub fn new(store: S, config: SimulationConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        Ok(LeagueService {
            store,
            config,
            rng: make_rng(seed),
        })
    }

    /// Create a league with a freshly generated schedule and return its id.
    pub fn create_league(&mut self, roster: Roster) -> Result<LeagueId> {
        let id = self.store.next_id();
        let state = LeagueState::new(id, roster, self.config.clone(), &mut self.rng)?;
        self.store.save(state)?;
        Ok(id)
    }

    /// Schedule for a roster without creating a league.
    pub fn generate_schedule(&mut self, roster: &Roster) -> Result<Vec<Round>> {
        if roster.len() < 2 {
            return Err(LeagueError::InvalidRoster {
                count: roster.len(),
            });
        }
        let schedule = generate_schedule(roster.competitors(), &mut self.rng);
        validate_schedule(&schedule, roster)?;
        Ok(schedule)
    }

    pub fn advance_one_round(&mut self, id: LeagueId) -> Result<Vec<MatchResult>> {
        let mut state = self.store.load(id)?;
        let played = state.advance_one_round(&mut self.rng)?;
        self.store.save(state)?;
        Ok(played)
    }

    pub fn play_all_rounds(&mut self, id: LeagueId) -> Result<Vec<MatchResult>> {
        let mut state = self.store.load(id)?;
        let played = state.play_all_rounds(&mut self.rng)?;
        self.store.save(state)?;
        Ok(played)
    }

    pub fn current_ranking(&self, id: LeagueId) -> Result<Vec<CompetitorRecord>> {
        Ok(self.store.load(id)?.current_ranking())
    }

    pub fn predict_championship(&self, id: LeagueId) -> Result<Vec<Prediction>> {
        Ok(self.store.load(id)?.predict_championship())
    }

    pub fn title_odds(
        &mut self,
        id: LeagueId,
        n_simulations: usize,
        confidence_level: f64,
    ) -> Result<Vec<TitleOdds>> {
        let state = self.store.load(id)?;
        let seed = self.rng.gen::<u64>();
        simulate_title_odds(&state, n_simulations, Some(seed), confidence_level)
    }

    /// Reset records and history, keeping roster and schedule.
    pub fn clear_league(&mut self, id: LeagueId) -> Result<()> {
        let mut state = self.store.load(id)?;
        state.reset();
        self.store.save(state)
    }

    pub fn delete_league(&mut self, id: LeagueId) -> Result<()> {
        self.store.remove(id)?;
        info!("league {} deleted", id);
        Ok(())
    }

    pub fn league(&self, id: LeagueId) -> Result<LeagueState> {
        self.store.load(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::SeasonStatus;

    fn make_service() -> LeagueService<MemoryStore> {
        LeagueService::new(MemoryStore::new(), SimulationConfig::default(), Some(42)).unwrap()
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut service = make_service();
        let a = service.create_league(Roster::default_roster()).unwrap();
        let b = service.create_league(Roster::default_roster()).unwrap();
        assert_ne!(a, b);
        assert_eq!(service.store().ids(), vec![a, b]);
    }

    #[test]
    fn test_advance_persists() {
        let mut service = make_service();
        let id = service.create_league(Roster::default_roster()).unwrap();

        service.advance_one_round(id).unwrap();
        let state = service.league(id).unwrap();
        assert_eq!(state.current_round(), 1);
        assert_eq!(state.results().len(), 2);
    }

    #[test]
    fn test_leagues_are_independent() {
        let mut service = make_service();
        let a = service.create_league(Roster::default_roster()).unwrap();
        let b = service.create_league(Roster::default_roster()).unwrap();

        service.play_all_rounds(a).unwrap();
        assert_eq!(service.league(a).unwrap().status(), SeasonStatus::Complete);
        assert_eq!(service.league(b).unwrap().status(), SeasonStatus::NotStarted);
    }

    #[test]
    fn test_clear_and_delete() {
        let mut service = make_service();
        let id = service.create_league(Roster::default_roster()).unwrap();
        service.advance_one_round(id).unwrap();

        service.clear_league(id).unwrap();
        let ranking = service.current_ranking(id).unwrap();
        assert!(ranking.iter().all(|r| r.played == 0));

        service.delete_league(id).unwrap();
        assert!(matches!(
            service.current_ranking(id),
            Err(LeagueError::UnknownLeague(missing)) if missing == id
        ));
        assert!(service.delete_league(id).is_err());
    }

    #[test]
    fn test_generate_schedule_rejects_short_roster() {
        let mut service = make_service();
        let err = service.generate_schedule(&Roster::new()).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidRoster { count: 0 }));

        let schedule = service.generate_schedule(&Roster::default_roster()).unwrap();
        assert_eq!(schedule.len(), 6);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            home_advantage: 0.5,
            ..SimulationConfig::default()
        };
        assert!(LeagueService::new(MemoryStore::new(), config, None).is_err());
    }
}
