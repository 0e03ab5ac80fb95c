use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::competitor::Competitor;
use crate::config::SimulationConfig;
use crate::error::LeagueError;
use crate::forecast::simulate_title_odds;
use crate::league::{make_rng, LeagueState, SeasonStatus};
use crate::match_sim::{self, MatchResult};
use crate::prediction;
use crate::roster::Roster;
use crate::schedule;
use crate::standings::CompetitorRecord;

impl From<LeagueError> for PyErr {
    fn from(err: LeagueError) -> PyErr {
        match err {
            LeagueError::Io(_) => PyIOError::new_err(err.to_string()),
            LeagueError::SeasonExhausted | LeagueError::ScheduleInconsistency(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// (round, home, away, home_score, away_score)
type PyMatch = (usize, String, String, u32, u32);

/// (name, played, won, drawn, lost, goals_for, goals_against, goal_difference, points)
type PyRecord = (String, u32, u32, u32, u32, u32, u32, i32, u32);

fn to_py_match(result: MatchResult) -> PyMatch {
    (
        result.round,
        result.home,
        result.away,
        result.home_score,
        result.away_score,
    )
}

fn to_py_record(record: CompetitorRecord) -> PyRecord {
    (
        record.name,
        record.played,
        record.won,
        record.drawn,
        record.lost,
        record.goals_for,
        record.goals_against,
        record.goal_difference,
        record.points,
    )
}

fn to_roster(competitors: Vec<PyCompetitor>) -> Result<Roster, LeagueError> {
    Roster::from_competitors(competitors.into_iter().map(|c| c.inner).collect())
}

/// League member exposed to Python.
#[pyclass(name = "Competitor")]
#[derive(Clone, Debug)]
pub struct PyCompetitor {
    inner: Competitor,
}

#[pymethods]
impl PyCompetitor {
    #[new]
    pub fn new(name: String, strength: u32) -> PyResult<Self> {
        Ok(PyCompetitor {
            inner: Competitor::new(name, strength)?,
        })
    }

    #[getter]
    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    #[getter]
    pub fn strength(&self) -> u32 {
        self.inner.strength
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Competitor({:?}, {})", self.inner.name, self.inner.strength)
    }
}

/// A league with its own random source.
#[pyclass(name = "League")]
pub struct PyLeague {
    state: LeagueState,
    rng: ChaCha8Rng,
}

#[pymethods]
impl PyLeague {
    /// Create a league; without competitors the default four-club roster is used.
    #[new]
    #[pyo3(signature = (competitors = None, seed = None, config_json = None))]
    pub fn new(
        competitors: Option<Vec<PyCompetitor>>,
        seed: Option<u64>,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let roster = match competitors {
            Some(c) => to_roster(c)?,
            None => Roster::default_roster(),
        };
        let config = match config_json {
            Some(json) => SimulationConfig::from_json_str(json)?,
            None => SimulationConfig::default(),
        };

        let mut rng = make_rng(seed);
        let state = LeagueState::new(1, roster, config, &mut rng)?;
        Ok(PyLeague { state, rng })
    }

    pub fn advance_one_round(&mut self) -> PyResult<Vec<PyMatch>> {
        let played = self.state.advance_one_round(&mut self.rng)?;
        Ok(played.into_iter().map(to_py_match).collect())
    }

    pub fn play_all_rounds(&mut self) -> PyResult<Vec<PyMatch>> {
        let played = self.state.play_all_rounds(&mut self.rng)?;
        Ok(played.into_iter().map(to_py_match).collect())
    }

    /// Ranked table rows.
    pub fn standings(&self) -> Vec<PyRecord> {
        self.state
            .current_ranking()
            .into_iter()
            .map(to_py_record)
            .collect()
    }

    pub fn predict_championship(&self) -> Vec<(String, f64)> {
        self.state
            .predict_championship()
            .into_iter()
            .map(|p| (p.name, p.percentage))
            .collect()
    }

    /// Fixtures of a 1-based round as (home, away) pairs.
    pub fn fixtures(&self, round: usize) -> Vec<(String, String)> {
        self.state
            .fixtures_for_round(round)
            .unwrap_or_default()
            .iter()
            .map(|f| (f.home.clone(), f.away.clone()))
            .collect()
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.state.position_of(name)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    #[getter]
    pub fn status(&self) -> &'static str {
        match self.state.status() {
            SeasonStatus::NotStarted => "Not Started",
            SeasonStatus::InProgress => "In Progress",
            SeasonStatus::Complete => "Season Complete",
        }
    }

    #[getter]
    pub fn current_round(&self) -> usize {
        self.state.current_round()
    }

    #[getter]
    pub fn total_rounds(&self) -> usize {
        self.state.total_rounds()
    }

    pub fn to_json(&self) -> PyResult<String> {
        Ok(serde_json::to_string(&self.state).map_err(LeagueError::from)?)
    }

    fn __repr__(&self) -> String {
        format!(
            "League({} competitors, round {}/{})",
            self.state.roster().len(),
            self.state.current_round(),
            self.state.total_rounds()
        )
    }
}

/// Double round-robin schedule as (round, home, away) tuples.
#[pyfunction]
#[pyo3(signature = (competitors, seed = None))]
fn generate_schedule(
    competitors: Vec<PyCompetitor>,
    seed: Option<u64>,
) -> PyResult<Vec<(usize, String, String)>> {
    let roster = to_roster(competitors)?;
    if roster.len() < 2 {
        return Err(LeagueError::InvalidRoster {
            count: roster.len(),
        }
        .into());
    }

    let mut rng = make_rng(seed);
    let rounds = schedule::generate_schedule(roster.competitors(), &mut rng);
    schedule::validate_schedule(&rounds, &roster)?;

    Ok(rounds
        .into_iter()
        .flatten()
        .map(|f| (f.round, f.home, f.away))
        .collect())
}

/// Simulate a single match with no form history; returns (home_score, away_score).
#[pyfunction]
#[pyo3(signature = (home, away, seed = None))]
fn simulate_match(home: &PyCompetitor, away: &PyCompetitor, seed: Option<u64>) -> (u32, u32) {
    let mut rng = make_rng(seed);
    let result = match_sim::simulate_match(
        &home.inner,
        &away.inner,
        1,
        &[],
        &SimulationConfig::default(),
        &mut rng,
    );
    (result.home_score, result.away_score)
}

/// Championship percentages from (name, points) pairs in ranking order.
#[pyfunction]
fn predict_championship(ranking: Vec<(String, u32)>) -> Vec<(String, f64)> {
    let records: Vec<CompetitorRecord> = ranking
        .into_iter()
        .map(|(name, points)| CompetitorRecord {
            points,
            ..CompetitorRecord::new(name)
        })
        .collect();

    prediction::predict_championship(&records)
        .into_iter()
        .map(|p| (p.name, p.percentage))
        .collect()
}

/// Monte Carlo title odds as (name, probability, lower, upper).
#[pyfunction]
#[pyo3(signature = (league, n_simulations = 1000, seed = None, confidence_level = 0.95))]
fn title_odds(
    league: &PyLeague,
    n_simulations: usize,
    seed: Option<u64>,
    confidence_level: f64,
) -> PyResult<Vec<(String, f64, f64, f64)>> {
    let odds = simulate_title_odds(&league.state, n_simulations, seed, confidence_level)?;
    Ok(odds
        .into_iter()
        .map(|o| (o.name, o.probability, o.lower_bound, o.upper_bound))
        .collect())
}

/// Python module definition
#[pymodule]
fn league_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCompetitor>()?;
    m.add_class::<PyLeague>()?;

    m.add_function(wrap_pyfunction!(generate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_match, m)?)?;
    m.add_function(wrap_pyfunction!(predict_championship, m)?)?;
    m.add_function(wrap_pyfunction!(title_odds, m)?)?;

    m.add("POINTS_FOR_WIN", crate::constants::POINTS_FOR_WIN)?;
    m.add("POINTS_FOR_DRAW", crate::constants::POINTS_FOR_DRAW)?;
    m.add("HOME_ADVANTAGE", crate::constants::HOME_ADVANTAGE)?;

    Ok(())
}
