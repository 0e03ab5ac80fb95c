use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::competitor::Competitor;
use crate::config::SimulationConfig;
use crate::constants::{
    DRAW_STRENGTH_PER_GOAL, LOSER_GAP_PER_GOAL, STRENGTH_PER_GOAL, WINNER_GAP_PER_GOAL,
};
use crate::error::Result;
use crate::roster::Roster;
use crate::schedule::Fixture;
use crate::win_prob::{draw_chance, effective_strength, home_win_probability};

/// A competitor's result in one match, seen from its side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

impl FormResult {
    /// Signed strength adjustment carried into the next match.
    pub fn bonus(self, config: &SimulationConfig) -> f64 {
        match self {
            FormResult::Win => config.form_bonus,
            FormResult::Loss => -config.form_bonus,
            FormResult::Draw => 0.0,
        }
    }
}

/// A played fixture. Append-only once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub round: usize,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
}

impl MatchResult {
    /// The fixture this result was played for.
    pub fn fixture(&self) -> Fixture {
        Fixture {
            round: self.round,
            home: self.home.clone(),
            away: self.away.clone(),
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.home == name || self.away == name
    }

    pub fn is_draw(&self) -> bool {
        self.home_score == self.away_score
    }

    /// Name of the winning side, `None` for a draw.
    pub fn winner(&self) -> Option<&str> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(&self.home),
            std::cmp::Ordering::Less => Some(&self.away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Result from `name`'s point of view, `None` if it did not play.
    pub fn result_for(&self, name: &str) -> Option<FormResult> {
        let (scored, conceded) = if self.home == name {
            (self.home_score, self.away_score)
        } else if self.away == name {
            (self.away_score, self.home_score)
        } else {
            return None;
        };

        Some(match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => FormResult::Win,
            std::cmp::Ordering::Equal => FormResult::Draw,
            std::cmp::Ordering::Less => FormResult::Loss,
        })
    }
}

/// Most recent result of `name`, scanning history newest first.
pub fn last_result(name: &str, history: &[MatchResult]) -> Option<FormResult> {
    history.iter().rev().find_map(|m| m.result_for(name))
}

/// Form adjustment for `name`: +bonus after a win, -bonus after a loss, 0 otherwise.
pub fn form_bonus(name: &str, history: &[MatchResult], config: &SimulationConfig) -> f64 {
    last_result(name, history)
        .map(|r| r.bonus(config))
        .unwrap_or(0.0)
}

/// Simulate one match.
///
/// The draw is decided first with a chance that shrinks as the effective
/// strength gap grows. Otherwise the winner is drawn by strength share and
/// both scores are generated from effective strength and the gap, then
/// clamped. The winner always ends strictly ahead.
///
/// Pure apart from consuming `rng`: the caller appends the result to history.
pub fn simulate_match<R: Rng>(
    home: &Competitor,
    away: &Competitor,
    round: usize,
    history: &[MatchResult],
    config: &SimulationConfig,
    rng: &mut R,
) -> MatchResult {
    let home_strength = effective_strength(
        home.strength,
        true,
        form_bonus(&home.name, history, config),
        config,
    );
    let away_strength = effective_strength(
        away.strength,
        false,
        form_bonus(&away.name, history, config),
        config,
    );

    let (home_score, away_score) =
        if rng.gen::<f64>() < draw_chance(home_strength, away_strength, config) {
            let score = draw_score((home_strength + away_strength) / 2.0, config, rng);
            (score, score)
        } else if rng.gen::<f64>() < home_win_probability(home_strength, away_strength) {
            decisive_scores(home_strength, away_strength, config, rng)
        } else {
            let (away_score, home_score) =
                decisive_scores(away_strength, home_strength, config, rng);
            (home_score, away_score)
        };

    debug!(
        "round {}: {} {}-{} {} (strength {:.1} v {:.1})",
        round, home.name, home_score, away_score, away.name, home_strength, away_strength
    );

    MatchResult {
        round,
        home: home.name.clone(),
        away: away.name.clone(),
        home_score,
        away_score,
    }
}

/// Simulate a scheduled fixture, resolving both sides through the roster index.
pub fn simulate_fixture<R: Rng>(
    fixture: &Fixture,
    roster: &Roster,
    history: &[MatchResult],
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<MatchResult> {
    let home = roster.require(&fixture.home)?;
    let away = roster.require(&fixture.away)?;
    Ok(simulate_match(home, away, fixture.round, history, config, rng))
}

/// Scores for a decisive match as `(winner, loser)`.
fn decisive_scores<R: Rng>(
    winner_strength: f64,
    loser_strength: f64,
    config: &SimulationConfig,
    rng: &mut R,
) -> (u32, u32) {
    let gap = (winner_strength - loser_strength).max(0.0);

    let winner_base = (winner_strength / STRENGTH_PER_GOAL) as i64;
    let bonus = (gap / WINNER_GAP_PER_GOAL) as i64;
    // A winner scores at least once even under a zero cap
    let winner_cap = (config.winner_max_goals as i64).max(1);
    let winner = (winner_base + bonus + rng.gen_range(0..3)).clamp(1, winner_cap) as u32;

    let loser_base = (loser_strength / STRENGTH_PER_GOAL) as i64;
    let penalty = (gap / LOSER_GAP_PER_GOAL) as i64;
    let loser =
        (loser_base - penalty + rng.gen_range(0..2)).clamp(0, config.loser_max_goals as i64) as u32;

    (winner, loser.min(winner - 1))
}

fn draw_score<R: Rng>(average_strength: f64, config: &SimulationConfig, rng: &mut R) -> u32 {
    let base = (average_strength / DRAW_STRENGTH_PER_GOAL) as i64;
    (base + rng.gen_range(0..3)).clamp(0, config.draw_max_goals as i64) as u32
}
