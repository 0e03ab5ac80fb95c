use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;

/// Strength used for a single match.
///
/// `base × home_advantage × (1 + form_bonus)`, where the home advantage only
/// applies to the home side and `form_bonus` is the signed adjustment from
/// the competitor's previous result.
pub fn effective_strength(
    base_strength: u32,
    is_home: bool,
    form_bonus: f64,
    config: &SimulationConfig,
) -> f64 {
    let mut strength = base_strength as f64;
    if is_home {
        strength *= config.home_advantage;
    }
    strength * (1.0 + form_bonus)
}

/// Probability of the home side winning a decisive match.
///
/// Returns 0.5 when both strengths are zero.
pub fn home_win_probability(home_effective: f64, away_effective: f64) -> f64 {
    let total = home_effective + away_effective;
    if total <= 0.0 {
        return 0.5;
    }
    home_effective / total
}

/// Chance of a draw, shrinking linearly with the strength gap down to the floor.
pub fn draw_chance(home_effective: f64, away_effective: f64, config: &SimulationConfig) -> f64 {
    let gap = (home_effective - away_effective).abs();
    (config.base_draw_chance - gap * config.draw_chance_decay).max(config.min_draw_chance)
}

/// Analytic outcome distribution of one match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

/// Outcome distribution under the match model: the draw is decided first,
/// otherwise the winner is picked by strength share.
pub fn outcome_probabilities(
    home_effective: f64,
    away_effective: f64,
    config: &SimulationConfig,
) -> OutcomeProbabilities {
    let draw = draw_chance(home_effective, away_effective, config);
    let p_home = home_win_probability(home_effective, away_effective);

    OutcomeProbabilities {
        home_win: (1.0 - draw) * p_home,
        draw,
        away_win: (1.0 - draw) * (1.0 - p_home),
    }
}
