/// Points for a win
pub const POINTS_FOR_WIN: u32 = 3;

/// Points for a draw
pub const POINTS_FOR_DRAW: u32 = 1;

/// Points for a loss
pub const POINTS_FOR_LOSS: u32 = 0;

/// Valid range of a competitor's strength rating
pub const MIN_STRENGTH: u32 = 1;
pub const MAX_STRENGTH: u32 = 100;

/// Multiplicative boost applied to the home side's strength
pub const HOME_ADVANTAGE: f64 = 1.1;

/// Strength adjustment after a win (added) or a loss (subtracted)
pub const FORM_BONUS: f64 = 0.05;

/// Draw chance between two evenly matched sides
pub const BASE_DRAW_CHANCE: f64 = 0.20;

/// Draw chance lost per point of effective strength gap
pub const DRAW_CHANCE_DECAY: f64 = 0.05;

/// Floor for the draw chance
pub const MIN_DRAW_CHANCE: f64 = 0.05;

/// Score caps
pub const WINNER_MAX_GOALS: u32 = 5;
pub const LOSER_MAX_GOALS: u32 = 3;
pub const DRAW_MAX_GOALS: u32 = 2;

/// Effective strength per base goal for the winner/loser and for draws
pub const STRENGTH_PER_GOAL: f64 = 20.0;
pub const DRAW_STRENGTH_PER_GOAL: f64 = 25.0;

/// Strength gap per bonus goal for the winner and per penalty goal for the loser
pub const WINNER_GAP_PER_GOAL: f64 = 10.0;
pub const LOSER_GAP_PER_GOAL: f64 = 15.0;

/// Championship prediction multipliers by current position
pub const LEADER_MULTIPLIER: f64 = 1.3;
pub const RUNNER_UP_MULTIPLIER: f64 = 1.1;
pub const BOTTOM_MULTIPLIER: f64 = 0.7;

/// Roster used when none is supplied
pub const DEFAULT_ROSTER: [(&str, u32); 4] = [
    ("Arsenal", 90),
    ("Chelsea", 85),
    ("Liverpool", 88),
    ("Manchester City", 92),
];
