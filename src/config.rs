use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    BASE_DRAW_CHANCE, DRAW_CHANCE_DECAY, DRAW_MAX_GOALS, FORM_BONUS, HOME_ADVANTAGE,
    LOSER_MAX_GOALS, MIN_DRAW_CHANCE, WINNER_MAX_GOALS,
};
use crate::error::{LeagueError, Result};

/// Tunable parameters of the match model.
///
/// Missing fields fall back to the defaults in [`crate::constants`], so a
/// config file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier on the home side's strength (>= 1.0)
    pub home_advantage: f64,

    /// Strength adjustment after the previous result (+ after win, - after loss)
    pub form_bonus: f64,

    /// Draw chance when effective strengths are equal
    pub base_draw_chance: f64,

    /// Draw chance lost per point of effective strength gap
    pub draw_chance_decay: f64,

    /// Lower bound of the draw chance
    pub min_draw_chance: f64,

    pub winner_max_goals: u32,
    pub loser_max_goals: u32,
    pub draw_max_goals: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            home_advantage: HOME_ADVANTAGE,
            form_bonus: FORM_BONUS,
            base_draw_chance: BASE_DRAW_CHANCE,
            draw_chance_decay: DRAW_CHANCE_DECAY,
            min_draw_chance: MIN_DRAW_CHANCE,
            winner_max_goals: WINNER_MAX_GOALS,
            loser_max_goals: LOSER_MAX_GOALS,
            draw_max_goals: DRAW_MAX_GOALS,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.home_advantage,
            self.form_bonus,
            self.base_draw_chance,
            self.draw_chance_decay,
            self.min_draw_chance,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(LeagueError::InvalidConfig(
                "parameters must be finite numbers".to_string(),
            ));
        }
        if self.home_advantage < 1.0 {
            return Err(LeagueError::InvalidConfig(format!(
                "home_advantage must be >= 1.0, got {}",
                self.home_advantage
            )));
        }
        if !(0.0..1.0).contains(&self.form_bonus) {
            return Err(LeagueError::InvalidConfig(format!(
                "form_bonus must be in [0, 1), got {}",
                self.form_bonus
            )));
        }
        for (name, value) in [
            ("base_draw_chance", self.base_draw_chance),
            ("min_draw_chance", self.min_draw_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LeagueError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.min_draw_chance > self.base_draw_chance {
            return Err(LeagueError::InvalidConfig(
                "min_draw_chance must not exceed base_draw_chance".to_string(),
            ));
        }
        if self.draw_chance_decay < 0.0 {
            return Err(LeagueError::InvalidConfig(
                "draw_chance_decay must be non-negative".to_string(),
            ));
        }
        if self.winner_max_goals == 0 || self.loser_max_goals >= self.winner_max_goals {
            return Err(LeagueError::InvalidConfig(
                "winner_max_goals must be positive and above loser_max_goals".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"home_advantage": 1.05}"#).unwrap();
        assert!((config.home_advantage - 1.05).abs() < 1e-12);
        assert_eq!(config.winner_max_goals, WINNER_MAX_GOALS);
        assert!((config.base_draw_chance - BASE_DRAW_CHANCE).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_home_disadvantage() {
        let err = SimulationConfig::from_json_str(r#"{"home_advantage": 0.9}"#).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_inverted_draw_bounds() {
        let config = SimulationConfig {
            base_draw_chance: 0.1,
            min_draw_chance: 0.2,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SimulationConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, LeagueError::Json(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"draw_max_goals": 3, "min_draw_chance": 0.1}}"#).unwrap();

        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.draw_max_goals, 3);
        assert!((config.min_draw_chance - 0.1).abs() < 1e-12);
    }
}
