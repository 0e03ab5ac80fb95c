use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAX_STRENGTH, MIN_STRENGTH};
use crate::error::{LeagueError, Result};

/// League member with a static strength rating.
///
/// Immutable once a league is created; the simulator only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Competitor {
    /// Unique within a league
    pub name: String,

    /// Rating between 1 and 100
    pub strength: u32,
}

impl Competitor {
    /// Create a new Competitor, rejecting empty names and out-of-range strengths.
    pub fn new(name: impl Into<String>, strength: u32) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if !(MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
            return Err(LeagueError::InvalidStrength { name, strength });
        }
        Ok(Competitor { name, strength })
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name() {
        let c = Competitor::new("  Arsenal ", 90).unwrap();
        assert_eq!(c.name, "Arsenal");
        assert_eq!(c.strength, 90);
    }

    #[test]
    fn test_strength_bounds() {
        assert!(Competitor::new("A", 1).is_ok());
        assert!(Competitor::new("A", 100).is_ok());
        assert!(matches!(
            Competitor::new("A", 0),
            Err(LeagueError::InvalidStrength { strength: 0, .. })
        ));
        assert!(matches!(
            Competitor::new("A", 101),
            Err(LeagueError::InvalidStrength { strength: 101, .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(Competitor::new("   ", 50), Err(LeagueError::EmptyName)));
    }

    #[test]
    fn test_display() {
        let c = Competitor::new("Chelsea", 85).unwrap();
        assert_eq!(c.to_string(), "Chelsea (85)");
    }
}
