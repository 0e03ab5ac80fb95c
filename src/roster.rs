use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::competitor::Competitor;
use crate::constants::DEFAULT_ROSTER;
use crate::error::{LeagueError, Result};

/// The competitors of one league, in insertion order.
///
/// Names are unique. A name -> position index is kept alongside the list so
/// lookups during simulation are O(1) instead of a scan per fixture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Competitor>", into = "Vec<Competitor>")]
pub struct Roster {
    competitors: Vec<Competitor>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Roster {
            competitors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a roster, rejecting duplicate names.
    pub fn from_competitors(competitors: Vec<Competitor>) -> Result<Self> {
        let mut roster = Roster::new();
        for competitor in competitors {
            roster.add(competitor)?;
        }
        Ok(roster)
    }

    /// Arsenal, Chelsea, Liverpool and Manchester City.
    pub fn default_roster() -> Self {
        let mut roster = Roster::new();
        for (name, strength) in DEFAULT_ROSTER {
            roster.index.insert(name.to_string(), roster.competitors.len());
            roster.competitors.push(Competitor {
                name: name.to_string(),
                strength,
            });
        }
        roster
    }

    /// Read competitors from a CSV file.
    /// Format: name,strength
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Read `name,strength` lines from any buffered reader.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut roster = Roster::new();

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() != 2 {
                return Err(LeagueError::Parse {
                    line: line_no,
                    message: format!("expected `name,strength`, got `{}`", line),
                });
            }

            let strength: u32 = parts[1].trim().parse().map_err(|e| LeagueError::Parse {
                line: line_no,
                message: format!("invalid strength: {}", e),
            })?;

            roster.add(Competitor::new(parts[0], strength)?)?;
        }

        Ok(roster)
    }

    /// Add a competitor at the end of the roster.
    pub fn add(&mut self, competitor: Competitor) -> Result<()> {
        if self.index.contains_key(&competitor.name) {
            return Err(LeagueError::DuplicateCompetitor(competitor.name));
        }
        self.index
            .insert(competitor.name.clone(), self.competitors.len());
        self.competitors.push(competitor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Competitor> {
        self.index.get(name).map(|&i| &self.competitors[i])
    }

    /// Lookup that fails with `UnknownCompetitor`.
    pub fn require(&self, name: &str) -> Result<&Competitor> {
        self.get(name)
            .ok_or_else(|| LeagueError::UnknownCompetitor(name.to_string()))
    }

    /// Position of a competitor in insertion order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.competitors.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}

impl TryFrom<Vec<Competitor>> for Roster {
    type Error = LeagueError;

    fn try_from(competitors: Vec<Competitor>) -> Result<Self> {
        Roster::from_competitors(competitors)
    }
}

impl From<Roster> for Vec<Competitor> {
    fn from(roster: Roster) -> Self {
        roster.competitors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_default_roster() {
        let roster = Roster::default_roster();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.get("Manchester City").unwrap().strength, 92);
        assert_eq!(roster.index_of("Chelsea"), Some(1));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut roster = Roster::default_roster();
        let err = roster.add(Competitor::new("Arsenal", 50).unwrap()).unwrap_err();
        assert!(matches!(err, LeagueError::DuplicateCompetitor(name) if name == "Arsenal"));
        assert_eq!(roster.len(), 4);
    }

    #[test]
    fn test_require_unknown() {
        let roster = Roster::default_roster();
        assert!(matches!(
            roster.require("Everton"),
            Err(LeagueError::UnknownCompetitor(_))
        ));
    }

    #[test]
    fn test_read_from_skips_blank_lines() {
        let input = "Leeds, 70\n\nBurnley,65\n";
        let roster = Roster::read_from(Cursor::new(input)).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("Leeds").unwrap().strength, 70);
    }

    #[test]
    fn test_read_from_reports_line() {
        let input = "Leeds,70\nBurnley\n";
        let err = Roster::read_from(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LeagueError::Parse { line: 2, .. }));

        let input = "Leeds,strong\n";
        let err = Roster::read_from(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LeagueError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Arsenal,90").unwrap();
        writeln!(file, "Chelsea,85").unwrap();

        let roster = Roster::read_from_file(file.path()).unwrap();
        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["Arsenal", "Chelsea"]);
    }

    #[test]
    fn test_serde_round_trip_rebuilds_index() {
        let roster = Roster::default_roster();
        let json = serde_json::to_string(&roster).unwrap();
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back.index_of("Liverpool"), Some(2));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[{"name":"A","strength":50},{"name":"A","strength":60}]"#;
        assert!(serde_json::from_str::<Roster>(json).is_err());
    }
}
