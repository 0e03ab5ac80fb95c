use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::constants::{POINTS_FOR_DRAW, POINTS_FOR_LOSS, POINTS_FOR_WIN};
use crate::error::{LeagueError, Result};
use crate::match_sim::MatchResult;
use crate::roster::Roster;

/// Cumulative statistics of one competitor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    pub goal_difference: i32,
}

impl CompetitorRecord {
    pub fn new(name: impl Into<String>) -> Self {
        CompetitorRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;

        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            Ordering::Less => {
                self.lost += 1;
                self.points += POINTS_FOR_LOSS;
            }
        }

        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
    }
}

/// Ranking order: points, then goal difference, then goals scored, all descending.
pub fn compare_records(a: &CompetitorRecord, b: &CompetitorRecord) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Per-league table of records, one per roster member.
///
/// Records are kept in roster order. Ranking uses a stable sort, so
/// competitors level on all three criteria stay in roster order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CompetitorRecord>", into = "Vec<CompetitorRecord>")]
pub struct Standings {
    records: Vec<CompetitorRecord>,
    index: HashMap<String, usize>,
}

impl Standings {
    /// Fresh table with a zeroed record for every competitor.
    pub fn new(roster: &Roster) -> Self {
        let records: Vec<CompetitorRecord> = roster.names().map(CompetitorRecord::new).collect();
        Self::from_records(records)
    }

    /// Rebuild from stored records, e.g. ones loaded from persistence.
    pub fn from_records(records: Vec<CompetitorRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Standings { records, index }
    }

    /// Fold one result into both competitors' records.
    ///
    /// Fails without touching either record if a side is not in the table.
    pub fn fold(&mut self, result: &MatchResult) -> Result<()> {
        let home = self.position(&result.home)?;
        let away = self.position(&result.away)?;

        self.records[home].record(result.home_score, result.away_score);
        self.records[away].record(result.away_score, result.home_score);
        Ok(())
    }

    /// Fold a sequence of results in order.
    pub fn fold_all<'a, I>(&mut self, results: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a MatchResult>,
    {
        for result in results {
            self.fold(result)?;
        }
        Ok(())
    }

    /// Ordered table, recomputed from the current records on every call.
    pub fn rank(&self) -> Vec<CompetitorRecord> {
        let mut ranking = self.records.clone();
        ranking.sort_by(compare_records);
        ranking
    }

    /// 1-based position of `name` in the current ranking.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.rank()
            .iter()
            .position(|r| r.name == name)
            .map(|i| i + 1)
    }

    pub fn get(&self, name: &str) -> Option<&CompetitorRecord> {
        self.lookup(name).map(|i| &self.records[i])
    }

    /// Records in roster order.
    pub fn records(&self) -> &[CompetitorRecord] {
        &self.records
    }

    /// Zero every record, keeping one per competitor.
    pub fn reset(&mut self) {
        for record in &mut self.records {
            *record = CompetitorRecord::new(std::mem::take(&mut record.name));
        }
    }

    pub fn total_points(&self) -> u32 {
        self.records.iter().map(|r| r.points).sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.lookup(name)
            .ok_or_else(|| LeagueError::UnknownCompetitor(name.to_string()))
    }
}

impl From<Vec<CompetitorRecord>> for Standings {
    fn from(records: Vec<CompetitorRecord>) -> Self {
        Standings::from_records(records)
    }
}

impl From<Standings> for Vec<CompetitorRecord> {
    fn from(standings: Standings) -> Self {
        standings.records
    }
}
