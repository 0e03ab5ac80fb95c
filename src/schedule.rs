use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::competitor::Competitor;
use crate::error::{LeagueError, Result};
use crate::roster::Roster;

/// A scheduled, not-yet-played pairing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    /// 1-based round number
    pub round: usize,
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn involves(&self, name: &str) -> bool {
        self.home == name || self.away == name
    }
}

/// One batch of fixtures in which no competitor plays twice.
pub type Round = Vec<Fixture>;

/// Generate a double round-robin schedule.
///
/// Uses the circle method: one slot stays fixed while the others rotate, so
/// every round holds `n / 2` fixtures. With an odd roster an empty slot is
/// added and whoever is paired with it sits the round out. The second half of
/// the season replays the first with venues swapped.
///
/// Competitor order and the order of fixtures inside each round are shuffled
/// with `rng`. Rosters with fewer than 2 competitors yield an empty schedule.
pub fn generate_schedule<R: Rng>(competitors: &[Competitor], rng: &mut R) -> Vec<Round> {
    let n = competitors.len();
    if n < 2 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut slots: Vec<Option<usize>> = order.into_iter().map(Some).collect();
    if n % 2 == 1 {
        slots.push(None);
    }
    let m = slots.len();

    let mut first_leg: Vec<Vec<(usize, usize)>> = Vec::with_capacity(m - 1);
    for r in 0..m - 1 {
        let mut pairs = Vec::with_capacity(m / 2);
        for i in 0..m / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[m - 1 - i]) {
                // Alternate venues so nobody is at home for a whole leg
                let swap = if i == 0 { r % 2 == 1 } else { i % 2 == 1 };
                pairs.push(if swap { (b, a) } else { (a, b) });
            }
        }
        first_leg.push(pairs);
        slots[1..].rotate_right(1);
    }

    let legs = m - 1;
    let mut schedule: Vec<Round> = Vec::with_capacity(legs * 2);
    for leg in 0..2 {
        for (r, pairs) in first_leg.iter().enumerate() {
            let round_number = leg * legs + r + 1;
            let mut round: Round = pairs
                .iter()
                .map(|&(home, away)| {
                    let (home, away) = if leg == 0 { (home, away) } else { (away, home) };
                    Fixture {
                        round: round_number,
                        home: competitors[home].name.clone(),
                        away: competitors[away].name.clone(),
                    }
                })
                .collect();
            round.shuffle(rng);
            schedule.push(round);
        }
    }

    debug!(
        "generated {} rounds ({} fixtures) for {} competitors",
        schedule.len(),
        schedule.iter().map(Vec::len).sum::<usize>(),
        n
    );

    schedule
}

/// Fixtures a round must hold for a roster of `roster_size`.
pub fn matches_per_round(roster_size: usize) -> usize {
    roster_size / 2
}

/// `n(n-1)` fixtures divided by the fixtures that fit in one round.
pub fn closed_form_round_estimate(roster_size: usize) -> usize {
    if roster_size < 2 {
        return 0;
    }
    roster_size * (roster_size - 1) / matches_per_round(roster_size)
}

/// Estimate that assumes two fixtures per round regardless of roster size.
///
/// Only matches the real schedule for four or five competitors; kept so
/// callers migrating stored week counts can detect leagues created with it.
pub fn legacy_round_estimate(roster_size: usize) -> usize {
    if roster_size < 2 {
        return 0;
    }
    roster_size * (roster_size - 1) / 2
}

/// Check one round: exact fixture count, distinct sides, nobody twice.
pub fn validate_round(round: &[Fixture], roster_size: usize) -> Result<()> {
    let expected = matches_per_round(roster_size);
    if round.len() != expected {
        return Err(LeagueError::ScheduleInconsistency(format!(
            "round has {} fixtures, expected {}",
            round.len(),
            expected
        )));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(round.len() * 2);
    for fixture in round {
        if fixture.home == fixture.away {
            return Err(LeagueError::ScheduleInconsistency(format!(
                "{} scheduled against itself",
                fixture.home
            )));
        }
        for name in [fixture.home.as_str(), fixture.away.as_str()] {
            if !seen.insert(name) {
                return Err(LeagueError::ScheduleInconsistency(format!(
                    "{} appears twice in round {}",
                    name, fixture.round
                )));
            }
        }
    }
    Ok(())
}

/// Check a whole schedule against its roster.
///
/// Every round must pass [`validate_round`], be numbered in sequence, only
/// reference roster members, and every ordered pair must occur exactly once.
pub fn validate_schedule(schedule: &[Round], roster: &Roster) -> Result<()> {
    let n = roster.len();
    let mut pairs: HashSet<(&str, &str)> = HashSet::new();

    for (i, round) in schedule.iter().enumerate() {
        validate_round(round, n)?;
        for fixture in round {
            if fixture.round != i + 1 {
                return Err(LeagueError::ScheduleInconsistency(format!(
                    "fixture {} v {} numbered {} in round {}",
                    fixture.home,
                    fixture.away,
                    fixture.round,
                    i + 1
                )));
            }
            for name in [&fixture.home, &fixture.away] {
                if !roster.contains(name) {
                    return Err(LeagueError::ScheduleInconsistency(format!(
                        "{} is not on the roster",
                        name
                    )));
                }
            }
            if !pairs.insert((fixture.home.as_str(), fixture.away.as_str())) {
                return Err(LeagueError::ScheduleInconsistency(format!(
                    "{} v {} scheduled twice",
                    fixture.home, fixture.away
                )));
            }
        }
    }

    let expected = n * n.saturating_sub(1);
    if pairs.len() != expected {
        return Err(LeagueError::ScheduleInconsistency(format!(
            "schedule has {} fixtures, expected {}",
            pairs.len(),
            expected
        )));
    }
    Ok(())
}

/// The competitor sitting out a round, if any.
pub fn bye_for_round<'a>(round: &[Fixture], roster: &'a Roster) -> Option<&'a Competitor> {
    let playing: HashSet<&str> = round
        .iter()
        .flat_map(|f| [f.home.as_str(), f.away.as_str()])
        .collect();
    roster
        .competitors()
        .iter()
        .find(|c| !playing.contains(c.name.as_str()))
}
