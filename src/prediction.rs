use serde::{Deserialize, Serialize};

use crate::constants::{BOTTOM_MULTIPLIER, LEADER_MULTIPLIER, RUNNER_UP_MULTIPLIER};
use crate::standings::CompetitorRecord;

/// A competitor's estimated chance of finishing top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub name: String,
    pub percentage: f64,
    pub points: u32,
    /// 1-based position
    pub position: usize,
}

/// Championship percentages from a ranking.
///
/// With no points on the table everybody gets `100 / n`. Otherwise each
/// group of competitors level on points shares `points / total × 100`
/// equally, a multiplier by position is applied (leader ×1.3, second ×1.1,
/// bottom two ×0.7) and the result is renormalized to 100 and truncated to
/// one decimal.
///
/// `ranking` must be ordered as returned by [`crate::standings::Standings::rank`];
/// the output keeps that order.
pub fn predict_championship(ranking: &[CompetitorRecord]) -> Vec<Prediction> {
    let n = ranking.len();
    if n == 0 {
        return Vec::new();
    }

    let total_points: u32 = ranking.iter().map(|r| r.points).sum();
    if total_points == 0 {
        let equal = 100.0 / n as f64;
        return ranking
            .iter()
            .enumerate()
            .map(|(i, r)| Prediction {
                name: r.name.clone(),
                percentage: equal,
                points: r.points,
                position: i + 1,
            })
            .collect();
    }

    let mut predictions = Vec::with_capacity(n);
    let mut position = 1;
    for group in ranking.chunk_by(|a, b| a.points == b.points) {
        let base = group[0].points as f64 / total_points as f64 * 100.0;
        let per_member = base / group.len() as f64;

        for (i, record) in group.iter().enumerate() {
            let current = position + i;
            predictions.push(Prediction {
                name: record.name.clone(),
                percentage: per_member * position_multiplier(current, n),
                points: record.points,
                position: current,
            });
        }
        position += group.len();
    }

    let total: f64 = predictions.iter().map(|p| p.percentage).sum();
    if total > 0.0 {
        for prediction in &mut predictions {
            prediction.percentage = truncate_one_decimal(prediction.percentage / total * 100.0);
        }
    }

    predictions
}

fn position_multiplier(position: usize, n: usize) -> f64 {
    if position == 1 {
        LEADER_MULTIPLIER
    } else if position == 2 {
        RUNNER_UP_MULTIPLIER
    } else if position + 1 >= n {
        BOTTOM_MULTIPLIER
    } else {
        1.0
    }
}

fn truncate_one_decimal(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}
