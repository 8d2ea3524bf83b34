use std::collections::BTreeSet;

use crate::dataset::PlayerSeasonRow;

pub const DEFAULT_MINUTES_THRESHOLD: u32 = 900;

/// Below this range, a min-max column is treated as zero-variance and every
/// normalized value in it becomes 0.0.
const RANGE_EPSILON: f64 = 1e-9;

/// One retained player row with its derived columns.
#[derive(Debug, Clone)]
pub struct PlayerMetrics {
    pub player: String,
    pub team: String,
    pub position: String,
    pub minutes: u32,
    pub goals_per90: f64,
    pub assists_per90: f64,
    pub goal_contrib_per90: f64,
    pub expected_contrib_per90: f64,
    pub performance_vs_expected: f64,
    pub goals_norm: f64,
    pub assists_norm: f64,
    pub overperf_norm: f64,
    pub contribution_score: f64,
}

/// Derived table computed once at startup and immutable afterwards.
/// Normalization is global over the whole retained population; per-request
/// filters downstream never renormalize.
#[derive(Debug, Clone)]
pub struct DerivedTable {
    rows: Vec<PlayerMetrics>,
    teams: Vec<String>,
    positions: Vec<String>,
}

impl DerivedTable {
    pub fn rows(&self) -> &[PlayerMetrics] {
        &self.rows
    }

    /// Distinct team names, sorted.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// Distinct position strings, sorted. Multi-position entries such as
    /// "FW,MF" are kept verbatim, matching the source data.
    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Filter by minutes played and compute the derived columns.
///
/// Per-90 inputs pass through untouched; `performance_vs_expected` is actual
/// minus expected contribution; the three normalized columns use min-max over
/// the entire retained set and sum into `contribution_score`. An empty
/// retained set is a valid output, not an error.
pub fn load_and_derive(rows: &[PlayerSeasonRow], minutes_threshold: u32) -> DerivedTable {
    let retained: Vec<&PlayerSeasonRow> = rows
        .iter()
        .filter(|row| row.minutes >= minutes_threshold)
        .collect();

    let goals_range = min_max(retained.iter().map(|r| r.goals_per90));
    let assists_range = min_max(retained.iter().map(|r| r.assists_per90));
    let overperf_range = min_max(
        retained
            .iter()
            .map(|r| r.goal_contrib_per90 - r.expected_contrib_per90),
    );

    let mut out = Vec::with_capacity(retained.len());
    for row in retained {
        let performance_vs_expected = row.goal_contrib_per90 - row.expected_contrib_per90;
        let goals_norm = min_max_norm(row.goals_per90, goals_range);
        let assists_norm = min_max_norm(row.assists_per90, assists_range);
        let overperf_norm = min_max_norm(performance_vs_expected, overperf_range);
        out.push(PlayerMetrics {
            player: row.player.clone(),
            team: row.team.clone(),
            position: row.position.clone(),
            minutes: row.minutes,
            goals_per90: row.goals_per90,
            assists_per90: row.assists_per90,
            goal_contrib_per90: row.goal_contrib_per90,
            expected_contrib_per90: row.expected_contrib_per90,
            performance_vs_expected,
            goals_norm,
            assists_norm,
            overperf_norm,
            contribution_score: goals_norm + assists_norm + overperf_norm,
        });
    }

    let teams = distinct_sorted(out.iter().map(|r| r.team.as_str()));
    let positions = distinct_sorted(out.iter().map(|r| r.position.as_str()));

    DerivedTable {
        rows: out,
        teams,
        positions,
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        range = Some(match range {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    range
}

/// Zero-variance policy: a column whose max equals its min (within epsilon)
/// normalizes to 0.0 for every row instead of dividing by zero.
fn min_max_norm(value: f64, range: Option<(f64, f64)>) -> f64 {
    let Some((lo, hi)) = range else {
        return 0.0;
    };
    if hi - lo <= RANGE_EPSILON {
        return 0.0;
    }
    (value - lo) / (hi - lo)
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
    set.into_iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: &str, minutes: u32, gls: f64, ast: f64, ga: f64, xga: f64) -> PlayerSeasonRow {
        PlayerSeasonRow {
            player: player.to_string(),
            team: "Test FC".to_string(),
            position: "FW".to_string(),
            minutes,
            goals_per90: gls,
            assists_per90: ast,
            goal_contrib_per90: ga,
            expected_contrib_per90: xga,
        }
    }

    #[test]
    fn zero_variance_column_normalizes_to_zero() {
        let rows = vec![
            row("A", 1000, 0.5, 0.1, 0.6, 0.5),
            row("B", 1000, 0.5, 0.3, 0.8, 0.4),
        ];
        let table = load_and_derive(&rows, 900);
        // Goals are identical across the pool, so goals_norm collapses to 0.
        assert!(table.rows().iter().all(|r| r.goals_norm == 0.0));
        // Assists still span a range and normalize to the [0,1] endpoints.
        let norms: Vec<f64> = table.rows().iter().map(|r| r.assists_norm).collect();
        assert!(norms.contains(&0.0));
        assert!(norms.contains(&1.0));
    }

    #[test]
    fn empty_retained_set_is_valid() {
        let rows = vec![row("A", 100, 0.5, 0.1, 0.6, 0.5)];
        let table = load_and_derive(&rows, 900);
        assert!(table.is_empty());
        assert!(table.teams().is_empty());
    }
}
