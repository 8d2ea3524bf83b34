use std::cmp::Ordering;

use crate::metrics::{DerivedTable, PlayerMetrics};

/// Sentinel filter value meaning "no restriction".
pub const ALL: &str = "All";

pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    GoalsPer90,
    AssistsPer90,
    OverPerformance,
    ContributionScore,
}

/// The four dashboard charts, in render order.
pub const CHART_METRICS: [RankMetric; 4] = [
    RankMetric::GoalsPer90,
    RankMetric::AssistsPer90,
    RankMetric::OverPerformance,
    RankMetric::ContributionScore,
];

impl RankMetric {
    pub fn value(&self, row: &PlayerMetrics) -> f64 {
        match self {
            RankMetric::GoalsPer90 => row.goals_per90,
            RankMetric::AssistsPer90 => row.assists_per90,
            RankMetric::OverPerformance => row.performance_vs_expected,
            RankMetric::ContributionScore => row.contribution_score,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RankMetric::GoalsPer90 => "Top 10 Players by Goals per 90",
            RankMetric::AssistsPer90 => "Top 10 Players by Assists per 90",
            RankMetric::OverPerformance => "Top 10 Overperforming Players vs xG+xAG",
            RankMetric::ContributionScore => "Top 10 Players by Contribution Score",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            RankMetric::GoalsPer90 => "Goals/90",
            RankMetric::AssistsPer90 => "Assists/90",
            RankMetric::OverPerformance => "vs xG+xAG",
            RankMetric::ContributionScore => "Score",
        }
    }

    /// Charts where bars are colored by team rather than by metric.
    pub fn grouped_by_team(&self) -> bool {
        matches!(
            self,
            RankMetric::OverPerformance | RankMetric::ContributionScore
        )
    }
}

/// Team/position selections. Each side is either the [`ALL`] sentinel or an
/// exact value from the derived table; both compose with logical AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub team: String,
    pub position: String,
}

impl Filters {
    pub fn all() -> Self {
        Self {
            team: ALL.to_string(),
            position: ALL.to_string(),
        }
    }

    pub fn matches(&self, row: &PlayerMetrics) -> bool {
        (self.team == ALL || row.team == self.team)
            && (self.position == ALL || row.position == self.position)
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::all()
    }
}

/// One chart bar: category label, group, value.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    pub player: String,
    pub team: String,
    pub value: f64,
}

/// Chart-ready result set. `bars` are ordered ascending by value so a
/// horizontal chart draws the largest bar at the top edge.
#[derive(Debug, Clone)]
pub struct ChartPayload {
    pub metric: RankMetric,
    pub title: String,
    pub bars: Vec<RankedBar>,
}

/// Filter, rank descending, truncate to `n`.
///
/// Ties break ascending by player name, then by team, so repeated calls with
/// identical inputs return identical orderings. An empty filtered set yields
/// an empty ranking, never an error.
pub fn top_n_by(
    table: &DerivedTable,
    metric: RankMetric,
    n: usize,
    filters: &Filters,
) -> Vec<RankedBar> {
    let mut retained: Vec<&PlayerMetrics> = table
        .rows()
        .iter()
        .filter(|row| filters.matches(row))
        .collect();

    retained.sort_by(|a, b| {
        metric
            .value(b)
            .partial_cmp(&metric.value(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player.cmp(&b.player))
            .then_with(|| a.team.cmp(&b.team))
    });
    retained.truncate(n);

    retained
        .into_iter()
        .map(|row| RankedBar {
            player: row.player.clone(),
            team: row.team.clone(),
            value: metric.value(row),
        })
        .collect()
}

/// The per-interaction callback: four independent top-10 rankings over the
/// same filters. Each chart recomputes its own filter-and-sort; nothing is
/// shared or renormalized between them.
pub fn chart_payloads(table: &DerivedTable, filters: &Filters) -> [ChartPayload; 4] {
    CHART_METRICS.map(|metric| {
        let mut bars = top_n_by(table, metric, TOP_N, filters);
        bars.reverse();
        ChartPayload {
            metric,
            title: metric.title().to_string(),
            bars,
        }
    })
}
