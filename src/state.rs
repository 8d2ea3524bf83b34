use std::collections::VecDeque;

use crate::metrics::DerivedTable;
use crate::rankings::{self, ALL, ChartPayload, Filters, RankMetric};

/// Which of the four chart panes has keyboard focus. Focus is purely
/// presentational; it never changes what the charts contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFocus {
    Goals,
    Assists,
    OverPerformance,
    Contribution,
}

impl ChartFocus {
    pub fn next(self) -> Self {
        match self {
            ChartFocus::Goals => ChartFocus::Assists,
            ChartFocus::Assists => ChartFocus::OverPerformance,
            ChartFocus::OverPerformance => ChartFocus::Contribution,
            ChartFocus::Contribution => ChartFocus::Goals,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ChartFocus::Goals => ChartFocus::Contribution,
            ChartFocus::Assists => ChartFocus::Goals,
            ChartFocus::OverPerformance => ChartFocus::Assists,
            ChartFocus::Contribution => ChartFocus::OverPerformance,
        }
    }

    pub fn metric(self) -> RankMetric {
        match self {
            ChartFocus::Goals => RankMetric::GoalsPer90,
            ChartFocus::Assists => RankMetric::AssistsPer90,
            ChartFocus::OverPerformance => RankMetric::OverPerformance,
            ChartFocus::Contribution => RankMetric::ContributionScore,
        }
    }

    pub fn chart_index(self) -> usize {
        match self {
            ChartFocus::Goals => 0,
            ChartFocus::Assists => 1,
            ChartFocus::OverPerformance => 2,
            ChartFocus::Contribution => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportState {
    pub done: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<std::time::Instant>,
}

impl Default for ExportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportState {
    pub fn new() -> Self {
        Self {
            done: false,
            path: None,
            message: String::new(),
            last_updated: None,
        }
    }

    pub fn clear_if_done_for(&mut self, now: std::time::Instant, keep_secs: u64) {
        if !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

/// Owned UI state around the immutable derived table. The two filter option
/// lists are fixed at construction: the "All" sentinel followed by the
/// distinct values present in the table.
#[derive(Debug, Clone)]
pub struct AppState {
    pub table: DerivedTable,
    pub minutes_threshold: u32,
    pub team_options: Vec<String>,
    pub position_options: Vec<String>,
    pub team_selected: usize,
    pub position_selected: usize,
    pub charts: [ChartPayload; 4],
    pub focus: ChartFocus,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub export: ExportState,
}

impl AppState {
    pub fn new(table: DerivedTable, minutes_threshold: u32) -> Self {
        let team_options = with_all_sentinel(table.teams());
        let position_options = with_all_sentinel(table.positions());
        let charts = rankings::chart_payloads(&table, &Filters::all());
        Self {
            table,
            minutes_threshold,
            team_options,
            position_options,
            team_selected: 0,
            position_selected: 0,
            charts,
            focus: ChartFocus::Goals,
            help_overlay: false,
            logs: VecDeque::with_capacity(200),
            export: ExportState::new(),
        }
    }

    pub fn filters(&self) -> Filters {
        Filters {
            team: self.team_options[self.team_selected].clone(),
            position: self.position_options[self.position_selected].clone(),
        }
    }

    pub fn cycle_team(&mut self) {
        self.team_selected = (self.team_selected + 1) % self.team_options.len();
        self.refresh_charts();
    }

    pub fn cycle_team_back(&mut self) {
        self.team_selected = wrap_back(self.team_selected, self.team_options.len());
        self.refresh_charts();
    }

    pub fn cycle_position(&mut self) {
        self.position_selected = (self.position_selected + 1) % self.position_options.len();
        self.refresh_charts();
    }

    pub fn cycle_position_back(&mut self) {
        self.position_selected = wrap_back(self.position_selected, self.position_options.len());
        self.refresh_charts();
    }

    pub fn reset_filters(&mut self) {
        self.team_selected = 0;
        self.position_selected = 0;
        self.refresh_charts();
    }

    /// Restore a previous selection; each side applies only when the value is
    /// still present in this dataset. Returns whether anything changed.
    pub fn set_filters(&mut self, team: &str, position: &str) -> bool {
        let mut changed = false;
        if let Some(idx) = self.team_options.iter().position(|t| t == team)
            && idx != self.team_selected
        {
            self.team_selected = idx;
            changed = true;
        }
        if let Some(idx) = self.position_options.iter().position(|p| p == position)
            && idx != self.position_selected
        {
            self.position_selected = idx;
            changed = true;
        }
        if changed {
            self.refresh_charts();
        }
        changed
    }

    fn refresh_charts(&mut self) {
        self.charts = rankings::chart_payloads(&self.table, &self.filters());
    }

    pub fn focused_chart(&self) -> &ChartPayload {
        &self.charts[self.focus.chart_index()]
    }

    pub fn cycle_focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn cycle_focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn maybe_clear_export(&mut self, now: std::time::Instant) {
        self.export.clear_if_done_for(now, 8);
    }
}

fn with_all_sentinel(values: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(ALL.to_string());
    out.extend(values.iter().cloned());
    out
}

fn wrap_back(idx: usize, len: usize) -> usize {
    if idx == 0 { len - 1 } else { idx - 1 }
}
