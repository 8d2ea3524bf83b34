use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::metrics::DerivedTable;
use crate::rankings::{self, CHART_METRICS, Filters, RankMetric, TOP_N};

pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

pub fn default_export_path() -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("epl_rankings_{stamp}.xlsx"))
}

/// Write the four top-10 rankings under the current filters, plus the full
/// derived table, to an xlsx workbook.
pub fn export_rankings(
    path: &Path,
    table: &DerivedTable,
    filters: &Filters,
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut rows = 0usize;
    let mut sheets = 0usize;

    for metric in CHART_METRICS {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(metric))?;
        rows += write_ranking_sheet(sheet, table, metric, filters)?;
        sheets += 1;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Players")?;
    rows += write_players_sheet(sheet, table)?;
    sheets += 1;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        sheets,
        rows,
    })
}

fn sheet_name(metric: RankMetric) -> &'static str {
    match metric {
        RankMetric::GoalsPer90 => "GoalsPer90",
        RankMetric::AssistsPer90 => "AssistsPer90",
        RankMetric::OverPerformance => "VsExpected",
        RankMetric::ContributionScore => "ContributionScore",
    }
}

fn write_ranking_sheet(
    sheet: &mut Worksheet,
    table: &DerivedTable,
    metric: RankMetric,
    filters: &Filters,
) -> Result<usize> {
    write_header(sheet, &["Rank", "Player", "Team", metric.short_label()])?;

    let ranking = rankings::top_n_by(table, metric, TOP_N, filters);
    for (idx, bar) in ranking.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, (idx + 1) as f64)?;
        sheet.write_string(row, 1, &bar.player)?;
        sheet.write_string(row, 2, &bar.team)?;
        sheet.write_number(row, 3, bar.value)?;
    }
    Ok(ranking.len())
}

fn write_players_sheet(sheet: &mut Worksheet, table: &DerivedTable) -> Result<usize> {
    write_header(
        sheet,
        &[
            "Player",
            "Team",
            "Pos",
            "Min",
            "Goals/90",
            "Assists/90",
            "G+A/90",
            "xG+xAG/90",
            "Perf vs Expected",
            "Goals Norm",
            "Assists Norm",
            "Overperf Norm",
            "Contribution Score",
        ],
    )?;

    for (idx, p) in table.rows().iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, &p.player)?;
        sheet.write_string(row, 1, &p.team)?;
        sheet.write_string(row, 2, &p.position)?;
        sheet.write_number(row, 3, p.minutes as f64)?;
        sheet.write_number(row, 4, p.goals_per90)?;
        sheet.write_number(row, 5, p.assists_per90)?;
        sheet.write_number(row, 6, p.goal_contrib_per90)?;
        sheet.write_number(row, 7, p.expected_contrib_per90)?;
        sheet.write_number(row, 8, p.performance_vs_expected)?;
        sheet.write_number(row, 9, p.goals_norm)?;
        sheet.write_number(row, 10, p.assists_norm)?;
        sheet.write_number(row, 11, p.overperf_norm)?;
        sheet.write_number(row, 12, p.contribution_score)?;
    }
    Ok(table.len())
}

fn write_header(sheet: &mut Worksheet, columns: &[&str]) -> Result<()> {
    for (col, name) in columns.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *name)
            .with_context(|| format!("write header cell {col}"))?;
    }
    Ok(())
}
