use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;

/// Columns that must exist after header normalization.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Player", "Team", "Pos", "Min", "Gls_90", "Ast_90", "G+A_90", "xG+xAG_90",
];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("missing required column(s) after normalization: {0}")]
    MissingColumns(String),
}

/// One row per player-team-season combination. A player who changed teams
/// mid-season appears once per team.
#[derive(Debug, Clone)]
pub struct PlayerSeasonRow {
    pub player: String,
    pub team: String,
    pub position: String,
    pub minutes: u32,
    pub goals_per90: f64,
    pub assists_per90: f64,
    pub goal_contrib_per90: f64,
    pub expected_contrib_per90: f64,
}

/// Raw CSV row, deserialized against normalized headers. Numeric fields stay
/// as strings because season dumps use thousands separators and blank cells.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Pos")]
    pos: String,
    #[serde(rename = "Min", default)]
    minutes: String,
    #[serde(rename = "Gls_90", default)]
    gls_90: String,
    #[serde(rename = "Ast_90", default)]
    ast_90: String,
    #[serde(rename = "G+A_90", default)]
    g_plus_a_90: String,
    #[serde(rename = "xG+xAG_90", default)]
    xg_plus_xag_90: String,
}

/// Load player season rows from a delimited file.
///
/// Headers are normalized (trimmed, spaces replaced with underscores) before
/// the required-column check, so `" Gls 90 "` and `Gls_90` both qualify.
pub fn read_player_rows(path: &Path) -> Result<Vec<PlayerSeasonRow>, DatasetError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: display.clone(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(|source| DatasetError::Csv {
        path: display.clone(),
        source,
    })?;
    let normalized: StringRecord = headers.iter().map(normalize_header).collect();
    check_required_columns(&normalized)?;
    reader.set_headers(normalized);

    let mut rows = Vec::new();
    for record in reader.deserialize::<RawPlayerRow>() {
        let raw = record.map_err(|source| DatasetError::Csv {
            path: display.clone(),
            source,
        })?;
        let player = raw.player.trim().to_string();
        // Season dumps repeat the header row between blocks; skip those.
        if player.is_empty() || player == "Player" {
            continue;
        }
        rows.push(PlayerSeasonRow {
            player,
            team: raw.team.trim().to_string(),
            position: raw.pos.trim().to_string(),
            minutes: parse_number(&raw.minutes).unwrap_or(0.0).max(0.0) as u32,
            goals_per90: parse_number(&raw.gls_90).unwrap_or(0.0),
            assists_per90: parse_number(&raw.ast_90).unwrap_or(0.0),
            goal_contrib_per90: parse_number(&raw.g_plus_a_90).unwrap_or(0.0),
            expected_contrib_per90: parse_number(&raw.xg_plus_xag_90).unwrap_or(0.0),
        });
    }
    Ok(rows)
}

pub fn normalize_header(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

fn check_required_columns(headers: &StringRecord) -> Result<(), DatasetError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns(missing.join(", ")))
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    let cleaned = cleaned.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
