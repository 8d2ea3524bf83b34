use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

const CACHE_DIR: &str = "epl_terminal";
const CACHE_FILE: &str = "ui_prefs.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefsFile {
    version: u32,
    team: String,
    position: String,
}

/// Restore the last-used filter selections. All failures (no cache dir, stale
/// version, value no longer in the dataset) degrade to the defaults silently.
pub fn load_into_state(state: &mut AppState) {
    let Some(path) = cache_path() else {
        return;
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return;
    };
    let Ok(prefs) = serde_json::from_str::<PrefsFile>(&raw) else {
        return;
    };
    if prefs.version != CACHE_VERSION {
        return;
    }
    state.set_filters(&prefs.team, &prefs.position);
}

pub fn save_from_state(state: &AppState) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let filters = state.filters();
    let prefs = PrefsFile {
        version: CACHE_VERSION,
        team: filters.team,
        position: filters.position,
    };
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(&prefs).context("serialize ui prefs")?;
    fs::write(&tmp, json).context("write ui prefs")?;
    fs::rename(&tmp, &path).context("swap ui prefs")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}
