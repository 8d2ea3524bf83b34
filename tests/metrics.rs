use std::path::PathBuf;

use epl_terminal::dataset::{PlayerSeasonRow, read_player_rows};
use epl_terminal::metrics::{DEFAULT_MINUTES_THRESHOLD, load_and_derive};
use epl_terminal::rankings::{Filters, RankMetric, top_n_by};

fn fixture_rows() -> Vec<PlayerSeasonRow> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("players_small.csv");
    read_player_rows(&path).expect("fixture should load")
}

fn row(
    player: &str,
    team: &str,
    pos: &str,
    minutes: u32,
    gls: f64,
    ast: f64,
    ga: f64,
    xga: f64,
) -> PlayerSeasonRow {
    PlayerSeasonRow {
        player: player.to_string(),
        team: team.to_string(),
        position: pos.to_string(),
        minutes,
        goals_per90: gls,
        assists_per90: ast,
        goal_contrib_per90: ga,
        expected_contrib_per90: xga,
    }
}

#[test]
fn minutes_threshold_filters_rows() {
    let table = load_and_derive(&fixture_rows(), DEFAULT_MINUTES_THRESHOLD);
    assert_eq!(table.len(), 10);
    assert!(
        table
            .rows()
            .iter()
            .all(|r| r.minutes >= DEFAULT_MINUTES_THRESHOLD)
    );
    assert!(!table.rows().iter().any(|r| r.player == "Benched Kid"));
}

#[test]
fn threshold_example_keeps_only_qualified_player() {
    // P2 falls below the 900-minute bar; P1 survives and tops the goals
    // ranking alone.
    let rows = vec![
        row("P1", "TeamA", "FW", 1000, 0.8, 0.1, 0.9, 0.7),
        row("P2", "TeamB", "MF", 500, 0.9, 0.2, 1.1, 0.5),
    ];
    let table = load_and_derive(&rows, 900);
    assert_eq!(table.len(), 1);

    let top = top_n_by(&table, RankMetric::GoalsPer90, 1, &Filters::all());
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player, "P1");
}

#[test]
fn performance_vs_expected_is_actual_minus_expected() {
    let table = load_and_derive(&fixture_rows(), DEFAULT_MINUTES_THRESHOLD);
    for r in table.rows() {
        let expected = r.goal_contrib_per90 - r.expected_contrib_per90;
        assert!((r.performance_vs_expected - expected).abs() < 1e-12);
    }
}

#[test]
fn normalized_columns_span_unit_interval() {
    let table = load_and_derive(&fixture_rows(), DEFAULT_MINUTES_THRESHOLD);
    for r in table.rows() {
        assert!((0.0..=1.0).contains(&r.goals_norm), "{}", r.player);
        assert!((0.0..=1.0).contains(&r.assists_norm), "{}", r.player);
        assert!((0.0..=1.0).contains(&r.overperf_norm), "{}", r.player);
        assert!((0.0..=3.0).contains(&r.contribution_score), "{}", r.player);
        let sum = r.goals_norm + r.assists_norm + r.overperf_norm;
        assert!((r.contribution_score - sum).abs() < 1e-12);
    }

    // The population max and min occupy the endpoints.
    let haaland = table
        .rows()
        .iter()
        .find(|r| r.player == "Erling Haaland")
        .unwrap();
    assert_eq!(haaland.goals_norm, 1.0);
    let walker = table
        .rows()
        .iter()
        .find(|r| r.player == "Kyle Walker")
        .unwrap();
    assert_eq!(walker.goals_norm, 0.0);
}

#[test]
fn normalization_is_global_not_per_filter() {
    let table = load_and_derive(&fixture_rows(), DEFAULT_MINUTES_THRESHOLD);

    // Rebuilding from only one team's rows would renormalize; the filtered
    // view of the global table must not.
    let arsenal: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.team == "Arsenal")
        .collect();
    assert!(!arsenal.is_empty());

    let arsenal_only_rows: Vec<PlayerSeasonRow> = fixture_rows()
        .into_iter()
        .filter(|r| r.team == "Arsenal")
        .collect();
    let arsenal_table = load_and_derive(&arsenal_only_rows, DEFAULT_MINUTES_THRESHOLD);

    // Saka tops Arsenal but not the league, so a per-team renormalization
    // would pin him at 1.0 while the global column does not.
    let saka_global = arsenal.iter().find(|r| r.player == "Bukayo Saka").unwrap();
    let saka_local = arsenal_table
        .rows()
        .iter()
        .find(|r| r.player == "Bukayo Saka")
        .unwrap();
    assert_eq!(saka_local.goals_norm, 1.0);
    assert!((saka_global.goals_norm - saka_local.goals_norm).abs() > 1e-6);

    // Filtering the global table leaves its values untouched.
    let filters = Filters {
        team: "Arsenal".to_string(),
        position: "All".to_string(),
    };
    let ranked = top_n_by(&table, RankMetric::ContributionScore, 10, &filters);
    for bar in &ranked {
        let global = table
            .rows()
            .iter()
            .find(|r| r.player == bar.player)
            .unwrap();
        assert_eq!(bar.value, global.contribution_score);
    }
}

#[test]
fn teams_and_positions_are_distinct_and_sorted() {
    let table = load_and_derive(&fixture_rows(), DEFAULT_MINUTES_THRESHOLD);
    let teams = table.teams();
    assert_eq!(teams.first().map(String::as_str), Some("Arsenal"));
    let mut sorted = teams.to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(teams, sorted.as_slice());

    assert!(table.positions().iter().any(|p| p == "FW,MF"));
}

#[test]
fn zero_threshold_retains_everything() {
    let rows = fixture_rows();
    let table = load_and_derive(&rows, 0);
    assert_eq!(table.len(), rows.len());
}
