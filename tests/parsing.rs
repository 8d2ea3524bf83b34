use std::path::PathBuf;

use epl_terminal::dataset::{DatasetError, read_player_rows};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_rows_with_normalized_headers() {
    let rows = read_player_rows(&fixture_path("players_small.csv")).expect("fixture should load");
    // 13 data lines: 11 players, one repeated header row, one blank row.
    assert_eq!(rows.len(), 11);

    let haaland = rows
        .iter()
        .find(|r| r.player == "Erling Haaland")
        .expect("haaland row");
    assert_eq!(haaland.team, "Manchester City");
    assert_eq!(haaland.position, "FW");
    // "2,552" parses through the thousands separator.
    assert_eq!(haaland.minutes, 2552);
    assert_eq!(haaland.goals_per90, 0.95);
    assert_eq!(haaland.goal_contrib_per90, 1.16);
    assert_eq!(haaland.expected_contrib_per90, 1.08);
}

#[test]
fn multi_position_values_are_kept_verbatim() {
    let rows = read_player_rows(&fixture_path("players_small.csv")).expect("fixture should load");
    let palmer = rows
        .iter()
        .find(|r| r.player == "Cole Palmer")
        .expect("palmer row");
    assert_eq!(palmer.position, "FW,MF");
}

#[test]
fn missing_required_column_is_a_data_error() {
    let err = read_player_rows(&fixture_path("players_missing_pos.csv"))
        .expect_err("missing Pos column should fail");
    match err {
        DatasetError::MissingColumns(cols) => assert_eq!(cols, "Pos"),
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn unreadable_path_is_an_io_error() {
    let err = read_player_rows(&fixture_path("does_not_exist.csv"))
        .expect_err("nonexistent file should fail");
    assert!(matches!(err, DatasetError::Io { .. }));
}
