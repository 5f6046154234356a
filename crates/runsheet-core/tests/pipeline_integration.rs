//! End-to-end tests for the full pipeline over the public API.
//!
//! These exercise the whole normalize → resolve → partition → project
//! chain with realistic conference fixtures and assert the pipeline's
//! externally visible guarantees: privacy of summary views, timeline
//! ordering, unscheduled-session retention, and determinism.

use proptest::prelude::*;
use runsheet_core::fields::{
    COL_DAY, COL_DURATION, COL_FORMAT, COL_OWNER, COL_ROOM, COL_SCHEDULED_AT, COL_SESSION_ID,
    COL_SPEAKERS, COL_START_TIME, COL_TITLE,
};
use runsheet_core::{build_run_sheets, RawRow, RawTable, RunSheetConfig, ViewKind};

const PHONE: &str = "+1 415 555 0100";

type Cells = Vec<(&'static str, &'static str)>;

fn schedule_cells() -> Vec<Cells> {
    vec![
        vec![
            (COL_DAY, "2026-10-17"),
            (COL_START_TIME, "10:00"),
            (COL_ROOM, "Robertson Auditorium"),
            (COL_TITLE, "Intro to Rust"),
            (COL_SPEAKERS, "J. Doe"),
        ],
        vec![
            (COL_DAY, "2026-10-17"),
            (COL_START_TIME, "11:00"),
            (COL_ROOM, "Robertson Auditorium"),
            (COL_TITLE, "Async in Practice"),
            (COL_SPEAKERS, "A. Poe"),
        ],
        vec![
            (COL_DAY, "2026-10-17"),
            (COL_START_TIME, "10:00"),
            (COL_ROOM, "Fisher Hall"),
            (COL_TITLE, "Typed Pipelines"),
            (COL_SPEAKERS, "R. Roe"),
        ],
        vec![
            (COL_DAY, "2026-10-17"),
            (COL_START_TIME, "13:00"),
            (COL_ROOM, "Workshop Loft"),
            (COL_TITLE, "Hands-on Wasm"),
            (COL_SPEAKERS, "M. Moe"),
        ],
    ]
}

fn session_cells() -> Vec<Cells> {
    vec![
        vec![
            (COL_SESSION_ID, "101"),
            (COL_TITLE, "Intro to Rust"),
            (COL_OWNER, "J. Doe"),
            (COL_ROOM, "Robertson Auditorium"),
            (COL_SCHEDULED_AT, "2026-10-17 10:00:00"),
            (COL_DURATION, "30"),
            (COL_FORMAT, "30 minute talk"),
            ("Pronouns", "she/her"),
            ("Mobile # with Country Code (not shared publicly)", PHONE),
        ],
        vec![
            (COL_SESSION_ID, "102"),
            (COL_TITLE, "Async in Practice"),
            (COL_OWNER, "A. Poe"),
            (COL_ROOM, "Robertson Auditorium"),
            (COL_SCHEDULED_AT, "2026-10-17 11:00:00"),
            (COL_DURATION, "30"),
            (COL_FORMAT, "30 minute talk"),
        ],
        vec![
            (COL_SESSION_ID, "103"),
            (COL_TITLE, "Typed Pipelines"),
            (COL_OWNER, "R. Roe"),
            (COL_ROOM, "Fisher Hall"),
            (COL_SCHEDULED_AT, "2026-10-17 10:00:00"),
            (COL_DURATION, "30"),
            (COL_FORMAT, "30 minute talk"),
        ],
        vec![
            (COL_SESSION_ID, "104"),
            (COL_TITLE, "Hands-on Wasm"),
            (COL_OWNER, "M. Moe"),
            (COL_ROOM, "Workshop Loft"),
            (COL_SCHEDULED_AT, "2026-10-17 13:00:00"),
            (COL_DURATION, "90"),
            (COL_FORMAT, "90 minute workshop"),
        ],
        vec![
            (COL_SESSION_ID, "105"),
            (COL_TITLE, "Backup Talk"),
            (COL_OWNER, "B. Bee"),
        ],
    ]
}

fn table_from(cells: &[Cells]) -> RawTable {
    let mut columns: Vec<String> = Vec::new();
    for row in cells {
        for (col, _) in row {
            if !columns.iter().any(|c| c == col) {
                columns.push(col.to_string());
            }
        }
    }
    let mut table = RawTable::new(columns);
    for (index, row) in cells.iter().enumerate() {
        let mut raw = RawRow::new(index);
        for (col, value) in row {
            raw.set(*col, *value);
        }
        table.push_row(raw);
    }
    table
}

fn config() -> RunSheetConfig {
    RunSheetConfig::from_toml_str(
        r#"
[event]
name = "RustConf 2026"

[[group]]
name = "workshops"
format_contains = "workshop"
exclusive = false

[[group]]
name = "robertson"
room_contains = "Robertson"
detail_includes_private = true

[[group]]
name = "fisher"
room_contains = "Fisher"
detail_includes_private = true
"#,
    )
    .unwrap()
}

#[test]
fn test_full_run_produces_a_view_pair_per_group() {
    let set = build_run_sheets(&table_from(&schedule_cells()), &table_from(&session_cells()), &config())
        .unwrap();
    let names: Vec<_> = set.views.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "summary_workshops",
            "detail_workshops",
            "summary_robertson",
            "detail_robertson",
            "summary_fisher",
            "detail_fisher",
            "summary_unassigned",
            "detail_unassigned",
        ]
    );
}

#[test]
fn test_exact_match_renders_summary_without_private_attrs() {
    // The schedule row and session row agree on (room, start); resolution
    // must be diagnostic-free for that session, the summary view must omit
    // pronouns, and the detail view must carry them.
    let set = build_run_sheets(&table_from(&schedule_cells()), &table_from(&session_cells()), &config())
        .unwrap();

    let session = set.sessions.iter().find(|s| s.session_id == "101").unwrap();
    assert!(session.scheduled);
    assert_eq!(session.speakers, vec!["J. Doe"]);

    let summary = set.views.iter().find(|v| v.name == "summary_robertson").unwrap();
    assert_eq!(summary.rows[0][2], "Intro to Rust");
    assert!(!summary.columns.iter().any(|c| c == "Pronouns"));

    let detail = set.views.iter().find(|v| v.name == "detail_robertson").unwrap();
    let idx = detail.columns.iter().position(|c| c == "Pronouns").unwrap();
    assert_eq!(detail.rows[0][idx], "she/her");
}

#[test]
fn test_summary_views_never_leak_private_fields() {
    let set = build_run_sheets(&table_from(&schedule_cells()), &table_from(&session_cells()), &config())
        .unwrap();
    for view in set.views.iter().filter(|v| v.kind == ViewKind::Summary) {
        assert!(!view.includes_private, "{} marked private", view.name);
        for row in &view.rows {
            assert!(
                !row.iter().any(|cell| cell.contains(PHONE)),
                "{} leaked a contact field",
                view.name
            );
        }
    }
    // Detail views of groups not marked private must not leak either.
    let workshops = set.views.iter().find(|v| v.name == "detail_workshops").unwrap();
    assert!(workshops.rows.iter().all(|row| !row.iter().any(|c| c.contains(PHONE))));
}

#[test]
fn test_unscheduled_session_is_retained_and_flagged() {
    let set = build_run_sheets(&table_from(&schedule_cells()), &table_from(&session_cells()), &config())
        .unwrap();

    let appearances: Vec<_> = set
        .views
        .iter()
        .filter(|v| v.kind == ViewKind::Summary)
        .filter(|v| v.rows.iter().any(|row| row[2] == "Backup Talk"))
        .map(|v| v.name.clone())
        .collect();
    assert_eq!(appearances, vec!["summary_unassigned"]);

    assert!(set
        .diagnostics
        .iter()
        .any(|d| d.tag() == "unscheduled_session" && d.to_string().contains("105")));
    assert!(set
        .diagnostics
        .iter()
        .any(|d| d.tag() == "unassigned_session" && d.to_string().contains("105")));

    // The alternate speaker has no room; views render the standing label.
    let unassigned = set.views.iter().find(|v| v.name == "summary_unassigned").unwrap();
    assert_eq!(unassigned.rows[0][0], "Any room");
}

#[test]
fn test_view_rows_follow_the_timeline() {
    let set = build_run_sheets(&table_from(&schedule_cells()), &table_from(&session_cells()), &config())
        .unwrap();
    let robertson = set.views.iter().find(|v| v.name == "summary_robertson").unwrap();
    let titles: Vec<_> = robertson.rows.iter().map(|r| r[2].as_str()).collect();
    assert_eq!(titles, vec!["Intro to Rust", "Async in Practice"]);
    let times: Vec<_> = robertson.rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(times, vec!["10:00 AM", "11:00 AM"]);
}

#[test]
fn test_rerun_on_unchanged_input_is_identical() {
    let schedule = table_from(&schedule_cells());
    let sessions = table_from(&session_cells());
    let first = build_run_sheets(&schedule, &sessions, &config()).unwrap();
    let second = build_run_sheets(&schedule, &sessions, &config()).unwrap();
    assert_eq!(first.views, second.views);
    assert_eq!(first.diagnostics, second.diagnostics);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Shuffling input row order must not change any projected view; row
    // order inside a view comes from the group sort key alone.
    #[test]
    fn test_views_independent_of_input_row_order(
        schedule_perm in Just((0..4usize).collect::<Vec<_>>()).prop_shuffle(),
        session_perm in Just((0..5usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let baseline = build_run_sheets(
            &table_from(&schedule_cells()),
            &table_from(&session_cells()),
            &config(),
        )
        .unwrap();

        let schedule: Vec<_> = schedule_perm.iter().map(|&i| schedule_cells()[i].clone()).collect();
        let sessions: Vec<_> = session_perm.iter().map(|&i| session_cells()[i].clone()).collect();
        let shuffled = build_run_sheets(&table_from(&schedule), &table_from(&sessions), &config())
            .unwrap();

        prop_assert_eq!(&shuffled.views, &baseline.views);
    }
}
