//! End-to-end tests for listening profile aggregation
//!
//! Covers window merging, track and artist dedup, the artist lookup cap,
//! snapshot determinism, and how aggregation failures interact with the
//! on-disk history.

mod common;

use chrono::NaiveDate;
use common::{
    answer, artist, scripted_orchestrator, test_app, tool_call, track, CatalogCall, StubCatalog,
    TEST_USER,
};
use maestro::catalog::{CatalogError, TimeWindow, Track};
use maestro::config::OrchestratorSettings;
use maestro::profile::ProfileStore;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn refresh_call(username: &str) -> maestro::agent::Directive {
    tool_call(
        "refresh_listening_profile",
        serde_json::json!({ "username": username }),
    )
}

// =============================================================================
// Window Merging and Dedup
// =============================================================================

#[tokio::test]
async fn test_windows_merge_in_order_with_dedup() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(
                TimeWindow::ShortTerm,
                vec![track("A", "a1"), track("B", "a2")],
            )
            .with_top_tracks(
                TimeWindow::MediumTerm,
                vec![track("B", "a2"), track("C", "a3")],
            )
            .with_top_tracks(
                TimeWindow::LongTerm,
                vec![track("C", "a3"), track("D", "a4")],
            ),
    );

    let profile = app.aggregator.aggregate(TEST_USER).await.unwrap();

    let ids: Vec<&str> = profile
        .top_tracks
        .tracks
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
    assert_eq!(profile.top_tracks.count, 4);

    // Windows were queried shortest first
    let windows: Vec<TimeWindow> = app
        .catalog
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            CatalogCall::GetTopTracks { window, .. } => Some(window),
            _ => None,
        })
        .collect();
    assert_eq!(windows, TimeWindow::all());
}

#[tokio::test]
async fn test_artists_keep_first_seen_order() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(
                TimeWindow::ShortTerm,
                vec![track("t1", "a2"), track("t2", "a1"), track("t3", "a2")],
            )
            .with_top_tracks(TimeWindow::MediumTerm, vec![track("t4", "a3")])
            .with_artists(vec![
                artist("a1", &[]),
                artist("a2", &[]),
                artist("a3", &[]),
            ]),
    );

    let profile = app.aggregator.aggregate(TEST_USER).await.unwrap();

    let ids: Vec<&str> = profile
        .top_artists
        .artists
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a2", "a1", "a3"]);
}

#[tokio::test]
async fn test_artist_lookup_is_capped_at_one_batch() {
    // 100 distinct artists across two windows, well past the batch limit.
    let short: Vec<Track> = (0..50)
        .map(|i| track(&format!("s{i}"), &format!("a{i}")))
        .collect();
    let medium: Vec<Track> = (0..50)
        .map(|i| track(&format!("m{i}"), &format!("a{}", 50 + i)))
        .collect();
    let artists = (0..100).map(|i| artist(&format!("a{i}"), &["rock"])).collect();

    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(TimeWindow::ShortTerm, short)
            .with_top_tracks(TimeWindow::MediumTerm, medium)
            .with_artists(artists),
    );

    let profile = app.aggregator.aggregate(TEST_USER).await.unwrap();

    // All tracks kept, but the genre lookup went out with exactly the cap.
    assert_eq!(profile.top_tracks.count, 100);
    let batch = app
        .catalog
        .calls()
        .into_iter()
        .find_map(|c| match c {
            CatalogCall::GetSeveralArtists { count } => Some(count),
            _ => None,
        })
        .unwrap();
    assert_eq!(batch, 50);
    assert_eq!(profile.top_artists.count, 50);
}

#[tokio::test]
async fn test_genres_flatten_dedup_and_sort() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(
                TimeWindow::ShortTerm,
                vec![track("t1", "a1"), track("t2", "a2")],
            )
            .with_artists(vec![
                artist("a1", &["rock", "indie rock"]),
                artist("a2", &["shoegaze", "rock"]),
            ]),
    );

    let profile = app.aggregator.aggregate(TEST_USER).await.unwrap();

    let genres: Vec<&str> = profile.top_genres.genres.iter().map(|s| s.as_str()).collect();
    assert_eq!(genres, vec!["indie rock", "rock", "shoegaze"]);
    assert_eq!(profile.top_genres.count, 3);
}

// =============================================================================
// Determinism and Failure Handling
// =============================================================================

#[tokio::test]
async fn test_same_day_snapshots_are_identical() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(
                TimeWindow::ShortTerm,
                vec![track("A", "a1"), track("B", "a2")],
            )
            .with_top_tracks(TimeWindow::LongTerm, vec![track("C", "a1")])
            .with_artists(vec![artist("a1", &["jazz"]), artist("a2", &["soul"])]),
    );

    let first = app.aggregator.aggregate_at(TEST_USER, day(1)).await.unwrap();
    let second = app.aggregator.aggregate_at(TEST_USER, day(1)).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_window_failure_aborts_aggregation() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(TimeWindow::ShortTerm, vec![track("A", "a1")])
            .fail_window(TimeWindow::MediumTerm),
    );

    let result = app.aggregator.aggregate(TEST_USER).await;

    assert!(matches!(result, Err(CatalogError::Remote(_))));
    // No partial profile was assembled: the artist lookup never went out.
    let calls = app.catalog.calls();
    assert!(!calls
        .iter()
        .any(|c| matches!(c, CatalogCall::GetSeveralArtists { .. })));
}

// =============================================================================
// Profile History Through the Tools
// =============================================================================

#[tokio::test]
async fn test_refresh_tool_appends_history() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(TimeWindow::ShortTerm, vec![track("A", "a1")])
            .with_artists(vec![artist("a1", &["rock"])]),
    );

    let orch = scripted_orchestrator(
        &app,
        vec![refresh_call(TEST_USER), answer("refreshed")],
        OrchestratorSettings::default(),
    );
    let turn = orch.run_turn("refresh my profile").await.unwrap();
    assert_eq!(turn.final_message(), Some("refreshed"));
    assert_eq!(app.profiles.load(TEST_USER).unwrap().unwrap().len(), 1);

    // A second refresh appends, it does not overwrite.
    let orch = scripted_orchestrator(
        &app,
        vec![refresh_call(TEST_USER), answer("refreshed again")],
        OrchestratorSettings::default(),
    );
    orch.run_turn("do it again").await.unwrap();

    let history = app.profiles.load(TEST_USER).unwrap().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].top_tracks, history[1].top_tracks);
}

#[tokio::test]
async fn test_failed_refresh_saves_nothing() {
    let app = test_app(StubCatalog::new().fail_window(TimeWindow::ShortTerm));

    let orch = scripted_orchestrator(
        &app,
        vec![
            refresh_call(TEST_USER),
            answer("the catalog is having trouble right now"),
        ],
        OrchestratorSettings::default(),
    );
    let turn = orch.run_turn("refresh my profile").await.unwrap();

    // The failure went back to the model as an observation, not a crash.
    let observation = turn
        .transcript
        .iter()
        .find(|m| m.tool_name.as_deref() == Some("refresh_listening_profile"))
        .unwrap();
    assert!(observation.content.starts_with("Error: "));
    assert_eq!(
        turn.final_message(),
        Some("the catalog is having trouble right now")
    );
    // And nothing was written.
    assert!(app.profiles.load(TEST_USER).unwrap().is_none());
}

#[tokio::test]
async fn test_read_tool_returns_latest_snapshot() {
    let app = test_app(
        StubCatalog::new()
            .with_top_tracks(TimeWindow::ShortTerm, vec![track("A", "a1")])
            .with_artists(vec![artist("a1", &["rock"])]),
    );

    let first = app.aggregator.aggregate_at(TEST_USER, day(1)).await.unwrap();
    app.profiles.save(&first).unwrap();
    let second = app.aggregator.aggregate_at(TEST_USER, day(2)).await.unwrap();
    app.profiles.save(&second).unwrap();

    let orch = scripted_orchestrator(
        &app,
        vec![
            tool_call(
                "read_listening_profile",
                serde_json::json!({ "username": TEST_USER }),
            ),
            answer("here is what you like"),
        ],
        OrchestratorSettings::default(),
    );
    let turn = orch.run_turn("what do I listen to?").await.unwrap();

    let observation = turn
        .transcript
        .iter()
        .find(|m| m.tool_name.as_deref() == Some("read_listening_profile"))
        .unwrap();
    assert!(observation.content.contains("2024-06-02"));
    assert!(observation.content.contains("Track A"));
}
