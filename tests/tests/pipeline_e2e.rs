//! End-to-end tests: raw JSON sources in, published Parquet star schema out.

use integration_tests::fixtures::{
    catalog_record, i64_values, playback_record, row_count, string_values, TestLake,
};
use pipeline::Pipeline;

#[tokio::test]
async fn single_match_scenario_produces_one_row_per_table() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    lake.add_log_file("2000-01-01-events", &[playback_record()]);

    let summary = Pipeline::new(lake.config()).run().await.unwrap();

    assert_eq!(summary.songs, 1);
    assert_eq!(summary.artists, 1);
    assert_eq!(summary.users, 1);
    assert_eq!(summary.time, 1);
    assert_eq!(summary.songplays, 1);
    assert_eq!(summary.unmatched_plays, 0);

    // Join populated the dimension keys
    assert_eq!(
        string_values(&lake.table_dir("songplay"), "songplay", "song_id"),
        vec![Some("S1".to_string())]
    );
    assert_eq!(
        string_values(&lake.table_dir("songplay"), "songplay", "artist_id"),
        vec![Some("AR1".to_string())]
    );
    assert_eq!(
        string_values(&lake.table_dir("songplay"), "songplay", "start_time"),
        vec![Some("2000-01-01 00:00:00".to_string())]
    );
}

#[tokio::test]
async fn rows_land_in_partitions_matching_their_fields() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    lake.add_log_file("events", &[playback_record()]);

    Pipeline::new(lake.config()).run().await.unwrap();

    assert!(lake
        .table_dir("songs")
        .join("year=2000/artist_id=AR1/part-00000.parquet")
        .is_file());
    assert!(lake
        .table_dir("time")
        .join("year=2000/month=1/part-00000.parquet")
        .is_file());
    assert!(lake
        .table_dir("songplay")
        .join("year=2000/month=1/part-00000.parquet")
        .is_file());
    // unpartitioned tables write a single file at the table root
    assert!(lake.table_dir("artists").join("part-00000.parquet").is_file());
    assert!(lake.table_dir("users").join("part-00000.parquet").is_file());
}

#[tokio::test]
async fn non_playback_pages_contribute_nothing() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    let mut home = playback_record();
    home["page"] = "Home".into();
    lake.add_log_file("events", &[home]);

    let summary = Pipeline::new(lake.config()).run().await.unwrap();

    assert_eq!(summary.users, 0);
    assert_eq!(summary.time, 0);
    assert_eq!(summary.songplays, 0);
    // tables still published, empty but well-formed
    assert_eq!(row_count(&lake.table_dir("users"), "users"), 0);
    assert_eq!(row_count(&lake.table_dir("time"), "time"), 0);
    assert_eq!(row_count(&lake.table_dir("songplay"), "songplay"), 0);
}

#[tokio::test]
async fn duplicate_song_ids_collapse_to_first_occurrence() {
    let lake = TestLake::new();
    let first = catalog_record();
    let mut second = catalog_record();
    second["title"] = "Different Title".into();
    // scan order is name-sorted, so "TRAAAAA" is the first occurrence
    lake.add_catalog_file("TRAAAAA", &first);
    lake.add_catalog_file("TRBBBBB", &second);
    lake.add_log_file("events", &[]);

    let summary = Pipeline::new(lake.config()).run().await.unwrap();

    assert_eq!(summary.songs, 1);
    assert_eq!(
        string_values(&lake.table_dir("songs"), "songs", "title"),
        vec![Some("Song A".to_string())]
    );
}

#[tokio::test]
async fn empty_sources_publish_empty_well_formed_tables() {
    let lake = TestLake::new();
    let summary = Pipeline::new(lake.config()).run().await.unwrap();

    assert_eq!(summary, pipeline::RunSummary::default());
    for table in ["songs", "artists", "users", "time", "songplay"] {
        // read_batches fails if the table or its schema file is missing
        assert_eq!(row_count(&lake.table_dir(table), table), 0);
        assert!(lake.table_dir(table).is_dir());
    }
}

#[tokio::test]
async fn rerun_is_idempotent_except_surrogate_ids() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    let mut other = playback_record();
    other["userId"] = "8".into();
    other["ts"] = serde_json::json!(946_684_860_000_i64);
    lake.add_log_file("events", &[playback_record(), other]);

    let first = Pipeline::new(lake.config()).run().await.unwrap();
    let songs_before = string_values(&lake.table_dir("songs"), "songs", "song_id");
    let users_before = string_values(&lake.table_dir("users"), "users", "user_id");
    let time_before = string_values(&lake.table_dir("time"), "time", "start_time");
    let plays_before = string_values(&lake.table_dir("songplay"), "songplay", "start_time");

    let second = Pipeline::new(lake.config()).run().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(songs_before, string_values(&lake.table_dir("songs"), "songs", "song_id"));
    assert_eq!(users_before, string_values(&lake.table_dir("users"), "users", "user_id"));
    assert_eq!(time_before, string_values(&lake.table_dir("time"), "time", "start_time"));
    assert_eq!(
        plays_before,
        string_values(&lake.table_dir("songplay"), "songplay", "start_time")
    );
}

#[tokio::test]
async fn failed_run_publishes_nothing() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    lake.add_log_file("events", &[playback_record()]);
    let mut config = lake.config();
    // point the log prefix somewhere nonexistent: validation fails the run
    config.log_prefix = "missing_logs".into();

    let err = Pipeline::new(config).run().await.unwrap_err();
    assert!(matches!(err, etl_core::Error::Config(_)));
    assert!(!lake.table_dir("songs").exists());
}

#[tokio::test]
async fn surrogate_ids_are_unique_within_a_run() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    let plays: Vec<_> = (0..10i64)
        .map(|i| {
            let mut rec = playback_record();
            rec["ts"] = serde_json::json!(946_684_800_000_i64 + i * 60_000);
            rec
        })
        .collect();
    lake.add_log_file("events", &plays);

    Pipeline::new(lake.config()).run().await.unwrap();

    let mut ids = i64_values(&lake.table_dir("songplay"), "songplay", "songplay_id");
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert_eq!(count, 10);
}
