//! Property-style tests over the published star schema.

use std::collections::HashSet;

use integration_tests::fixtures::{
    catalog_record, playback_record, row_count, string_values, TestLake,
};
use etl_core::DedupPolicy;
use pipeline::Pipeline;

fn catalog(song_id: &str, title: &str, artist_id: &str) -> serde_json::Value {
    let mut rec = catalog_record();
    rec["song_id"] = song_id.into();
    rec["title"] = title.into();
    rec["artist_id"] = artist_id.into();
    rec
}

fn play(user_id: &str, song: &str, ts: i64) -> serde_json::Value {
    let mut rec = playback_record();
    rec["userId"] = user_id.into();
    rec["song"] = song.into();
    rec["ts"] = serde_json::json!(ts);
    rec
}

#[tokio::test]
async fn songplay_keys_are_covered_by_dimensions() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog("S1", "Song A", "AR1"));
    lake.add_catalog_file("TRBBBBB", &catalog("S2", "Song B", "AR2"));
    lake.add_log_file(
        "events",
        &[
            play("7", "Song A", 946_684_800_000),
            play("8", "Song B", 946_684_860_000),
            play("9", "Not In Catalog", 946_684_920_000),
        ],
    );

    let summary = Pipeline::new(lake.config()).run().await.unwrap();
    assert_eq!(summary.songplays, 2);
    assert_eq!(summary.unmatched_plays, 1);

    let songs: HashSet<_> = string_values(&lake.table_dir("songs"), "songs", "song_id")
        .into_iter()
        .flatten()
        .collect();
    let artists: HashSet<_> = string_values(&lake.table_dir("artists"), "artists", "artist_id")
        .into_iter()
        .flatten()
        .collect();
    for song_id in string_values(&lake.table_dir("songplay"), "songplay", "song_id") {
        assert!(songs.contains(&song_id.unwrap()));
    }
    for artist_id in string_values(&lake.table_dir("songplay"), "songplay", "artist_id") {
        assert!(artists.contains(&artist_id.unwrap()));
    }
}

#[tokio::test]
async fn time_rows_count_playback_events_not_distinct_timestamps() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    // three playback events, two sharing a timestamp, plus one Home view
    let mut home = playback_record();
    home["page"] = "Home".into();
    lake.add_log_file(
        "events",
        &[
            play("7", "Song A", 946_684_800_000),
            play("8", "Song A", 946_684_800_000),
            play("9", "Song A", 946_684_860_000),
            home,
        ],
    );

    let summary = Pipeline::new(lake.config()).run().await.unwrap();
    assert_eq!(summary.time, 3);
    assert_eq!(row_count(&lake.table_dir("time"), "time"), 3);

    let distinct: HashSet<_> = string_values(&lake.table_dir("time"), "time", "start_time")
        .into_iter()
        .collect();
    assert_eq!(distinct.len(), 2);
}

#[tokio::test]
async fn users_are_unique_per_run() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    lake.add_log_file(
        "events",
        &[
            play("7", "Song A", 1_000),
            play("7", "Song A", 2_000),
            play("8", "Song A", 3_000),
        ],
    );

    let summary = Pipeline::new(lake.config()).run().await.unwrap();
    assert_eq!(summary.users, 2);

    let ids = string_values(&lake.table_dir("users"), "users", "user_id");
    let distinct: HashSet<_> = ids.iter().collect();
    assert_eq!(distinct.len(), ids.len());
}

#[tokio::test]
async fn user_level_follows_configured_dedup_policy() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    let mut upgraded = play("7", "Song A", 2_000);
    upgraded["level"] = "paid".into();
    lake.add_log_file("events", &[play("7", "Song A", 1_000), upgraded]);

    let mut config = lake.config();
    config.user_dedup = DedupPolicy::Last;
    Pipeline::new(config).run().await.unwrap();

    assert_eq!(
        string_values(&lake.table_dir("users"), "users", "level"),
        vec![Some("paid".to_string())]
    );
}

#[tokio::test]
async fn title_collisions_fan_out_one_row_per_song() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog("S1", "Song A", "AR1"));
    lake.add_catalog_file("TRBBBBB", &catalog("S2", "Song A", "AR2"));
    lake.add_log_file("events", &[play("7", "Song A", 946_684_800_000)]);

    let summary = Pipeline::new(lake.config()).run().await.unwrap();
    assert_eq!(summary.songplays, 2);

    let ids: HashSet<_> = string_values(&lake.table_dir("songplay"), "songplay", "song_id")
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(ids, HashSet::from(["S1".to_string(), "S2".to_string()]));
}

#[tokio::test]
async fn malformed_records_are_skipped_not_fatal() {
    let lake = TestLake::new();
    lake.add_catalog_file("TRAAAAA", &catalog_record());
    // a second catalog file with invalid JSON
    lake.add_catalog_file("TRBBBBB", &serde_json::Value::Null);
    lake.add_log_file("events", &[play("7", "Song A", 946_684_800_000)]);

    let summary = Pipeline::new(lake.config()).run().await.unwrap();
    assert_eq!(summary.songs, 1);
    assert_eq!(summary.malformed_catalog, 1);
    assert_eq!(summary.songplays, 1);
}
