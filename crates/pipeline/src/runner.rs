//! Run orchestration.
//!
//! The catalog and activity stages have no ordering constraint between them
//! and run concurrently on blocking worker threads. The fact stage starts
//! only after both complete, because it reads the songs table back from the
//! staging area the catalog stage wrote. Publication is all-or-nothing: a
//! failure anywhere discards the staging directory and the destination is
//! left exactly as the previous run published it.

use tokio::task::JoinError;
use tracing::{error, info};

use etl_core::{Error, PipelineConfig, Result};
use lake::{publish::Staging, reader, source, table::Table, writer};

use crate::activity::{self, PlaybackEvent};
use crate::catalog;
use crate::fact::{self, SongIndex};

/// Row and skip counts for one completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
    pub malformed_catalog: u64,
    pub malformed_activity: u64,
    pub catalog_missing_key: u64,
    pub users_missing_key: u64,
    pub bad_timestamps: u64,
    pub unmatched_plays: u64,
}

#[derive(Debug)]
struct CatalogStage {
    songs: usize,
    artists: usize,
    malformed: u64,
    missing_key: u64,
}

#[derive(Debug)]
struct ActivityStage {
    events: Vec<PlaybackEvent>,
    users: usize,
    time: usize,
    malformed: u64,
    missing_key: u64,
    bad_timestamps: u64,
}

/// One run-to-completion ETL pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline: either all five tables are published, or
    /// nothing new is.
    pub async fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;
        let staging = Staging::create(&self.config.output_root)?;

        match self.run_stages(&staging).await {
            Ok(summary) => {
                staging.publish()?;
                info!(
                    songs = summary.songs,
                    artists = summary.artists,
                    users = summary.users,
                    time = summary.time,
                    songplays = summary.songplays,
                    unmatched_plays = summary.unmatched_plays,
                    "pipeline run complete"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "pipeline run failed, publishing nothing");
                staging.discard();
                Err(e)
            }
        }
    }

    async fn run_stages(&self, staging: &Staging) -> Result<RunSummary> {
        let song_data = self.config.song_data();
        let songs_dir = staging.table_dir(Table::Songs);
        let artists_dir = staging.table_dir(Table::Artists);
        let catalog_task = tokio::task::spawn_blocking(move || {
            run_catalog_stage(&song_data, &songs_dir, &artists_dir)
        });

        let log_data = self.config.log_data();
        let users_dir = staging.table_dir(Table::Users);
        let time_dir = staging.table_dir(Table::Time);
        let user_dedup = self.config.user_dedup;
        let activity_task = tokio::task::spawn_blocking(move || {
            run_activity_stage(&log_data, &users_dir, &time_dir, user_dedup)
        });

        let (catalog_out, activity_out) = tokio::try_join!(catalog_task, activity_task)
            .map_err(join_error)?;
        let catalog_out = catalog_out?;
        let activity_out = activity_out?;

        // Fact stage: songs must be durable before this read.
        let songs_dir = staging.table_dir(Table::Songs);
        let songplay_dir = staging.table_dir(Table::Songplays);
        let events = activity_out.events;
        let fact_task = tokio::task::spawn_blocking(move || {
            run_fact_stage(&songs_dir, &songplay_dir, &events)
        });
        let (songplays, unmatched_plays) = fact_task.await.map_err(join_error)??;

        Ok(RunSummary {
            songs: catalog_out.songs,
            artists: catalog_out.artists,
            users: activity_out.users,
            time: activity_out.time,
            songplays,
            malformed_catalog: catalog_out.malformed,
            malformed_activity: activity_out.malformed,
            catalog_missing_key: catalog_out.missing_key,
            users_missing_key: activity_out.missing_key,
            bad_timestamps: activity_out.bad_timestamps,
            unmatched_plays,
        })
    }
}

fn run_catalog_stage(
    song_data: &std::path::Path,
    songs_dir: &std::path::Path,
    artists_dir: &std::path::Path,
) -> Result<CatalogStage> {
    let batch = source::scan_catalog(song_data)?;
    let songs = catalog::extract_songs(&batch.records);
    let artists = catalog::extract_artists(&batch.records);
    writer::write_songs(songs_dir, &songs.rows)?;
    writer::write_artists(artists_dir, &artists.rows)?;
    info!(
        records = batch.records.len(),
        songs = songs.rows.len(),
        artists = artists.rows.len(),
        skipped = batch.skipped,
        "catalog stage complete"
    );
    Ok(CatalogStage {
        songs: songs.rows.len(),
        artists: artists.rows.len(),
        malformed: batch.skipped,
        missing_key: songs.missing_key + artists.missing_key,
    })
}

fn run_activity_stage(
    log_data: &std::path::Path,
    users_dir: &std::path::Path,
    time_dir: &std::path::Path,
    user_dedup: etl_core::DedupPolicy,
) -> Result<ActivityStage> {
    let batch = source::scan_activity(log_data)?;
    let total = batch.records.len();
    let stream = activity::playback_events(batch.records);
    let users = activity::extract_users(&stream.events, user_dedup);
    let time = activity::extract_time(&stream.events);
    writer::write_users(users_dir, &users.rows)?;
    writer::write_time(time_dir, &time)?;
    info!(
        records = total,
        playback = stream.events.len(),
        users = users.rows.len(),
        time = time.len(),
        skipped = batch.skipped,
        "activity stage complete"
    );
    Ok(ActivityStage {
        events: stream.events,
        users: users.rows.len(),
        time: time.len(),
        malformed: batch.skipped,
        missing_key: users.missing_key,
        bad_timestamps: stream.bad_timestamps,
    })
}

fn run_fact_stage(
    songs_dir: &std::path::Path,
    songplay_dir: &std::path::Path,
    events: &[PlaybackEvent],
) -> Result<(usize, u64)> {
    let songs = reader::read_songs(songs_dir)?;
    let index = SongIndex::build(&songs);
    let out = fact::build_songplays(events, &index);
    writer::write_songplays(songplay_dir, &out.rows)?;
    info!(
        songplays = out.rows.len(),
        unmatched = out.unmatched,
        "fact stage complete"
    );
    Ok((out.rows.len(), out.unmatched))
}

fn join_error(e: JoinError) -> Error {
    Error::internal(format!("pipeline worker panicked: {e}"))
}
