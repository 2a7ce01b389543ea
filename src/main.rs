//! Sparkify star-schema ETL
//!
//! Transforms song catalog records and user-activity logs into five
//! partitioned Parquet relations: songs, artists, users, time, songplay.
//! A run either publishes all five tables or publishes nothing.

use anyhow::{Context, Result};
use tracing::info;

use etl_core::PipelineConfig;
use pipeline::Pipeline;
use telemetry::init_tracing_from_env;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting sparkify ETL v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        source = %config.source_root.display(),
        output = %config.output_root.display(),
        user_dedup = ?config.user_dedup,
        "Loaded pipeline config"
    );

    let summary = Pipeline::new(config)
        .run()
        .await
        .context("pipeline run failed")?;

    info!(
        songs = summary.songs,
        artists = summary.artists,
        users = summary.users,
        time = summary.time,
        songplays = summary.songplays,
        "All tables published"
    );
    Ok(())
}

/// Load configuration from defaults, `config/default.toml`, and
/// `SPARKIFY_*` environment variables, in increasing precedence.
fn load_config() -> Result<PipelineConfig> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&PipelineConfig::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .prefix("SPARKIFY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
