//! Command-line entry point.
//!
//! Argument surface, logging setup, and wiring of the collaborators; all
//! sync behavior lives in the member crates.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bridge_desktop::ReqwestHttpClient;
use bridge_traits::http::HttpClient;
use bridge_traits::photos::PhotoLibrary;
use core_auth::{AuthProvider, StoredCredentialProvider};
use core_catalog::{CatalogCache, RefreshPolicy, SnapshotStore};
use core_sync::{SyncConfig, SyncCoordinator};
use provider_google_photos::PhotosConnector;

/// Replicates a local folder structure as albums in Google Photos
#[derive(Debug, Parser)]
#[command(name = "album-sync", version)]
struct Cli {
    /// Path to the local folder containing albums
    #[arg(long)]
    local_album_path: PathBuf,

    /// Sync only folders whose path contains this prefix, e.g. 2004
    #[arg(long)]
    folder_prefix: Option<String>,

    /// Detailed output about progress
    #[arg(long)]
    verbose: bool,

    /// Re-download the media item catalog from Google Photos
    #[arg(long)]
    refresh_media_items: bool,

    /// Re-download the album catalog from Google Photos
    #[arg(long)]
    refresh_albums: bool,

    /// Group media items under the nearest YYYY-MM ancestor folder (default)
    #[arg(long, overrides_with = "no_monthly_albums")]
    monthly_albums: bool,

    /// Name albums after the folder directly containing the media items
    #[arg(long)]
    no_monthly_albums: bool,

    /// Path to the authorized-user credential file
    #[arg(long, default_value = "client_credentials.json")]
    credentials: PathBuf,

    /// Directory holding the catalog snapshot files
    #[arg(long, default_value = ".")]
    state_dir: PathBuf,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let auth: Arc<dyn AuthProvider> = Arc::new(
        StoredCredentialProvider::load(http_client.clone(), &cli.credentials)
            .await
            .context("loading credentials")?,
    );

    let library: Arc<dyn PhotoLibrary> = Arc::new(PhotosConnector::new(http_client, auth));
    let cache = CatalogCache::new(SnapshotStore::new(&cli.state_dir));
    let coordinator = SyncCoordinator::new(library, cache);

    let config = SyncConfig {
        root: cli.local_album_path,
        folder_prefix: cli.folder_prefix,
        monthly_albums: cli.monthly_albums || !cli.no_monthly_albums,
        refresh: RefreshPolicy {
            media_items: cli.refresh_media_items,
            albums: cli.refresh_albums,
        },
    };

    let stats = coordinator.run(&config).await.context("sync run failed")?;

    info!(
        albums = stats.albums_processed,
        created = stats.albums_created,
        uploaded = stats.files_uploaded,
        linked = stats.media_linked,
        "Sync finished"
    );

    Ok(())
}
