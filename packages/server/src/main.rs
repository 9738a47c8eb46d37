use std::sync::Arc;

use stayhub_common::storage::filesystem::FilesystemBlobStore;
use tracing::{Level, info};

use stayhub_server::config::AppConfig;
use stayhub_server::state::AppState;
use stayhub_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    seed::seed_comforts(&db).await?;
    seed::ensure_indexes(&db).await?;

    let blob_store = FilesystemBlobStore::new(
        config.storage.root_dir.clone(),
        config.storage.max_photo_size,
    )
    .await?;

    let state = AppState {
        db,
        blob_store: Arc::new(blob_store),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("StayHub server listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
