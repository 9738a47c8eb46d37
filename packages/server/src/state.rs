use std::sync::Arc;

use sea_orm::DatabaseConnection;
use stayhub_common::storage::BlobStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blob_store: Arc<dyn BlobStore>,
    pub config: AppConfig,
}
