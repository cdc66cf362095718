use std::sync::Arc;

use crate::core::config::AppPaths;
use crate::store::SimStore;

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// The store is constructed once here and handed to handlers through axum
/// state; nothing reaches for a global connection.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub store: SimStore,
}

impl AppState {
    /// Initializes state at the default data directory. The process cannot
    /// serve traffic if the store fails to open, so this is fatal.
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        Self::with_paths(AppPaths::new()).await
    }

    /// Initializes state against explicit paths. Tests use this with a
    /// scratch directory.
    pub async fn with_paths(paths: AppPaths) -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(paths);

        let store = SimStore::new(paths.db_path.clone())
            .await
            .map_err(|e| InitializationError::Store(e.into()))?;

        Ok(Arc::new(AppState { paths, store }))
    }
}
