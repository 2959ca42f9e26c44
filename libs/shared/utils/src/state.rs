use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StoreBackend};
use shared_database::{InMemoryStore, NutritionStore, SupabaseStore};

/// Shared handler state: configuration plus the injected store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn NutritionStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn NutritionStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Builds the store selected by `config.store_backend`.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn NutritionStore> = match config.store_backend {
            StoreBackend::Memory => Arc::new(InMemoryStore::new()),
            StoreBackend::Supabase => Arc::new(SupabaseStore::new(&config)),
        };
        info!("Using {} store", store.backend_name());

        Self::new(config, store)
    }
}
