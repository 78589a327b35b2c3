use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, StoreKind};
use crate::db;
use crate::users::{InMemoryUserStore, PgUserStore, UserService, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserService,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = match config.store {
            StoreKind::Postgres => {
                let pool = db::init_pool(&config).await?;
                db::health_check(&pool).await?;
                info!("database connected");
                Arc::new(PgUserStore::new(pool))
            }
            StoreKind::Memory => {
                info!("using in-memory user store");
                Arc::new(InMemoryUserStore::new())
            }
        };
        Ok(Self::from_parts(Arc::new(config), store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> Self {
        Self {
            config,
            users: UserService::new(store),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store: StoreKind::Memory,
            database_url: None,
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            api_prefix: crate::config::DEFAULT_API_PREFIX.into(),
        });
        Self::from_parts(config, Arc::new(InMemoryUserStore::new()))
    }
}
