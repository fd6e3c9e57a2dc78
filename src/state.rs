use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    storage::ObjectStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig, storage: Arc<dyn ObjectStorage>) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            pool,
            orm,
            config: Arc::new(config),
            storage,
        }
    }
}
