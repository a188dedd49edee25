use crate::config::AppConfig;
use crate::contacts::ContactRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub contacts: Arc<dyn ContactRepository>,
}

impl AppState {
    pub fn from_parts(config: Arc<AppConfig>, contacts: Arc<dyn ContactRepository>) -> Self {
        Self { config, contacts }
    }

    #[cfg(test)]
    pub fn fake(contacts: Arc<dyn ContactRepository>) -> Self {
        use crate::config::DatabaseConfig;

        let config = Arc::new(AppConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".into(),
                auth_token: "test".into(),
                max_connections: 1,
            },
            host: "127.0.0.1".into(),
            port: 8080,
        });
        Self::from_parts(config, contacts)
    }
}
