//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::auth::RateLimiter;
use crate::config::Config;
use crate::redemption::RedemptionService;
use crate::store::{PerkStore, PgPerkStore};

const RATE_WINDOW: Duration = Duration::from_secs(60);

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PerkStore>,
    pub redemptions: RedemptionService,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Rate limiter for issue/confirm routes
    pub rate_limiter: RateLimiter,
    pub issue_rate_limit: u32,
    pub confirm_rate_limit: u32,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let mut state = Self::with_store(Arc::new(PgPerkStore::new(pool)), &config.jwt_secret);
        state.issue_rate_limit = config.issue_rate_limit;
        state.confirm_rate_limit = config.confirm_rate_limit;
        state.rate_limiter = RateLimiter::new(RATE_WINDOW, config.trusted_proxies.clone());
        Ok(state)
    }

    /// State over an arbitrary store, with default rate limits
    pub fn with_store(store: Arc<dyn PerkStore>, jwt_secret: &str) -> Self {
        Self {
            redemptions: RedemptionService::new(store.clone()),
            store,
            jwt_secret: jwt_secret.to_owned(),
            rate_limiter: RateLimiter::default(),
            issue_rate_limit: 10,
            confirm_rate_limit: 30,
        }
    }
}
