pub use crate::utils::database;
use crate::utils::config::{AppEnvironment, Config};
use async_trait::async_trait;
use chrono::Duration;

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u16,
    pub url: String,
}

#[derive(Clone)]
pub struct PaymentContext {
    pub api_endpoint: String,
    pub secret_key: String,
    pub callback_url: Option<String>,
}

#[derive(Clone)]
pub struct SessionContext {
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub db_conn: database::DatabaseConnection,
    pub payment: PaymentContext,
    pub session: SessionContext,
}

impl Context {
    pub fn new(config: Config, db_conn: database::DatabaseConnection) -> Self {
        Context {
            app: AppContext {
                host: config.app.host,
                environment: config.app.environment,
                port: config.app.port,
                url: config.app.url,
            },
            db_conn,
            payment: PaymentContext {
                api_endpoint: config.payment.api_endpoint,
                secret_key: config.payment.secret_key,
                callback_url: config.payment.callback_url,
            },
            session: SessionContext {
                access_token_ttl: Duration::minutes(config.session.access_token_ttl_minutes),
                refresh_token_ttl: Duration::days(config.session.refresh_token_ttl_days),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to connect to the database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Result<Context, ContextError>;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Result<Context, ContextError> {
        let db_conn =
            database::connect(&self.database.url, self.database.max_connections).await?;
        database::migrate(&db_conn).await?;

        Ok(Context::new(self, db_conn))
    }
}
