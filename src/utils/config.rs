use std::env;

#[derive(Clone, Debug, PartialEq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u16,
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub api_endpoint: String,
    pub secret_key: String,
    pub callback_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub payment: PaymentConfig,
    pub session: SessionConfig,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value for {0}")]
    Invalid(&'static str),
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let max_connections = parsed_or("DATABASE_MAX_CONNECTIONS", 5u32)?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let port = parsed_or("PORT", 8000u16)?;
        let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let payment_api_endpoint = required("PAYSTACK_API_ENDPOINT")?;
        let payment_secret_key = required("PAYSTACK_SECRET_KEY")?;
        let payment_callback_url = env::var("PAYMENT_CALLBACK_URL").ok();
        let access_token_ttl_minutes = parsed_or("SESSION_ACCESS_TOKEN_TTL_MINUTES", 60i64)?;
        let refresh_token_ttl_days = parsed_or("SESSION_REFRESH_TOKEN_TTL_DAYS", 30i64)?;

        if access_token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid("SESSION_ACCESS_TOKEN_TTL_MINUTES"));
        }

        if refresh_token_ttl_days <= 0 {
            return Err(ConfigError::Invalid("SESSION_REFRESH_TOKEN_TTL_DAYS"));
        }

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            app: AppConfig {
                host,
                environment: AppEnvironment::from(environment),
                port,
                url,
            },
            payment: PaymentConfig {
                api_endpoint: payment_api_endpoint,
                secret_key: payment_secret_key,
                callback_url: payment_callback_url,
            },
            session: SessionConfig {
                access_token_ttl_minutes,
                refresh_token_ttl_days,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_is_the_only_non_development_environment() {
        assert_eq!(
            AppEnvironment::from("production".to_string()),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from("staging".to_string()),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from(String::new()),
            AppEnvironment::Development
        );
    }

    #[test]
    fn unparseable_values_are_reported_by_key() {
        std::env::set_var("FOOD_MARKET_TEST_PORT", "not-a-port");
        assert_eq!(
            parsed_or("FOOD_MARKET_TEST_PORT", 8000u16),
            Err(ConfigError::Invalid("FOOD_MARKET_TEST_PORT"))
        );
        std::env::remove_var("FOOD_MARKET_TEST_PORT");
        assert_eq!(parsed_or("FOOD_MARKET_TEST_PORT", 8000u16), Ok(8000));
    }
}
