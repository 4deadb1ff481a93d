use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(skip_serializing)]
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub secret: SecretString,
    /// Lifetime of issued bearer tokens, in minutes.
    pub access_token_expiration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// When false, registration always creates `USER` accounts.
    pub allow_role_selection: bool,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Secrets are skipped when serializing the defaults, so they are
        // re-added explicitly before the environment layer.
        let defaults = Self::default();
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .set_default("database.password", defaults.database.password.expose_secret())?
            .set_default("jwt.secret", defaults.jwt.secret.expose_secret())?
            // e.g., SHOPLINE__JWT__SECRET="change-me"
            .add_source(
                config::Environment::with_prefix("SHOPLINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Constructs the database connection string.
    pub fn connection_string(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: "password".to_string().into(),
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string().into(),
            access_token_expiration_minutes: 24 * 60,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_role_selection: true,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by serde
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
