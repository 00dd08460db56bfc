use std::env;
use std::fmt;

use auth::TokenConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,

    /// Token lifetime in seconds
    pub token_expiry: i64,

    #[serde(default)]
    pub leeway_seconds: i64,

    /// Refresh expired tokens transparently on protected routes
    #[serde(default)]
    pub auto_refresh: bool,
}

impl JwtConfig {
    /// Settings for the token core.
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.secret.clone(), self.token_expiry).with_leeway(self.leeway_seconds)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("auto_refresh", &self.auto_refresh)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__TOKEN_EXPIRY=3600 overrides jwt.token_expiry
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults_and_conversion() {
        let jwt: JwtConfig = serde_json::from_value(serde_json::json!({
            "secret": "config_test_secret_at_least_32_bytes",
            "token_expiry": 3600
        }))
        .unwrap();

        assert_eq!(jwt.leeway_seconds, 0);
        assert!(!jwt.auto_refresh);

        let token_config = jwt.token_config();
        assert_eq!(token_config.token_expiry, 3600);
        assert_eq!(token_config.leeway_seconds, 0);
    }

    #[test]
    fn test_jwt_config_debug_redacts_secret() {
        let jwt = JwtConfig {
            secret: "super-secret-value".to_string(),
            token_expiry: 60,
            leeway_seconds: 5,
            auto_refresh: true,
        };

        assert!(!format!("{:?}", jwt).contains("super-secret-value"));
    }
}
