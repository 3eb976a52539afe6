/*
 * Responsibility
 * - 環境変数や設定の読み込み (AUTH_SECRET, token TTL, 同時実行数の上限など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::MAX_TTL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // HS256 signing secret (never printed)
    pub auth_secret: String,
    pub auth_token_ttl: Duration,

    pub concurrency_limit: usize,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("auth_token_ttl", &self.auth_token_ttl)
            .field("concurrency_limit", &self.concurrency_limit)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let auth_secret = var("AUTH_SECRET").ok_or(ConfigError::Missing("AUTH_SECRET"))?;
        if auth_secret.is_empty() {
            return Err(ConfigError::Invalid("AUTH_SECRET"));
        }

        let auth_token_ttl_seconds: u64 = match var("AUTH_TOKEN_TTL_SECONDS") {
            Some(s) => s
                .parse()
                .map_err(|_| ConfigError::Invalid("AUTH_TOKEN_TTL_SECONDS"))?,
            None => 3600, // 1 hour
        };
        if auth_token_ttl_seconds == 0 || auth_token_ttl_seconds > MAX_TTL.as_secs() {
            return Err(ConfigError::Invalid("AUTH_TOKEN_TTL_SECONDS"));
        }

        let concurrency_limit = match var("CONCURRENCY_LIMIT") {
            Some(s) => s
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("CONCURRENCY_LIMIT"))?,
            None => 64,
        };

        let request_timeout_seconds = match var("REQUEST_TIMEOUT_SECONDS") {
            Some(s) => s
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes = match var("REQUEST_BODY_LIMIT_BYTES") {
            Some(s) => s
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            auth_secret,
            auth_token_ttl: Duration::from_secs(auth_token_ttl_seconds),
            concurrency_limit,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            request_body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("AUTH_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth_token_ttl, Duration::from_secs(3600));
        assert_eq!(config.concurrency_limit, 64);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("AUTH_SECRET"));
        assert_eq!(
            load(&[("AUTH_SECRET", "")]).unwrap_err(),
            ConfigError::Invalid("AUTH_SECRET")
        );
    }

    #[test]
    fn ttl_must_be_positive() {
        for ttl in ["0", "-5", "soon", "99999999999"] {
            assert_eq!(
                load(&[("AUTH_SECRET", "s"), ("AUTH_TOKEN_TTL_SECONDS", ttl)]).unwrap_err(),
                ConfigError::Invalid("AUTH_TOKEN_TTL_SECONDS")
            );
        }
    }

    #[test]
    fn malformed_http_limits_are_rejected() {
        for timeout in ["0", "-1", "half a minute"] {
            assert_eq!(
                load(&[("AUTH_SECRET", "s"), ("REQUEST_TIMEOUT_SECONDS", timeout)]).unwrap_err(),
                ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS")
            );
        }
        for limit in ["-1", "1MiB"] {
            assert_eq!(
                load(&[("AUTH_SECRET", "s"), ("REQUEST_BODY_LIMIT_BYTES", limit)]).unwrap_err(),
                ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES")
            );
        }
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load(&[
            ("AUTH_SECRET", "s"),
            ("PORT", "8080"),
            ("APP_ENV", "PROD"),
            ("AUTH_TOKEN_TTL_SECONDS", "60"),
            ("CONCURRENCY_LIMIT", "0"),
            ("REQUEST_TIMEOUT_SECONDS", "5"),
            ("REQUEST_BODY_LIMIT_BYTES", "2048"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.auth_token_ttl, Duration::from_secs(60));
        assert_eq!(config.concurrency_limit, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.request_body_limit_bytes, 2048);
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = load(&[("AUTH_SECRET", "hunter2")]).unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
