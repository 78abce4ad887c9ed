// backoffice_server/src/config.rs

use backoffice::{CacheLimits, PoolSettings};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(raw: &str) -> Result<Self> {
    match raw.to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected pretty or json", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub pool: PoolSettings,

  // The auth proxy owns sign-in; these are only link targets.
  pub sign_in_url: String,
  pub sign_out_url: String,
  /// Send anonymous visitors of mutation routes to `sign_in_url`.
  pub require_sign_in: bool,

  pub cache: CacheLimits,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_env("SERVER_PORT", 8080u16)?;
    let database_url = get_env("DATABASE_URL")?;

    let defaults = PoolSettings::default();
    let pool = PoolSettings {
      max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.max_connections)?,
      idle_timeout: Duration::from_secs(parse_env("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout.as_secs())?),
      acquire_timeout: Duration::from_secs(parse_env("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout.as_secs())?),
    };
    if pool.max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    let sign_in_url = get_env("AUTH_SIGN_IN_URL").unwrap_or_else(|_| "/oauth2/start".to_string());
    let sign_out_url = get_env("AUTH_SIGN_OUT_URL").unwrap_or_else(|_| "/oauth2/sign_out".to_string());
    let require_sign_in = parse_env("REQUIRE_SIGN_IN", false)?;

    let cache_defaults = CacheLimits::default();
    let cache = CacheLimits {
      capacity: parse_env("LISTING_CACHE_CAPACITY", cache_defaults.capacity)?,
      ttl: Duration::from_secs(parse_env("LISTING_CACHE_TTL_SECS", cache_defaults.ttl.as_secs())?),
    };

    let log_format = parse_env("LOG_FORMAT", LogFormat::Pretty)?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      pool,
      sign_in_url,
      sign_out_url,
      require_sign_in,
      cache,
      log_format,
    })
  }

  /// Defaults with no database, for handler tests over in-memory stores.
  #[cfg(test)]
  pub fn local() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: String::new(),
      pool: PoolSettings::default(),
      sign_in_url: "/oauth2/start".to_string(),
      sign_out_url: "/oauth2/sign_out".to_string(),
      require_sign_in: false,
      cache: CacheLimits::default(),
      log_format: LogFormat::Pretty,
    }
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

/// Subscriber format for a configuration load; a failed load logs in the default format.
pub fn startup_log_format(loaded: &Result<AppConfig>) -> LogFormat {
  loaded.as_ref().map_or(LogFormat::Pretty, |cfg| cfg.log_format)
}

/// Reads `var_name`, falling back to `default` when unset.
fn parse_env<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(var_name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn log_format_accepts_known_names_only() {
    assert_eq!("JSON".parse::<LogFormat>().ok(), Some(LogFormat::Json));
    assert_eq!("pretty".parse::<LogFormat>().ok(), Some(LogFormat::Pretty));
    assert!(matches!("xml".parse::<LogFormat>(), Err(AppError::Config(_))));
  }

  #[test]
  fn startup_logging_follows_loaded_config() {
    let mut config = AppConfig::local();
    config.log_format = LogFormat::Json;
    assert_eq!(startup_log_format(&Ok(config)), LogFormat::Json);
    assert_eq!(
      startup_log_format(&Err(AppError::Config("DATABASE_URL missing".into()))),
      LogFormat::Pretty
    );
  }

  #[test]
  fn unset_variable_uses_default() {
    let port: u16 = parse_env("BACKOFFICE_TEST_SURELY_UNSET_PORT", 9090).unwrap();
    assert_eq!(port, 9090);
  }
}
