use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;

// Default timeout functions
fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

fn default_db_max_connections() -> u32 {
  10
}

fn default_log_level() -> String {
  "numeris=debug,actix_web=info".to_string()
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  #[serde(default)]
  pub log: LogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  pub host: String,
  pub port: u16,
  pub user: String,
  #[serde(default)]
  pub password: Option<String>,
  pub name: String,
  #[serde(default = "default_db_max_connections")]
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
  /// Connection options for sqlx. The password is left out when not configured.
  ///
  /// Built field by field so credentials never need URL escaping.
  pub fn connect_options(&self) -> PgConnectOptions {
    let options = PgConnectOptions::new()
      .host(&self.host)
      .port(self.port)
      .username(&self.user)
      .database(&self.name)
      .ssl_mode(PgSslMode::Disable);

    match self.password.as_deref().filter(|p| !p.is_empty()) {
      Some(password) => options.password(password),
      None => options,
    }
  }

  /// Connection target for logs, without credentials
  pub fn display_target(&self) -> String {
    format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
  }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// `EnvFilter` directive, overridden by `RUST_LOG`
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Append logs to this file instead of stderr
  #[serde(default)]
  pub file: Option<String>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      file: None,
    }
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with NUMERIS_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the NUMERIS_ prefix and are separated by double underscores:
  /// - `NUMERIS_SERVER__PORT=50056`
  /// - `NUMERIS_DATABASE__HOST=db.internal`
  /// - `NUMERIS_DATABASE__PASSWORD=secret`
  /// - `NUMERIS_LOG__FILE=/var/log/numeris.log`
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` if the default file is missing, a file is not
  /// valid TOML, or a required value is missing or has the wrong type.
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("NUMERIS")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn database(password: Option<&str>) -> DatabaseConfig {
    DatabaseConfig {
      host: "localhost".to_string(),
      port: 5432,
      user: "postgres".to_string(),
      password: password.map(str::to_string),
      name: "numeris_invoice_dev_db".to_string(),
      max_connections: 5,
      connect_timeout_seconds: 5,
      acquire_timeout_seconds: 3,
    }
  }

  #[test]
  fn test_config_structure() {
    let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 50056

            [database]
            host = "localhost"
            port = 5432
            user = "postgres"
            name = "numeris_invoice_dev_db"
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 50056);
    assert_eq!(config.database.host, "localhost");
    assert_eq!(config.database.password, None);
    assert_eq!(config.database.max_connections, 10); // default
    assert_eq!(config.database.connect_timeout_seconds, 5); // default
    assert_eq!(config.database.acquire_timeout_seconds, 3); // default
    assert_eq!(config.log.level, "numeris=debug,actix_web=info"); // default
    assert!(config.log.file.is_none());
  }

  #[test]
  fn test_log_section_overrides() {
    let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            host = "db"
            port = 5433
            user = "app"
            password = "s3cret"
            name = "invoices"

            [log]
            level = "info"
            file = "numeris.log"
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.log.level, "info");
    assert_eq!(config.log.file.as_deref(), Some("numeris.log"));
    assert_eq!(config.database.password.as_deref(), Some("s3cret"));
  }

  #[test]
  fn test_connect_options_without_password() {
    for password in [None, Some("")] {
      let options = database(password).connect_options();

      assert_eq!(options.get_host(), "localhost");
      assert_eq!(options.get_port(), 5432);
      assert_eq!(options.get_username(), "postgres");
      assert_eq!(options.get_database(), Some("numeris_invoice_dev_db"));
    }
  }

  #[test]
  fn test_connect_options_keep_reserved_characters_in_password() {
    let mut db = database(Some("p@ss/w#rd:?"));
    db.host = "db.internal".to_string();
    db.user = "app".to_string();
    db.name = "numeris".to_string();

    let options = db.connect_options();

    assert_eq!(options.get_host(), "db.internal");
    assert_eq!(options.get_username(), "app");
    assert_eq!(options.get_database(), Some("numeris"));
  }

  #[test]
  fn test_display_target_hides_password() {
    let db = database(Some("hunter2"));

    assert_eq!(
      db.display_target(),
      "postgres@localhost:5432/numeris_invoice_dev_db"
    );
    assert!(!db.display_target().contains("hunter2"));
  }
}
