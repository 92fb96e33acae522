//! Configuration handling for multidb.
//!
//! [`DbConfig`] is the structured input to the DSN builder and connect
//! supervisor. [`Config`] is the command-line/environment surface of the
//! `multidb` binary and converts into a `DbConfig`.

use crate::db::Engine;
use crate::error::{DbError, DbResult};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_HOST: &str = "localhost";

// Pool configuration defaults
pub const DEFAULT_MAX_OPEN_CONNECTIONS: u32 = 10;
pub const DEFAULT_MAX_OPEN_CONNECTIONS_SQLITE: u32 = 1;
pub const DEFAULT_MAX_IDLE_CONNECTIONS: u32 = 1;
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_IDLE_TIME: Duration = Duration::from_secs(600);
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Driver parameters appended to the DSN query string. Keys are unique and
/// iteration order is stable, so the built DSN is deterministic.
pub type ConnectionParams = BTreeMap<String, String>;

/// Parameters every new [`DbConfig`] starts with.
///
/// - MySQL: connect, read and write timeouts
/// - PostgreSQL: connect timeout (seconds), statement timeout (milliseconds), TLS off
/// - SQLite: private cache, in-memory database
pub fn default_params(engine: Engine) -> ConnectionParams {
    let timeout = humantime::format_duration(DEFAULT_CONNECT_TIMEOUT).to_string();
    let pairs: Vec<(&str, String)> = match engine {
        Engine::MySql => vec![
            ("timeout", timeout.clone()),
            ("read_timeout", timeout.clone()),
            ("write_timeout", timeout),
        ],
        Engine::Postgres => vec![
            (
                "connect_timeout",
                DEFAULT_CONNECT_TIMEOUT.as_secs().to_string(),
            ),
            (
                "statement_timeout",
                DEFAULT_CONNECT_TIMEOUT.as_millis().to_string(),
            ),
            ("sslmode", "disable".to_string()),
        ],
        Engine::Sqlite => vec![
            ("cache", "private".to_string()),
            ("mode", "memory".to_string()),
        ],
    };
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Connection pool tuning.
///
/// sqlx pools are fixed once built, so these settings are applied when the
/// pool is opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolOptions {
    /// Maximum open connections (default: 10, or 1 for SQLite)
    pub max_open_connections: Option<u32>,
    /// Idle connections kept warm by the pool (default: 1)
    pub max_idle_connections: Option<u32>,
    /// Maximum lifetime of a single connection (default: 30m)
    #[serde(default, with = "humantime_opt")]
    pub max_lifetime: Option<Duration>,
    /// Idle time after which a surplus connection is closed (default: 10m)
    #[serde(default, with = "humantime_opt")]
    pub max_idle_time: Option<Duration>,
    /// Connection acquire timeout (default: 30s)
    #[serde(default, with = "humantime_opt")]
    pub acquire_timeout: Option<Duration>,
    /// Whether to test connections before use (default: true)
    pub test_before_acquire: Option<bool>,
}

impl PoolOptions {
    pub fn set_max_open_conns(&mut self, n: u32) {
        self.max_open_connections = Some(n);
    }

    pub fn set_max_idle_conns(&mut self, n: u32) {
        self.max_idle_connections = Some(n);
    }

    pub fn set_conn_max_lifetime(&mut self, lifetime: Duration) {
        self.max_lifetime = Some(lifetime);
    }

    pub fn set_conn_max_idle_time(&mut self, idle: Duration) {
        self.max_idle_time = Some(idle);
    }

    /// Get max_open_connections with default value based on engine.
    pub fn max_open_or_default(&self, engine: Engine) -> u32 {
        self.max_open_connections.unwrap_or(match engine {
            Engine::Sqlite => DEFAULT_MAX_OPEN_CONNECTIONS_SQLITE,
            _ => DEFAULT_MAX_OPEN_CONNECTIONS,
        })
    }

    /// Get max_idle_connections with default value, never above the open limit.
    pub fn max_idle_or_default(&self, engine: Engine) -> u32 {
        self.max_idle_connections
            .unwrap_or(DEFAULT_MAX_IDLE_CONNECTIONS)
            .min(self.max_open_or_default(engine))
    }

    pub fn max_lifetime_or_default(&self) -> Duration {
        self.max_lifetime.unwrap_or(DEFAULT_MAX_LIFETIME)
    }

    pub fn max_idle_time_or_default(&self) -> Duration {
        self.max_idle_time.unwrap_or(DEFAULT_MAX_IDLE_TIME)
    }

    pub fn acquire_timeout_or_default(&self) -> Duration {
        self.acquire_timeout.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT)
    }

    pub fn test_before_acquire_or_default(&self) -> bool {
        self.test_before_acquire.unwrap_or(true)
    }

    /// Validate pool options and return an error if invalid.
    pub fn validate(&self) -> DbResult<()> {
        if self.max_open_connections == Some(0) {
            return Err(DbError::config(
                "max_open_connections must be greater than 0",
            ));
        }
        if let (Some(idle), Some(open)) = (self.max_idle_connections, self.max_open_connections) {
            if idle > open {
                return Err(DbError::config(format!(
                    "max_idle_connections ({idle}) cannot exceed max_open_connections ({open})"
                )));
            }
        }
        if self.acquire_timeout == Some(Duration::ZERO) {
            return Err(DbError::config("acquire_timeout must be greater than 0"));
        }
        Ok(())
    }
}

/// Structured connection configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DbConfig {
    pub engine: Engine,
    #[serde(default)]
    pub host: String,
    /// Falls back to the engine's default port when unset.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: String,
    /// Contains sensitive data - never log
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub database: String,
    /// Deadline for establishing the pool (default: 5s)
    #[serde(default, with = "humantime_opt")]
    pub connect_timeout: Option<Duration>,
    #[serde(default)]
    pub params: ConnectionParams,
    #[serde(default)]
    pub pool: PoolOptions,
}

impl DbConfig {
    /// Start a configuration for `engine` with that engine's default parameters.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            host: DEFAULT_HOST.to_string(),
            port: None,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            connect_timeout: None,
            params: default_params(engine),
            pool: PoolOptions::default(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set or replace one driver parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replace all driver parameters, dropping the engine defaults.
    pub fn params(mut self, params: ConnectionParams) -> Self {
        self.params = params;
        self
    }

    pub fn pool(mut self, pool: PoolOptions) -> Self {
        self.pool = pool;
        self
    }

    pub fn connect_timeout_or_default(&self) -> Duration {
        self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or(self.engine.default_port())
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("connect_timeout", &self.connect_timeout)
            .field("params", &self.params)
            .field("pool", &self.pool)
            .finish()
    }
}

/// Serde adapter for optional durations written as humantime strings ("5s", "250ms").
mod humantime_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Parse a `key=value` command-line parameter.
fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Command-line configuration for the `multidb` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "multidb",
    about = "Run a SQL statement against MySQL, PostgreSQL or SQLite through a pooled connection",
    version,
    author
)]
pub struct Config {
    /// Database engine (mysql, postgres, sqlite3)
    #[arg(short, long, env = "MULTIDB_ENGINE")]
    pub engine: String,

    /// Database host
    #[arg(long, default_value = DEFAULT_HOST, env = "MULTIDB_HOST")]
    pub host: String,

    /// Database port (defaults to the engine's standard port)
    #[arg(long, env = "MULTIDB_PORT")]
    pub port: Option<u16>,

    /// Database user
    #[arg(short, long, default_value = "", env = "MULTIDB_USER")]
    pub user: String,

    /// Database password
    #[arg(long, default_value = "", env = "MULTIDB_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database name (file name without ".db" for SQLite)
    #[arg(short, long, env = "MULTIDB_DATABASE")]
    pub database: String,

    /// Connection timeout, e.g. "5s" or "500ms"
    #[arg(long, default_value = "5s", env = "MULTIDB_CONNECT_TIMEOUT")]
    pub connect_timeout: String,

    /// Driver parameter as key=value; replaces the engine defaults when given.
    /// Can be specified multiple times.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Maximum open connections
    #[arg(long, env = "MULTIDB_MAX_OPEN_CONNS")]
    pub max_open_conns: Option<u32>,

    /// Idle connections kept in the pool
    #[arg(long, env = "MULTIDB_MAX_IDLE_CONNS")]
    pub max_idle_conns: Option<u32>,

    /// Query timeout, e.g. "30s"
    #[arg(long, env = "MULTIDB_QUERY_TIMEOUT")]
    pub query_timeout: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MULTIDB_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MULTIDB_JSON_LOGS")]
    pub json_logs: bool,

    /// Treat the statement as a query and print its rows
    #[arg(short, long)]
    pub query: bool,

    /// SQL statement to run
    pub sql: String,

    /// Positional bind arguments, passed as text
    pub args: Vec<String>,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the structured connection configuration.
    pub fn to_db_config(&self) -> DbResult<DbConfig> {
        let engine: Engine = self.engine.parse()?;
        let connect_timeout = parse_duration("connect_timeout", &self.connect_timeout)?;

        let mut config = DbConfig::new(engine)
            .host(&self.host)
            .user(&self.user)
            .password(&self.password)
            .database(&self.database)
            .connect_timeout(connect_timeout);
        config.port = self.port;

        if !self.params.is_empty() {
            config = config.params(self.params.iter().cloned().collect());
        }

        let mut pool = PoolOptions::default();
        if let Some(n) = self.max_open_conns {
            pool.set_max_open_conns(n);
        }
        if let Some(n) = self.max_idle_conns {
            pool.set_max_idle_conns(n);
        }
        pool.validate()?;

        Ok(config.pool(pool))
    }

    /// Get the query timeout as a Duration, if one was given.
    pub fn query_timeout_duration(&self) -> DbResult<Option<Duration>> {
        self.query_timeout
            .as_deref()
            .map(|raw| parse_duration("query_timeout", raw))
            .transpose()
    }
}

fn parse_duration(name: &str, raw: &str) -> DbResult<Duration> {
    humantime::parse_duration(raw)
        .map_err(|e| DbError::config(format!("invalid {name} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Config {
        let mut argv = vec!["multidb"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_params_per_engine() {
        let mysql = default_params(Engine::MySql);
        assert_eq!(mysql.get("timeout").map(String::as_str), Some("5s"));
        assert_eq!(mysql.get("read_timeout").map(String::as_str), Some("5s"));
        assert_eq!(mysql.get("write_timeout").map(String::as_str), Some("5s"));

        let pg = default_params(Engine::Postgres);
        assert_eq!(pg.get("connect_timeout").map(String::as_str), Some("5"));
        assert_eq!(pg.get("statement_timeout").map(String::as_str), Some("5000"));
        assert_eq!(pg.get("sslmode").map(String::as_str), Some("disable"));

        let sqlite = default_params(Engine::Sqlite);
        assert_eq!(sqlite.get("cache").map(String::as_str), Some("private"));
        assert_eq!(sqlite.get("mode").map(String::as_str), Some("memory"));
    }

    #[test]
    fn test_db_config_builder() {
        let config = DbConfig::new(Engine::Postgres)
            .host("db.internal")
            .user("app")
            .password("secret")
            .database("orders")
            .param("application_name", "multidb");

        assert_eq!(config.port_or_default(), Some(5432));
        assert_eq!(config.connect_timeout_or_default(), DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.params.len(), 4);
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_db_config_params_replace_defaults() {
        let config = DbConfig::new(Engine::Sqlite).params(ConnectionParams::new());
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_db_config_deserialize() {
        let config: DbConfig = serde_json::from_str(
            r#"{"engine":"mysql","host":"h","port":3307,"user":"u","password":"p",
                "database":"d","connect_timeout":"250ms","pool":{"max_open_connections":4}}"#,
        )
        .unwrap();
        assert_eq!(config.engine, Engine::MySql);
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.pool.max_open_connections, Some(4));
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_db_config_deserialize_invalid_engine() {
        let result = serde_json::from_str::<DbConfig>(r#"{"engine":"oracle"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_db_config_serialize_skips_password() {
        let config = DbConfig::new(Engine::MySql).password("hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_pool_options_defaults() {
        let opts = PoolOptions::default();
        assert_eq!(opts.max_open_or_default(Engine::MySql), 10);
        assert_eq!(opts.max_open_or_default(Engine::Sqlite), 1);
        assert_eq!(opts.max_idle_or_default(Engine::Postgres), 1);
        assert_eq!(opts.max_lifetime_or_default(), DEFAULT_MAX_LIFETIME);
        assert_eq!(opts.max_idle_time_or_default(), DEFAULT_MAX_IDLE_TIME);
        assert_eq!(opts.acquire_timeout_or_default(), DEFAULT_ACQUIRE_TIMEOUT);
        assert!(opts.test_before_acquire_or_default());
    }

    #[test]
    fn test_pool_options_setters() {
        let mut opts = PoolOptions::default();
        opts.set_max_open_conns(20);
        opts.set_max_idle_conns(5);
        opts.set_conn_max_lifetime(Duration::from_secs(60));
        opts.set_conn_max_idle_time(Duration::from_secs(15));

        assert_eq!(opts.max_open_or_default(Engine::MySql), 20);
        assert_eq!(opts.max_idle_or_default(Engine::MySql), 5);
        assert_eq!(opts.max_lifetime_or_default(), Duration::from_secs(60));
        assert_eq!(opts.max_idle_time_or_default(), Duration::from_secs(15));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_pool_options_idle_clamped_to_open() {
        let mut opts = PoolOptions::default();
        opts.set_max_idle_conns(8);
        assert_eq!(opts.max_idle_or_default(Engine::Sqlite), 1);
    }

    #[test]
    fn test_pool_options_validation_max_zero() {
        let mut opts = PoolOptions::default();
        opts.set_max_open_conns(0);
        assert!(matches!(opts.validate(), Err(DbError::Config { .. })));
    }

    #[test]
    fn test_pool_options_validation_idle_exceeds_open() {
        let mut opts = PoolOptions::default();
        opts.set_max_open_conns(2);
        opts.set_max_idle_conns(3);
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_cli_to_db_config() {
        let config = cli(&[
            "--engine",
            "postgres",
            "--database",
            "app",
            "--connect-timeout",
            "2s",
            "--max-open-conns",
            "3",
            "SELECT 1",
        ]);
        let db = config.to_db_config().unwrap();
        assert_eq!(db.engine, Engine::Postgres);
        assert_eq!(db.host, DEFAULT_HOST);
        assert_eq!(db.connect_timeout, Some(Duration::from_secs(2)));
        assert_eq!(db.pool.max_open_connections, Some(3));
        assert_eq!(db.params, default_params(Engine::Postgres));
        assert_eq!(config.sql, "SELECT 1");
    }

    #[test]
    fn test_cli_params_replace_defaults() {
        let config = cli(&[
            "-e",
            "sqlite3",
            "-d",
            "local",
            "--param",
            "mode=rwc",
            "SELECT 1",
        ]);
        let db = config.to_db_config().unwrap();
        assert_eq!(db.params.len(), 1);
        assert_eq!(db.params.get("mode").map(String::as_str), Some("rwc"));
    }

    #[test]
    fn test_cli_invalid_engine() {
        let config = cli(&["-e", "oracle", "-d", "x", "SELECT 1"]);
        assert!(matches!(
            config.to_db_config(),
            Err(DbError::InvalidEngine(_))
        ));
    }

    #[test]
    fn test_cli_invalid_timeout() {
        let config = cli(&[
            "-e",
            "mysql",
            "-d",
            "x",
            "--connect-timeout",
            "soon",
            "SELECT 1",
        ]);
        assert!(matches!(
            config.to_db_config(),
            Err(DbError::Config { .. })
        ));
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("sslmode=require"),
            Ok(("sslmode".to_string(), "require".to_string()))
        );
        assert_eq!(
            parse_param("options=a=b"),
            Ok(("options".to_string(), "a=b".to_string()))
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }
}
