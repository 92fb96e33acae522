//! Supported database engines.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of engines the facade can talk to.
///
/// Numeric identifiers are stable: `1` MySQL, `2` SQLite, `3` PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Engine {
    /// Includes MariaDB
    MySql = 1,
    Sqlite = 2,
    Postgres = 3,
}

/// How positional bind parameters are written in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::MySql, Engine::Sqlite, Engine::Postgres];

    /// Canonical protocol name.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite3",
            Self::Postgres => "postgres",
        }
    }

    /// Get the display name for this engine.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
            Self::Postgres => "PostgreSQL",
        }
    }

    /// Get the default port for this engine.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::MySql => Some(3306),
            Self::Sqlite => None,
            Self::Postgres => Some(5432),
        }
    }

    pub fn placeholder(&self) -> Placeholder {
        match self {
            Self::Postgres => Placeholder::Dollar,
            Self::MySql | Self::Sqlite => Placeholder::Question,
        }
    }

    /// Detect the engine from a connection string scheme.
    pub fn from_dsn(dsn: &str) -> Option<Self> {
        let lower = dsn.to_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySql)
        } else if lower.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protocol_name())
    }
}

impl TryFrom<u32> for Engine {
    type Error = DbError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::MySql),
            2 => Ok(Self::Sqlite),
            3 => Ok(Self::Postgres),
            other => Err(DbError::InvalidEngine(other.to_string())),
        }
    }
}

impl FromStr for Engine {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite3" | "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(DbError::InvalidEngine(s.to_string())),
        }
    }
}

impl TryFrom<String> for Engine {
    type Error = DbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Engine> for String {
    fn from(engine: Engine) -> Self {
        engine.protocol_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_u32() {
        assert_eq!(Engine::try_from(1).unwrap(), Engine::MySql);
        assert_eq!(Engine::try_from(2).unwrap(), Engine::Sqlite);
        assert_eq!(Engine::try_from(3).unwrap(), Engine::Postgres);
        assert!(matches!(
            Engine::try_from(999),
            Err(DbError::InvalidEngine(v)) if v == "999"
        ));
        assert!(Engine::try_from(0).is_err());
    }

    #[test]
    fn test_engine_from_str() {
        assert_eq!("mysql".parse::<Engine>().unwrap(), Engine::MySql);
        assert_eq!("SQLite3".parse::<Engine>().unwrap(), Engine::Sqlite);
        assert_eq!("postgresql".parse::<Engine>().unwrap(), Engine::Postgres);
        assert!(matches!(
            "oracle".parse::<Engine>(),
            Err(DbError::InvalidEngine(_))
        ));
    }

    #[test]
    fn test_protocol_names_round_trip() {
        for engine in Engine::ALL {
            assert_eq!(engine.protocol_name().parse::<Engine>().unwrap(), engine);
            assert_eq!(Engine::try_from(engine as u32).unwrap(), engine);
        }
    }

    #[test]
    fn test_engine_from_dsn() {
        assert_eq!(
            Engine::from_dsn("postgres://localhost/db"),
            Some(Engine::Postgres)
        );
        assert_eq!(
            Engine::from_dsn("mysql://localhost/db"),
            Some(Engine::MySql)
        );
        assert_eq!(Engine::from_dsn("sqlite://app.db"), Some(Engine::Sqlite));
        assert_eq!(Engine::from_dsn("unknown://localhost"), None);
    }

    #[test]
    fn test_engine_serde() {
        let json = serde_json::to_string(&Engine::Sqlite).unwrap();
        assert_eq!(json, "\"sqlite3\"");
        let engine: Engine = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(engine, Engine::Postgres);
        assert!(serde_json::from_str::<Engine>("\"db2\"").is_err());
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(Engine::MySql.default_port(), Some(3306));
        assert_eq!(Engine::Postgres.default_port(), Some(5432));
        assert_eq!(Engine::Sqlite.default_port(), None);
        assert_eq!(Engine::Postgres.placeholder(), Placeholder::Dollar);
    }
}
