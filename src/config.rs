use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{TessellaError, TessellaResult};

const DEFAULT_CONFIG_NAME: &str = "tessella.json";

pub const ENV_DATABASE_URL: &str = "TESSELLA_DATABASE_URL";
pub const ENV_USER: &str = "TESSELLA_USER";
pub const ENV_DRY_RUN: &str = "TESSELLA_DRY_RUN";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DatabaseConfig {
    Sqlite { path: Option<String> },
    Postgres { url: String },
    Mysql { url: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub acquire_timeout_ms: Option<u64>,
    pub idle_timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TessellaConfig {
    pub database: DatabaseConfig,
    pub pool: Option<PoolConfig>,
    /// Email every bulk write is attributed to unless the write supplies its own.
    pub user: Option<String>,
    /// When set, every bulk-write scope rolls back instead of committing.
    #[serde(default)]
    pub dry_run: bool,
}

impl TessellaConfig {
    pub fn default_sqlite(path: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig::Sqlite {
                path: Some(path.into()),
            },
            pool: None,
            user: None,
            dry_run: false,
        }
    }

    pub fn from_url(url: &str) -> TessellaResult<Self> {
        let database = if let Some(rest) = url.strip_prefix("sqlite://") {
            let path = match rest.split_once('?') {
                Some((path, _)) => path,
                None => rest,
            };
            DatabaseConfig::Sqlite {
                path: Some(path.to_string()),
            }
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            DatabaseConfig::Postgres {
                url: url.to_string(),
            }
        } else if url.starts_with("mysql://") {
            DatabaseConfig::Mysql {
                url: url.to_string(),
            }
        } else {
            return Err(TessellaError::config(format!(
                "unsupported database url scheme: {url}"
            )));
        };
        Ok(Self {
            database,
            pool: None,
            user: None,
            dry_run: false,
        })
    }

    /// Read the process environment once, at the entry point. Operations never
    /// consult the environment themselves.
    pub fn from_env() -> TessellaResult<Self> {
        let url = env::var(ENV_DATABASE_URL)
            .map_err(|_| TessellaError::config(format!("{ENV_DATABASE_URL} is not set")))?;
        let mut config = Self::from_url(&url)?;
        config.user = env::var(ENV_USER).ok().filter(|value| !value.is_empty());
        config.dry_run = env::var(ENV_DRY_RUN)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Ok(config)
    }

    pub fn load_or_init(base_dir: &Path, default_sqlite_path: &Path) -> TessellaResult<Self> {
        fs::create_dir_all(base_dir)
            .map_err(|err| TessellaError::storage(format!("create config dir: {err}")))?;
        let config_path = base_dir.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .map_err(|err| TessellaError::storage(format!("read config: {err}")))?;
            let config: TessellaConfig =
                serde_json::from_str(&raw).map_err(|err| TessellaError::invalid(err.to_string()))?;
            return Ok(config);
        }
        let default = TessellaConfig::default_sqlite(default_sqlite_path.to_string_lossy());
        let payload = serde_json::to_string_pretty(&default)
            .map_err(|err| TessellaError::storage(format!("serialize config: {err}")))?;
        fs::write(&config_path, payload)
            .map_err(|err| TessellaError::storage(format!("write config: {err}")))?;
        Ok(default)
    }

    pub fn sqlite_path(&self, base_dir: &Path) -> TessellaResult<PathBuf> {
        match &self.database {
            DatabaseConfig::Sqlite { path } => {
                let path = path.clone().unwrap_or_else(|| "tessella.sqlite".to_string());
                let candidate = PathBuf::from(path);
                if candidate.is_absolute() {
                    Ok(candidate)
                } else {
                    Ok(base_dir.join(candidate))
                }
            }
            _ => Err(TessellaError::invalid("config is not sqlite backend")),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.database {
            DatabaseConfig::Sqlite { .. } => "sqlite",
            DatabaseConfig::Postgres { .. } => "postgres",
            DatabaseConfig::Mysql { .. } => "mysql",
        }
    }

    pub fn connection_url(&self) -> Option<&str> {
        match &self.database {
            DatabaseConfig::Sqlite { .. } => None,
            DatabaseConfig::Postgres { url } | DatabaseConfig::Mysql { url } => Some(url.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{DatabaseConfig, TessellaConfig, ENV_DATABASE_URL, ENV_DRY_RUN, ENV_USER};

    #[test]
    fn from_url_recognizes_backends() {
        let config = TessellaConfig::from_url("sqlite:///tmp/t.sqlite?mode=rwc").expect("sqlite");
        assert!(config.connection_url().is_none());
        match config.database {
            DatabaseConfig::Sqlite { path } => assert_eq!(path.as_deref(), Some("/tmp/t.sqlite")),
            other => panic!("expected sqlite, got {other:?}"),
        }
        let config =
            TessellaConfig::from_url("postgres://localhost/census").expect("postgres");
        assert_eq!(config.backend_name(), "postgres");
        assert_eq!(config.connection_url(), Some("postgres://localhost/census"));
        let config = TessellaConfig::from_url("mysql://localhost/census").expect("mysql");
        assert_eq!(config.backend_name(), "mysql");
        assert!(TessellaConfig::from_url("redis://localhost").is_err());
    }

    #[test]
    fn from_env_reads_everything_once() {
        env::set_var(ENV_DATABASE_URL, "sqlite://env.sqlite");
        env::set_var(ENV_USER, "census@example.gov");
        env::set_var(ENV_DRY_RUN, "TRUE");
        let config = TessellaConfig::from_env().expect("env config");
        assert_eq!(config.user.as_deref(), Some("census@example.gov"));
        assert!(config.dry_run);
        env::remove_var(ENV_DATABASE_URL);
        env::remove_var(ENV_USER);
        env::remove_var(ENV_DRY_RUN);
        assert!(TessellaConfig::from_env().is_err());
    }
}
