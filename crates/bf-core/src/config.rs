//! Configuration types and parsing for brickflow.yml and the process environment
//!
//! Configuration is resolved in three steps: an optional YAML file, then
//! environment overrides, then eager validation against the set of stages
//! that are about to run. Credentials never have defaults.

use crate::error::{CoreError, CoreResult};
use crate::pipeline::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file names looked up in the project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["brickflow.yml", "brickflow.yaml"];

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Relational database the extractor reads from
    #[serde(default)]
    pub source: DatabaseConfig,

    /// Analytics database the loader replaces tables in
    #[serde(default)]
    pub destination: DatabaseConfig,

    /// Paginated REST API the minifig records come from
    #[serde(default)]
    pub api: ApiConfig,

    /// Staging and transformed artifact locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pacing for the paginated fetcher
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// PostgreSQL (default)
    #[default]
    Postgres,
    /// DuckDB file or in-memory database
    DuckDb,
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbType::Postgres => write!(f, "postgres"),
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
///
/// Every field is optional at parse time so that the environment can supply
/// it; [`Config::validate_for`] decides which fields a run actually needs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (postgres or duckdb)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Login role
    #[serde(default)]
    pub user: Option<String>,

    /// Login password
    #[serde(default)]
    pub password: Option<String>,

    /// Server host name or address
    #[serde(default)]
    pub host: Option<String>,

    /// Server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Database name
    #[serde(default)]
    pub name: Option<String>,

    /// DuckDB file path (or `:memory:`)
    #[serde(default)]
    pub path: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_type", &self.db_type)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// Environment variable names for one database connection
#[derive(Debug, Clone, Copy)]
pub struct DbEnvNames {
    pub user: &'static str,
    pub password: &'static str,
    pub host: &'static str,
    pub port: &'static str,
    pub name: &'static str,
}

/// Environment names for the source database
pub const SOURCE_ENV: DbEnvNames = DbEnvNames {
    user: "POSTGRES_USER",
    password: "POSTGRES_PASSWORD",
    host: "POSTGRES_HOST",
    port: "POSTGRES_PORT",
    name: "POSTGRES_DB",
};

/// Environment names for the destination database
pub const DESTINATION_ENV: DbEnvNames = DbEnvNames {
    user: "POSTGRES_USER_DEST",
    password: "POSTGRES_PASSWORD_DEST",
    host: "POSTGRES_HOST_DEST",
    port: "POSTGRES_PORT_DEST",
    name: "POSTGRES_DB_DEST",
};

/// Environment name for the API start URL
pub const API_URL_ENV: &str = "API_URL";

/// Environment name for the API key
pub const API_KEY_ENV: &str = "API_KEY";

impl DatabaseConfig {
    /// Overlay values found in the environment onto this config
    fn apply_env<F>(&mut self, names: &DbEnvNames, lookup: &F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = non_empty(lookup(names.user)) {
            self.user = Some(user);
        }
        if let Some(password) = non_empty(lookup(names.password)) {
            self.password = Some(password);
        }
        if let Some(host) = non_empty(lookup(names.host)) {
            self.host = Some(host);
        }
        if let Some(port) = non_empty(lookup(names.port)) {
            let parsed = port.trim().parse::<u16>().map_err(|_| CoreError::ConfigInvalid {
                message: format!("{} must be a port number, got '{}'", names.port, port),
            })?;
            self.port = Some(parsed);
        }
        if let Some(name) = non_empty(lookup(names.name)) {
            self.name = Some(name);
        }
        Ok(())
    }

    /// Collect the names of options this connection still lacks
    fn missing_options(&self, prefix: &str, names: &DbEnvNames) -> Vec<String> {
        let mut missing = Vec::new();
        match self.db_type {
            DbType::Postgres => {
                let checks: [(&str, &str, bool); 5] = [
                    ("db_user", names.user, is_blank(&self.user)),
                    ("db_password", names.password, is_blank(&self.password)),
                    ("db_host", names.host, is_blank(&self.host)),
                    ("db_port", names.port, self.port.is_none()),
                    ("db_name", names.name, is_blank(&self.name)),
                ];
                for (option, env, absent) in checks {
                    if absent {
                        missing.push(format!("{prefix}.{option} ({env})"));
                    }
                }
            }
            DbType::DuckDb => {
                if is_blank(&self.path) {
                    missing.push(format!("{prefix}.path"));
                }
            }
        }
        missing
    }

    /// Human readable connection description with the password redacted
    pub fn redacted(&self) -> String {
        match self.db_type {
            DbType::Postgres => format!(
                "postgresql://{}:***@{}:{}/{}",
                self.user.as_deref().unwrap_or(""),
                self.host.as_deref().unwrap_or(""),
                self.port.map(|p| p.to_string()).unwrap_or_default(),
                self.name.as_deref().unwrap_or(""),
            ),
            DbType::DuckDb => format!("duckdb:{}", self.path.as_deref().unwrap_or(":memory:")),
        }
    }
}

/// REST API configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// First page URL
    #[serde(default)]
    pub url: Option<String>,

    /// API key sent as `Authorization: key <API_KEY>`
    #[serde(default)]
    pub key: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Artifact storage locations, relative to the project directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Root of the staging area (one subdirectory per category)
    #[serde(default = "default_staging_root")]
    pub staging_root: PathBuf,

    /// Flat directory holding the six transformed artifacts
    #[serde(default = "default_transformed_root")]
    pub transformed_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            staging_root: default_staging_root(),
            transformed_root: default_transformed_root(),
        }
    }
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_transformed_root() -> PathBuf {
    PathBuf::from("data/transformed")
}

/// Fetcher pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Delay after every successful page, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Backoff used when a 429 carries no usable `Retry-After`, in seconds
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,

    /// Consecutive 429 responses tolerated for one URL before giving up
    #[serde(default = "default_max_rate_limit_retries")]
    pub max_rate_limit_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay_ms(),
            default_retry_after_secs: default_retry_after_secs(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
        }
    }
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_retry_after_secs() -> u64 {
    1
}

fn default_max_rate_limit_retries() -> u32 {
    10
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a project directory
    ///
    /// The file is optional: when neither brickflow.yml nor brickflow.yaml
    /// exists the defaults are returned and the environment supplies the rest.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load the file (explicit path or project directory) and overlay the
    /// process environment
    pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> CoreResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::load_from_dir(project_dir)?,
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay environment values using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.source.apply_env(&SOURCE_ENV, &lookup)?;
        self.destination.apply_env(&DESTINATION_ENV, &lookup)?;
        if let Some(url) = non_empty(lookup(API_URL_ENV)) {
            self.api.url = Some(url);
        }
        if let Some(key) = non_empty(lookup(API_KEY_ENV)) {
            self.api.key = Some(key);
        }
        Ok(())
    }

    /// Validate every option the given stages depend on
    ///
    /// All missing options are reported together so a misconfigured
    /// environment can be fixed in one pass.
    pub fn validate_for(&self, stages: &[Stage]) -> CoreResult<()> {
        let mut missing = Vec::new();

        if stages.contains(&Stage::ExtractSql) {
            missing.extend(self.source.missing_options("source", &SOURCE_ENV));
        }
        if stages.contains(&Stage::Load) {
            missing.extend(
                self.destination
                    .missing_options("destination", &DESTINATION_ENV),
            );
        }
        if stages.contains(&Stage::ExtractApi) {
            if is_blank(&self.api.url) {
                missing.push(format!("api.url ({API_URL_ENV})"));
            }
            if is_blank(&self.api.key) {
                missing.push(format!("api.key ({API_KEY_ENV})"));
            }
        }

        if !missing.is_empty() {
            return Err(CoreError::ConfigMissing { options: missing });
        }

        if stages.contains(&Stage::ExtractApi) {
            if let Some(url) = self.api.url.as_deref() {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("api.url must be an http(s) URL, got '{}'", url),
                    });
                }
            }
        }

        Ok(())
    }

    /// Absolute staging root for a project directory
    pub fn staging_root(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.storage.staging_root)
    }

    /// Absolute transformed root for a project directory
    pub fn transformed_root(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.storage.transformed_root)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
