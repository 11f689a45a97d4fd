//! Layered configuration: compiled defaults, then `config.toml`, then
//! `CONN_REGISTRY_*` environment variables.

use crate::db::credentials::Credentials;
use crate::db::registry::DEFAULT_ENCODING;
use crate::error::RegistryError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "CONN_REGISTRY_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: String,
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: Option<u16>,
    pub name: String,
    pub user: String,
    pub password: String,
    pub table_prefix: Option<String>,
    pub encoding: String,
    /// Seconds; unset leaves the client default.
    pub connect_timeout: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: None,
            name: String::new(),
            user: String::new(),
            password: String::new(),
            table_prefix: None,
            encoding: DEFAULT_ENCODING.to_string(),
            connect_timeout: None,
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("table_prefix", &self.table_prefix)
            .field("encoding", &self.encoding)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn credentials(&self) -> Credentials {
        let creds = Credentials::new(&self.host, &self.name, &self.user, &self.password);
        match self.port {
            Some(port) => creds.with_port(port),
            None => creds,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(env_provider())
    }

    pub fn load() -> Result<Self, RegistryError> {
        Ok(Self::figment().extract()?)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, RegistryError> {
        Ok(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()?)
    }
}

// CONN_REGISTRY_DATABASE_TABLE_PREFIX -> database.table_prefix
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| {
        // the key still carries the variable's original case here
        let key = key.as_str().to_ascii_lowercase();
        key.replacen("database_", "database.", 1).into()
    })
}
