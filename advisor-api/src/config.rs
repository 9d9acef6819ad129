//! Server configuration read from the environment

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),

    #[error("Unknown STORAGE_TYPE '{0}' (expected 'csv' or 'memory')")]
    UnknownStorage(String),
}

/// Where the catalog and policy table come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Csv,
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage_type: StorageType,
    pub courses_csv: PathBuf,
    pub policies_csv: PathBuf,
}

impl Config {
    /// Reads `HOST`, `PORT`, `STORAGE_TYPE`, `COURSES_CSV` and `POLICIES_CSV`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => return Err(ConfigError::InvalidPort(raw)),
            },
            None => 8080,
        };
        let storage_type = match lookup("STORAGE_TYPE")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("csv") => StorageType::Csv,
            Some("memory") => StorageType::Memory,
            Some(other) => return Err(ConfigError::UnknownStorage(other.to_string())),
        };

        Ok(Self {
            host,
            port,
            storage_type,
            courses_csv: lookup("COURSES_CSV")
                .unwrap_or_else(|| "courses.csv".to_string())
                .into(),
            policies_csv: lookup("POLICIES_CSV")
                .unwrap_or_else(|| "policies.csv".to_string())
                .into(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
