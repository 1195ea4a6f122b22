use std::{
    io::Error,
    path::{Path, PathBuf},
};

use chrono::{Datelike, Utc};
use thiserror::Error;

use crate::{
    types::{Config, WindowKind},
    warning,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access configuration file: {0}")]
    Io(#[from] Error),
    #[error("cannot parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Checks a freshly parsed document. Unknown `range` values are only reported;
/// they are treated as `day`.
pub fn validate(config: &Config, current_year: i32) -> Result<(), ConfigError> {
    let required = [
        ("plex.url", config.plex.url.as_str()),
        ("plex.token", config.plex.token.as_str()),
        ("tmdb.api_key", config.tmdb.api_key.as_str()),
        ("mdblist.api_key", config.mdblist.api_key.as_str()),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
        }
    }

    let has_token = |token: &Option<String>| token.as_deref().is_some_and(|t| !t.trim().is_empty());
    if !has_token(&config.tmdb.authenticated_token) && !has_token(&config.tmdb.access_token) {
        return Err(ConfigError::Invalid(
            "tmdb.access_token is required until tmdb.authenticated_token is set".to_string(),
        ));
    }

    for (name, rule) in &config.libraries {
        if rule.starting_year > current_year {
            return Err(ConfigError::Invalid(format!(
                "libraries.{}.starting_year {} lies in the future",
                name, rule.starting_year
            )));
        }
        if rule.tmdb_list_id.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "libraries.{}.tmdb_list_id must not be empty",
                name
            )));
        }
        if !(0.0..=10.0).contains(&rule.imdb_min_rating) {
            return Err(ConfigError::Invalid(format!(
                "libraries.{}.imdb_min_rating must be between 0 and 10",
                name
            )));
        }
        if let Some(range) = rule.range.as_deref() {
            if WindowKind::parse(range).is_none() {
                warning!(
                    "libraries.{}.range '{}' is not day, week or month. Using day.",
                    name,
                    range
                );
            }
        }
    }

    Ok(())
}

/// The configuration document and where it came from. Mutations stay in
/// memory until [`ConfigStore::persist`] writes the whole document back.
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        ConfigStore {
            path: path.into(),
            config,
        }
    }

    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = async_fs::read_to_string(&path).await?;
        let config: Config = serde_yaml::from_str(&content)?;
        validate(&config, Utc::now().year())?;
        Ok(Self { path, config })
    }

    pub async fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let yaml = serde_yaml::to_string(&self.config)?;
        async_fs::write(&self.path, yaml).await?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_authenticated_token(&mut self, token: String) {
        self.config.tmdb.authenticated_token = Some(token);
    }
}
