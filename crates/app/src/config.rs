//! Configuration loading
//!
//! Settings come from a TOML file in the platform config directory. A
//! missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    /// Deployment timezone as `+HH:MM` or `-HH:MM`
    pub utc_offset: String,
    pub seed_room_count: u32,
    pub reconcile_interval_secs: u64,
    pub audit_display_limit: u32,
    pub announcement_display_limit: u32,
    pub request_display_limit: usize,
    /// Name stamped on audit records
    pub operator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            utc_offset: "+00:00".to_string(),
            seed_room_count: hallkeep_core::seed::DEFAULT_ROOM_COUNT,
            reconcile_interval_secs: 60,
            audit_display_limit: 100,
            announcement_display_limit: 5,
            request_display_limit: 5,
            operator: "Admin".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => project_dirs()?.config_dir().join("config.toml"),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        config.offset()?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Deployment timezone
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(p) => Ok(p.clone()),
            None => Ok(project_dirs()?.data_dir().join("hallkeep.db")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "onyx", "hallkeep")
        .ok_or_else(|| AppError::Config("Could not determine platform directories".into()))
}

/// Parse `+HH:MM`, `-HH:MM` or `Z`
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(|| bad_offset(s));
    }

    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(bad_offset(s));
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(|| bad_offset(s))?;
    let hours: i32 = hours.parse().map_err(|_| bad_offset(s))?;
    let minutes: i32 = minutes.parse().map_err(|_| bad_offset(s))?;
    if !(0..60).contains(&minutes) {
        return Err(bad_offset(s));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| bad_offset(s))
}

fn bad_offset(s: &str) -> AppError {
    AppError::Config(format!("utc_offset {:?} is not +HH:MM", s))
}
