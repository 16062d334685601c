// src/config.rs
//! Process configuration: environment variables plus an optional `config.yaml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::matching::MatchWeights;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub database_path: PathBuf,
    pub port: u16,
    pub firebase_project_id: Option<String>,
    pub matching: MatchWeights,
}

/// One environment section of `config.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentSection {
    pub database_path: Option<PathBuf>,
    pub matching: MatchWeights,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: EnvironmentSection,
    production: EnvironmentSection,
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let base_dir = if environment == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        let config_path = std::env::var("CAMPUS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join("config.yaml"));
        let section = Self::load_section(&config_path, &environment)?;

        let database_path = resolve_path(
            &base_dir,
            section
                .database_path
                .unwrap_or_else(|| PathBuf::from("data/campus_connect.db")),
        );

        let port = match std::env::var("ROCKET_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
            Err(_) => 8000,
        };

        let firebase_project_id = std::env::var("FIREBASE_PROJECT_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        Ok(Self {
            environment,
            database_path,
            port,
            firebase_project_id,
            matching: section.matching,
        })
    }

    /// JSON log destination, read before logging is initialized
    pub fn log_file_path() -> PathBuf {
        std::env::var("CAMPUS_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp/campus-connect.log"))
    }

    fn get_environment() -> String {
        std::env::var("CAMPUS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_section(path: &Path, environment: &str) -> Result<EnvironmentSection> {
        if !path.exists() {
            warn!(
                "{} not found, using built-in defaults",
                path.display()
            );
            return Ok(EnvironmentSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_section(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Project id required to verify bearer tokens
    pub fn require_firebase_project_id(&self) -> Result<&str> {
        self.firebase_project_id
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("FIREBASE_PROJECT_ID environment variable not set"))
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        Ok(())
    }
}

/// Pick the section for `environment` and validate its weights
pub fn parse_section(content: &str, environment: &str) -> Result<EnvironmentSection> {
    let file: ConfigFile = serde_yaml::from_str(content)?;
    let section = match environment {
        "production" => file.production,
        _ => file.local,
    };
    section.matching.validate()?;
    Ok(section)
}

fn resolve_path(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  database_path: data/local.db
  matching:
    skills: 35
    interests: 15
production:
  database_path: /var/lib/campus/campus.db
"#;

    #[test]
    fn test_parse_local_section() {
        let section = parse_section(SAMPLE, "local").unwrap();
        assert_eq!(section.database_path, Some(PathBuf::from("data/local.db")));
        assert_eq!(section.matching.skills, 35);
        assert_eq!(section.matching.interests, 15);
        assert_eq!(section.matching.department, 20);
    }

    #[test]
    fn test_parse_production_section_uses_default_weights() {
        let section = parse_section(SAMPLE, "production").unwrap();
        assert_eq!(section.matching, MatchWeights::default());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let content = "local:\n  matching:\n    skills: 90\n";
        assert!(parse_section(content, "local").is_err());
    }

    #[test]
    fn test_max_u32_weight_rejected() {
        let content = "local:\n  matching:\n    skills: 4294967295\n";
        let err = parse_section(content, "local").unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum score"));
    }

    #[test]
    fn test_resolve_path() {
        let base = PathBuf::from("/srv/app");
        assert_eq!(
            resolve_path(&base, PathBuf::from("data/x.db")),
            PathBuf::from("/srv/app/data/x.db")
        );
        assert_eq!(
            resolve_path(&base, PathBuf::from("/abs/x.db")),
            PathBuf::from("/abs/x.db")
        );
    }
}
