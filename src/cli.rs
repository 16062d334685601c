// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::ConfigManager;
use crate::database::Database;
use crate::matching::MatchScorer;
use crate::models::{ProfileUpdate, Role};
use crate::services::RecommendationService;
use crate::utils::{fit_column, non_blank, parse_optional_year, parse_tag_list};
use crate::web::parse_roles;

#[derive(Parser)]
#[command(name = "campus-admin")]
#[command(about = "Administer campus-connect profiles and matching")]
pub struct AdminCli {
    #[command(subcommand)]
    pub command: AdminCommand,

    /// Overrides the database path from `config.yaml`
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Create the database and its tables
    Init,
    /// Import profiles from a CSV file
    Import { csv_file: PathBuf },
    /// List profiles, optionally filtered by role (comma separated)
    List {
        #[arg(long)]
        role: Option<String>,
    },
    /// Print mentor recommendations for a profile
    Recommend {
        profile_id: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        role: Option<String>,
    },
}

/// One CSV row. Tags are `;`-separated inside their column.
#[derive(Debug, Deserialize)]
struct CsvProfile {
    display_name: String,
    role: String,
    #[serde(default)]
    department: String,
    #[serde(default)]
    graduation_year: String,
    #[serde(default)]
    employer: String,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    interests: String,
}

impl CsvProfile {
    fn into_update(self) -> Result<ProfileUpdate> {
        let update = ProfileUpdate {
            display_name: self.display_name.trim().to_string(),
            role: self.role.parse()?,
            department: non_blank(&self.department),
            graduation_year: parse_optional_year(&self.graduation_year)?,
            employer: non_blank(&self.employer),
            skills: parse_tag_list(&self.skills),
            interests: parse_tag_list(&self.interests),
        };
        update.validate()?;
        Ok(update)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}

/// Insert every valid row of `content`; bad rows are logged and counted
pub async fn import_profiles(db: &Database, content: &str) -> Result<ImportSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());
    let mut summary = ImportSummary::default();

    for (index, record) in reader.deserialize::<CsvProfile>().enumerate() {
        let line = index + 2; // header is line 1
        let update = match record
            .context("Malformed CSV record")
            .and_then(CsvProfile::into_update)
        {
            Ok(update) => update,
            Err(e) => {
                summary.failed += 1;
                warn!("Skipping line {}: {:#}", line, e);
                continue;
            }
        };

        match db.profiles().create(None, &update).await {
            Ok(profile) => {
                summary.imported += 1;
                info!("Added: {} ({}) -> {}", profile.display_name, profile.role, profile.id);
            }
            Err(e) => {
                summary.failed += 1;
                error!("Failed to add line {}: {:#}", line, e);
            }
        }
    }

    Ok(summary)
}

pub async fn handle_admin_command(cli: AdminCli, config: &ConfigManager) -> Result<()> {
    let database_path = cli
        .database_path
        .unwrap_or_else(|| config.database_path.clone());
    let db = Database::new(&database_path).await?;

    match cli.command {
        AdminCommand::Init => {
            info!("Database initialized at: {}", database_path.display());
            info!("Tables: profiles, relationships");
        }

        AdminCommand::Import { csv_file } => {
            let content = tokio::fs::read_to_string(&csv_file)
                .await
                .with_context(|| format!("Failed to read {}", csv_file.display()))?;

            let summary = import_profiles(&db, &content).await?;
            info!("Import completed:");
            info!("  Imported: {}", summary.imported);
            info!("  Failed:   {}", summary.failed);
        }

        AdminCommand::List { role } => {
            let roles = parse_roles(role.as_deref())?;
            let profiles = if roles.is_empty() {
                db.profiles().list_all().await?
            } else {
                db.profiles().list_by_roles(&roles).await?
            };

            if profiles.is_empty() {
                info!("No profiles found.");
                return Ok(());
            }

            info!(
                "{} {} {} {} {}",
                fit_column("ID", 36),
                fit_column("Name", 24),
                fit_column("Role", 8),
                fit_column("Department", 20),
                "Year"
            );
            info!("{}", "-".repeat(96));
            for profile in profiles {
                info!(
                    "{} {} {} {} {}",
                    fit_column(&profile.id, 36),
                    fit_column(&profile.display_name, 24),
                    fit_column(profile.role.as_str(), 8),
                    fit_column(profile.department.as_deref().unwrap_or("-"), 20),
                    profile
                        .graduation_year
                        .map(|y| y.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }

        AdminCommand::Recommend {
            profile_id,
            limit,
            role,
        } => {
            let roles: Vec<Role> = parse_roles(role.as_deref())?;
            config.matching.validate()?;
            let scorer = MatchScorer::new(config.matching);
            let recommendations = RecommendationService::new(&db, &scorer)
                .recommend_mentors(&profile_id, &roles, Some(limit))
                .await?;

            if recommendations.is_empty() {
                info!("No mentor candidates for {}", profile_id);
                return Ok(());
            }

            for (rank, rec) in recommendations.iter().enumerate() {
                info!(
                    "{:>2}. {:>3}  {} ({})  skills: [{}]  interests: [{}]",
                    rank + 1,
                    rec.result.score,
                    rec.profile.display_name,
                    rec.profile.role,
                    rec.result.matched_skills.join(", "),
                    rec.result.matched_interests.join(", ")
                );
            }
        }
    }

    Ok(())
}
