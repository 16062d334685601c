// src/lib.rs
//! Campus networking backend: profiles, connections and mentor matching.

pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod matching;
pub mod models;
pub mod services;
pub mod utils;
pub mod web;

pub use config::ConfigManager;
pub use database::Database;
pub use matching::{MatchResult, MatchScorer, MatchWeights};
pub use models::{Profile, Relationship, RelationshipStatus, Role};
pub use web::start_web_server;
