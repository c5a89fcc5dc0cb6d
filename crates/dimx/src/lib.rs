//! 🗂️ dimx: turns a folder of per-project JSON deployment configs into a star
//! schema of CSV tables. Dimension tables get surrogate ids, every
//! (document, project, microservice, environment) with a quota becomes a fact row.
//!
//! The pieces, bottom-up:
//! - [`keys`], [`ids`], [`tokens`], [`quotas`], [`catalogs`], [`app_types`]: the small rules.
//! - [`walker`]: the traversal that applies them.
//! - [`tables`]: the fixed schema the walk is rendered into.
//! - backends + supervisor: the I/O around all of it. 🦆

pub mod app_config;
pub mod app_types;
pub mod backends;
pub mod catalogs;
pub mod common;
pub mod environment;
pub mod ids;
pub mod keys;
pub mod lookup;
mod progress;
pub mod quotas;
mod supervisor;
pub mod tables;
pub mod tokens;
pub mod walker;

use anyhow::{Context, Result};

use crate::app_config::AppConfig;
use crate::supervisor::Supervisor;

pub use crate::supervisor::RunSummary;

/// 🚀 Run one normalization pass with the given config.
pub async fn run(app_config: AppConfig) -> Result<RunSummary> {
    Supervisor::new(app_config)
        .run()
        .await
        .context("💀 The normalization run did not finish")
}
