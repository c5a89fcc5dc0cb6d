//! 📂 Previously, on "Things That Could Go Wrong With A Folder"...
//!
//! The folder was full of JSON. Some of it was configs. One of it was the token
//! catalog, hiding among the configs like a spy at a family reunion. A few of
//! them had trailing commas, because of course they did.
//!
//! [`DirectorySource`] lists every `*.json` file in `input_dir` once, sorted by
//! name so ids come out the same on every run, and leaves the token catalog out
//! of the walk. Files are read one at a time, on demand. A file that cannot be
//! read is logged and skipped; the token catalog not being readable ends the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::backends::Source;
use crate::common::RawDocument;

// -- 📂 config lives next to the source that uses it
#[derive(Debug, Deserialize, Clone)]
pub struct DirectorySourceConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// 🔐 File name of the token catalog inside `input_dir`. Never walked as a document.
    #[serde(default = "default_token_file_name")]
    pub token_file_name: String,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_token_file_name() -> String {
    "token.json".to_string()
}

impl Default for DirectorySourceConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            token_file_name: default_token_file_name(),
        }
    }
}

/// 📂 Reads JSON documents from a directory, one file per `next_document` call.
#[derive(Debug)]
pub(crate) struct DirectorySource {
    config: DirectorySourceConfig,
    document_names: Vec<String>,
    cursor: usize,
}

impl DirectorySource {
    /// 🚀 List the directory up front. If the directory itself is unreadable there
    /// is nothing to walk, so that one is fatal.
    pub(crate) async fn new(config: DirectorySourceConfig) -> Result<Self> {
        let mut entries = tokio::fs::read_dir(&config.input_dir).await.with_context(|| {
            format!(
                "💀 Could not list the input directory '{}'. We knocked. Nobody was home.",
                config.input_dir.display()
            )
        })?;

        let mut document_names = Vec::new();
        while let Some(entry) = entries.next_entry().await.with_context(|| {
            format!("💀 Listing '{}' stopped halfway through", config.input_dir.display())
        })? {
            let Ok(name) = entry.file_name().into_string() else {
                warn!("⚠️ skipping a file whose name is not valid UTF-8 in '{}'", config.input_dir.display());
                continue;
            };
            if !name.ends_with(".json") || name == config.token_file_name {
                continue;
            }
            let is_file = entry.file_type().await.map(|kind| kind.is_file()).unwrap_or(false);
            if is_file {
                document_names.push(name);
            }
        }
        // -- enumeration order drives id assignment, so it has to be stable
        document_names.sort();
        debug!(
            "📂 found {} documents in '{}'",
            document_names.len(),
            config.input_dir.display()
        );

        Ok(Self {
            config,
            document_names,
            cursor: 0,
        })
    }
}

#[async_trait]
impl Source for DirectorySource {
    async fn token_catalog(&mut self) -> Result<String> {
        let path = self.config.input_dir.join(&self.config.token_file_name);
        tokio::fs::read_to_string(&path).await.with_context(|| {
            format!(
                "💀 The token catalog '{}' could not be read. Without it no token resolves, so we stop here.",
                path.display()
            )
        })
    }

    fn document_names(&self) -> &[String] {
        &self.document_names
    }

    async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        while let Some(name) = self.document_names.get(self.cursor) {
            self.cursor += 1;
            let path = self.config.input_dir.join(name);
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => return Ok(Some(RawDocument::new(name.clone(), content))),
                Err(err) => warn!("⚠️ could not read '{}', skipping it: {}", path.display(), err),
            }
        }
        Ok(None)
    }
}
