//! 🔧 App Configuration, the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." (every developer at 3am) 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::info;

use crate::backends::{CsvDirectorySinkConfig, DirectorySourceConfig, InMemorySourceConfig};

/// 📦 The AppConfig: one struct to rule them all, one struct to find them,
/// one struct to bring them all, and in the Figment bind them.
///
/// Every section has a default, so an empty config means "read `token.json` and
/// friends from the current directory, write CSVs into `csv_output/`".
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// 📡 Where the JSON documents and the token catalog come from.
    #[serde(default)]
    pub source_config: SourceConfig,
    /// 🚰 Where the finished tables go.
    #[serde(default)]
    pub sink_config: SinkConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// 📡 Source selection. Externally tagged, so TOML reads `[source_config.Directory]`.
#[derive(Debug, Deserialize, Clone)]
pub enum SourceConfig {
    // -- env keys arrive lowercased, hence the aliases
    #[serde(alias = "directory")]
    Directory(DirectorySourceConfig),
    #[serde(alias = "inmemory")]
    InMemory(InMemorySourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Directory(DirectorySourceConfig::default())
    }
}

/// 🚰 Sink selection. `sink_config = "InMemory"` works too, it has nothing to configure.
#[derive(Debug, Deserialize, Clone)]
pub enum SinkConfig {
    #[serde(alias = "csvdirectory")]
    CsvDirectory(CsvDirectorySinkConfig),
    #[serde(alias = "inmemory")]
    InMemory,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::CsvDirectory(CsvDirectorySinkConfig::default())
    }
}

/// 🎛️ Knobs for the run itself rather than for either end of it.
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// 📊 Progress bar while walking, summary table when done.
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_show_progress() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_progress: default_show_progress(),
        }
    }
}

/// 🚀 Load the config from a file, from env vars, or from the sheer power of hoping.
///
/// 🔧 Merges environment variables (`DIMX_*`, nested keys split on `__`) with an
/// optional TOML file. TOML wins on conflicts.
///   - `config_file_name` is None → env vars only.
///   - `config_file_name` is Some → env vars + TOML file, merged.
///
/// 💀 Returns an error if config is unparseable, with a message that says where we looked.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    // 🏗️ Env vars are the base layer, like a good sourdough starter.
    // DIMX_SINK_CONFIG__CSVDIRECTORY__OUTPUT_DIR=/tmp/out lands where you'd hope.
    let config = Figment::new().merge(Env::prefixed("DIMX_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (DIMX_*). \
             The file exists in our hearts, but apparently not in a shape serde recognises.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (DIMX_*). \
                 No file was provided, so this one's all on the environment. Classic."
            .to_string(),
    };

    config.extract().context(context_msg)
}
