//! 🚰 CSV directory sink: one `<table>.csv` per table, replaced atomically.
//!
//! Each table is serialised in memory, written to `<table>.csv.tmp`, then renamed
//! over `<table>.csv`. A reader never sees half a table. UTF-8, comma-delimited,
//! header row first.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::trace;

use crate::backends::Sink;
use crate::common::Table;

#[derive(Debug, Deserialize, Clone)]
pub struct CsvDirectorySinkConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("csv_output")
}

impl Default for CsvDirectorySinkConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct CsvDirectorySink {
    config: CsvDirectorySinkConfig,
    tables_written: usize,
}

impl CsvDirectorySink {
    /// 🚀 Make sure the output directory exists. If it cannot be created, nothing can
    /// be written, so the error goes all the way up.
    pub(crate) async fn new(config: CsvDirectorySinkConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.output_dir).await.with_context(|| {
            format!(
                "💀 The output directory '{}' could not be conjured into existence. \
                 We stared at the path. The path stared back.",
                config.output_dir.display()
            )
        })?;
        Ok(Self {
            config,
            tables_written: 0,
        })
    }
}

/// 📑 Render a table as CSV bytes.
pub(crate) fn render_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(table.headers)
        .with_context(|| format!("💀 Writing the header of '{}' failed", table.name))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .with_context(|| format!("💀 Writing a row of '{}' failed", table.name))?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow!("💀 Flushing '{}' into memory failed: {}", table.name, err.error()))
}

#[async_trait]
impl Sink for CsvDirectorySink {
    async fn write_table(&mut self, table: &Table) -> Result<()> {
        let bytes = render_csv(table)?;
        let final_path = self.config.output_dir.join(table.file_name());
        let temp_path = self.config.output_dir.join(format!("{}.tmp", table.file_name()));

        tokio::fs::write(&temp_path, &bytes)
            .await
            .with_context(|| format!("💀 Could not write '{}'", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &final_path).await.with_context(|| {
            format!(
                "💀 Could not move '{}' over '{}'",
                temp_path.display(),
                final_path.display()
            )
        })?;

        self.tables_written += 1;
        trace!(
            "📬 {} rows of {} landed in '{}'",
            table.rows.len(),
            table.name,
            final_path.display()
        );
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        // -- every table is already on disk, renames are the commit
        trace!(
            "🎬 csv sink closing after {} tables in '{}'",
            self.tables_written,
            self.config.output_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_commas_get_quoted_and_headers_come_first() -> Result<()> {
        let table = Table::new("label_directory", &["id", "app_label"])
            .with_rows(vec![vec!["1".to_string(), "web, but fancy".to_string()]]);
        let rendered = String::from_utf8(render_csv(&table)?)?;
        assert_eq!(rendered, "id,app_label\n1,\"web, but fancy\"\n");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_old_output_is_replaced_and_empty_tables_keep_their_header() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let output_dir = dir.path().join("nested").join("csv_output");
        let mut sink = CsvDirectorySink::new(CsvDirectorySinkConfig {
            output_dir: output_dir.clone(),
        })
        .await?;

        std::fs::write(output_dir.join("env_directory.csv"), "stale,stuff\n")?;
        let envs = Table::new("env_directory", &["id", "env"])
            .with_rows(vec![vec!["1".to_string(), "dev".to_string()]]);
        sink.write_table(&envs).await?;
        sink.write_table(&Table::new("runtime_directory", &["id", "runtime_name", "version_path"]))
            .await?;
        sink.close().await?;

        assert_eq!(
            std::fs::read_to_string(output_dir.join("env_directory.csv"))?,
            "id,env\n1,dev\n"
        );
        assert_eq!(
            std::fs::read_to_string(output_dir.join("runtime_directory.csv"))?,
            "id,runtime_name,version_path\n"
        );
        assert!(!output_dir.join("env_directory.csv.tmp").exists());
        Ok(())
    }
}
