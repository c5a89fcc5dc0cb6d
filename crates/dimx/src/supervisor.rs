//! 🎬 *[camera pans across a folder of JSON files]*
//! 🎬 "In a world where every microservice had three environments..."
//! 🎬 "One supervisor dared to put them all in a star schema."
//! 🎬 *[record scratch]* 🦆
//!
//! 📦 The Supervisor runs one normalization pass end to end:
//! token catalog → app-type index → walk every document → build every table →
//! hand each table to the sink → close the sink.
//!
//! Processing is strictly sequential. Surrogate ids depend on visit order, so
//! there is exactly one walker and it sees documents in the order the source
//! yields them.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::app_config::AppConfig;
use crate::app_types::AppTypeIndex;
use crate::backends::{Sink, SinkBackend, Source, SourceBackend};
use crate::progress::{ProgressMetrics, render_summary};
use crate::tables::build_tables;
use crate::tokens::TokenCatalog;
use crate::walker::{Dimensions, DocumentOutcome, DocumentWalker};

/// 📊 What a run did, for whoever called it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents_walked: usize,
    pub documents_skipped: usize,
    pub fact_rows: usize,
    /// 🗂️ `(table name, data rows)` in write order. Header rows not counted.
    pub table_rows: Vec<(String, usize)>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// 🔍 Row count of one table, if it was written.
    pub fn rows_in(&self, table_name: &str) -> Option<usize> {
        self.table_rows
            .iter()
            .find(|(name, _)| name == table_name)
            .map(|(_, rows)| *rows)
    }
}

/// 📦 The Supervisor: owns the config, builds the backends, and hovers over the
/// walk asking "is it done yet?" every document.
pub(crate) struct Supervisor {
    app_config: AppConfig,
}

impl Supervisor {
    pub(crate) fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }

    /// 🚀 Build the configured backends and run them.
    pub(crate) async fn run(&self) -> Result<RunSummary> {
        let source = SourceBackend::from_config(&self.app_config.source_config)
            .await
            .context("💀 The source could not be set up")?;
        let sink = SinkBackend::from_config(&self.app_config.sink_config)
            .await
            .context("💀 The sink could not be set up")?;
        self.drive(source, sink).await
    }

    /// 🔄 The whole pass against any source and sink.
    pub(crate) async fn drive<S, K>(&self, mut source: S, mut sink: K) -> Result<RunSummary>
    where
        S: Source + Send,
        K: Sink + Send,
    {
        let catalog_text = source.token_catalog().await?;
        let tokens = TokenCatalog::from_json_str(&catalog_text)?;
        debug!("🔐 token catalog holds {} entries", tokens.len());

        let document_names = source.document_names();
        let app_types = AppTypeIndex::new(document_names.iter().cloned());
        info!("🚀 normalizing {} documents", document_names.len());

        let mut progress = ProgressMetrics::new(
            document_names.len() as u64,
            self.app_config.runtime.show_progress,
        );
        let mut walker = DocumentWalker::new(Dimensions::new(), &tokens, app_types);

        while let Some(document) = source.next_document().await? {
            match walker.walk_document(&document) {
                DocumentOutcome::Walked { fact_rows } => {
                    debug!("📄 {} produced {} fact rows", document.name, fact_rows)
                }
                DocumentOutcome::Skipped => debug!("📄 {} was skipped", document.name),
            }
            progress.document_done(&document.name);
        }
        progress.finish();

        let output = walker.finish();
        let tables = build_tables(&output);
        for table in &tables {
            sink.write_table(table)
                .await
                .with_context(|| format!("💀 Writing table '{}' failed", table.name))?;
        }
        sink.close().await.context("💀 Closing the sink failed")?;

        let summary = RunSummary {
            documents_walked: output.documents_walked,
            documents_skipped: output.documents_skipped,
            fact_rows: output.facts.len(),
            table_rows: tables
                .iter()
                .map(|table| (table.name.to_string(), table.rows.len()))
                .collect(),
            elapsed: progress.elapsed(),
        };
        info!(
            "✅ normalization finished: {} documents walked, {} skipped, {} fact rows",
            summary.documents_walked, summary.documents_skipped, summary.fact_rows
        );
        if self.app_config.runtime.show_progress {
            info!("\n{}", render_summary(&summary));
        }
        Ok(summary)
    }
}
