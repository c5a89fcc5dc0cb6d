//! # Previously, on dimx...
//!
//! 🎬 The documents were trapped in a test. No disk. No folder. Just a Vec and a
//! dream. Someone had to feed them to the walker anyway.
//!
//! `in_mem` provides an in-memory [`Source`] and [`Sink`] for tests and local
//! experiments. [`InMemorySource`] yields the documents it was configured with, in
//! order, and then nothing. [`InMemorySink`] keeps every table it receives behind
//! an `Arc<Mutex<...>>` so callers can inspect what arrived after the run.
//!
//! ✅ No disk I/O. No heartbeat. Just vibes and heap memory. 🦆

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::backends::{Sink, Source};
use crate::common::{RawDocument, Table};

/// 📄 One configured document.
#[derive(Debug, Deserialize, Clone)]
pub struct InMemoryDocument {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InMemorySourceConfig {
    #[serde(default)]
    pub documents: Vec<InMemoryDocument>,
    /// 🔐 Token catalog JSON text.
    #[serde(default = "empty_catalog")]
    pub token_catalog: String,
}

fn empty_catalog() -> String {
    "{}".to_string()
}

impl Default for InMemorySourceConfig {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            token_catalog: empty_catalog(),
        }
    }
}

/// 📦 Yields its configured documents exactly once, in order.
#[derive(Debug)]
pub(crate) struct InMemorySource {
    token_catalog: String,
    document_names: Vec<String>,
    pending: std::vec::IntoIter<InMemoryDocument>,
}

impl InMemorySource {
    pub(crate) fn new(config: InMemorySourceConfig) -> Self {
        let document_names = config.documents.iter().map(|doc| doc.name.clone()).collect();
        Self {
            token_catalog: config.token_catalog,
            document_names,
            pending: config.documents.into_iter(),
        }
    }
}

#[async_trait]
impl Source for InMemorySource {
    async fn token_catalog(&mut self) -> Result<String> {
        Ok(self.token_catalog.clone())
    }

    fn document_names(&self) -> &[String] {
        &self.document_names
    }

    async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        Ok(self
            .pending
            .next()
            .map(|doc| RawDocument::new(doc.name, doc.content)))
    }
}

/// 📦 A sink that never forgets.
///
/// Clone-able because tests need to peek inside after handing the sink to the
/// pipeline. The `Arc` means every clone shares the same Vec.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemorySink {
    pub(crate) tables: Arc<Mutex<Vec<Table>>>,
}

impl InMemorySink {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Sink for InMemorySink {
    async fn write_table(&mut self, table: &Table) -> Result<()> {
        let mut tables = self.tables.lock().await;
        // -- same replace-by-name semantics as the csv sink
        tables.retain(|existing| existing.name != table.name);
        tables.push(table.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        // 🗑️ Cleanup routine: [REDACTED, there is nothing here]
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn the_one_where_documents_come_out_in_the_order_they_went_in() -> Result<()> {
        let mut source = InMemorySource::new(InMemorySourceConfig {
            documents: vec![
                InMemoryDocument { name: "b.json".into(), content: "{}".into() },
                InMemoryDocument { name: "a.json".into(), content: "{}".into() },
            ],
            ..Default::default()
        });
        assert_eq!(source.document_names(), ["b.json", "a.json"]);
        assert_eq!(source.token_catalog().await?, "{}");
        assert_eq!(source.next_document().await?.map(|d| d.name), Some("b.json".to_string()));
        assert_eq!(source.next_document().await?.map(|d| d.name), Some("a.json".to_string()));
        assert!(source.next_document().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_writing_a_table_twice_keeps_the_latest() -> Result<()> {
        let mut sink = InMemorySink::new();
        let peek = sink.clone();
        sink.write_table(&Table::new("env_directory", &["id", "env"])).await?;
        let with_row = Table::new("env_directory", &["id", "env"])
            .with_rows(vec![vec!["1".into(), "dev".into()]]);
        sink.write_table(&with_row).await?;
        sink.close().await?;

        let tables = peek.tables.lock().await;
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0], with_row);
        Ok(())
    }
}
