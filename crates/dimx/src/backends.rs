//! 🔌 Backends: where the real I/O happens.
//!
//! 🚰 Source backends pour documents in, Sink backends catch tables on the way out.
//! And in between, the walker does all the thinking.
//!
//! 🎭 This module is the casting agency. Need to read a folder of JSON configs?
//! Feed documents straight from memory in a test? Write CSVs for the database
//! loader, or keep the tables in RAM so an assertion can poke at them?
//! We've got a backend for that.
//!
//! 🦆 The duck is here because every file must have one. This is law. Do not question the duck.

use anyhow::Result;
use async_trait::async_trait;

use crate::app_config::{SinkConfig, SourceConfig};
use crate::common::{RawDocument, Table};

pub(crate) mod csv_directory;
pub(crate) mod directory;
pub(crate) mod in_mem;

pub use csv_directory::CsvDirectorySinkConfig;
pub use directory::DirectorySourceConfig;
pub use in_mem::{InMemoryDocument, InMemorySourceConfig};

// ===== Source Trait and Backend Enum =====

/// 🚰 A source of input documents plus the token catalog that rides along with them.
///
/// # Contract
/// - `token_catalog` returns the catalog's raw JSON text. Failing here is fatal for the run.
/// - `document_names` lists every document the source will yield, in yield order,
///   token catalog excluded. App-type inference reads it before the walk starts.
/// - `next_document` yields documents until it returns `None`. A single unreadable
///   document is the source's problem to log and skip, not an error.
#[async_trait]
pub(crate) trait Source: std::fmt::Debug {
    async fn token_catalog(&mut self) -> Result<String>;

    fn document_names(&self) -> &[String];

    async fn next_document(&mut self) -> Result<Option<RawDocument>>;
}

/// 🎭 The many faces of a Source. Callers never need to know whether the JSON
/// came off a disk or out of a test fixture.
#[derive(Debug)]
pub(crate) enum SourceBackend {
    InMemory(in_mem::InMemorySource),
    Directory(directory::DirectorySource),
}

impl SourceBackend {
    /// 🔧 Build the configured source. Directory listing failures are fatal.
    pub(crate) async fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(match config {
            SourceConfig::InMemory(config) => {
                Self::InMemory(in_mem::InMemorySource::new(config.clone()))
            }
            SourceConfig::Directory(config) => {
                Self::Directory(directory::DirectorySource::new(config.clone()).await?)
            }
        })
    }
}

#[async_trait]
impl Source for SourceBackend {
    async fn token_catalog(&mut self) -> Result<String> {
        match self {
            SourceBackend::InMemory(source) => source.token_catalog().await,
            SourceBackend::Directory(source) => source.token_catalog().await,
        }
    }

    fn document_names(&self) -> &[String] {
        match self {
            SourceBackend::InMemory(source) => source.document_names(),
            SourceBackend::Directory(source) => source.document_names(),
        }
    }

    async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        match self {
            SourceBackend::InMemory(source) => source.next_document().await,
            SourceBackend::Directory(source) => source.next_document().await,
        }
    }
}

// ===== Sink Trait and Backend Enum =====

/// 🕳️ A sink that accepts finished tables.
///
/// # Contract
/// - `write_table` replaces whatever the sink previously held under that table's name.
/// - `close` finalizes. MUST be called. Skipping `close` is a bug. It is also considered rude.
#[async_trait]
pub(crate) trait Sink: std::fmt::Debug {
    async fn write_table(&mut self, table: &Table) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}

/// 🎭 The many faces of a Sink, mirroring [`SourceBackend`] on the other end.
#[derive(Debug)]
pub(crate) enum SinkBackend {
    InMemory(in_mem::InMemorySink),
    CsvDirectory(csv_directory::CsvDirectorySink),
}

impl SinkBackend {
    /// 🔧 Build the configured sink. Not being able to create the output directory is fatal.
    pub(crate) async fn from_config(config: &SinkConfig) -> Result<Self> {
        Ok(match config {
            SinkConfig::InMemory => Self::InMemory(in_mem::InMemorySink::new()),
            SinkConfig::CsvDirectory(config) => {
                Self::CsvDirectory(csv_directory::CsvDirectorySink::new(config.clone()).await?)
            }
        })
    }
}

#[async_trait]
impl Sink for SinkBackend {
    async fn write_table(&mut self, table: &Table) -> Result<()> {
        match self {
            SinkBackend::InMemory(sink) => sink.write_table(table).await,
            SinkBackend::CsvDirectory(sink) => sink.write_table(table).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            SinkBackend::InMemory(sink) => sink.close().await,
            SinkBackend::CsvDirectory(sink) => sink.close().await,
        }
    }
}
