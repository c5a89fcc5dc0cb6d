//! 📦 Common data structures that travel between sources, the walker and sinks.
//!
//! A [`RawDocument`] goes in, a stack of [`Table`]s comes out. Neither of them has
//! opinions. They carry the data. They are the postal workers of this codebase.

/// 📄 One input document, exactly as the source found it. Parsing happens later
/// so a broken file costs one warning instead of the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// 🏷️ File name (not the full path). Part of every fact row's natural key.
    pub name: String,
    pub content: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// 🗂️ A relational table ready to be written: fixed headers, stringly rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: &'static str, headers: &'static [&'static str]) -> Self {
        Self {
            name,
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    /// 🔍 Cell by column name. Handy in tests, where nobody remembers column 9.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let position = self.headers.iter().position(|header| *header == column)?;
        self.rows.get(row)?.get(position).map(String::as_str)
    }

    /// 📎 The file name this table is written to by file-based sinks.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}
