//! 📊 progress.rs: "Are we there yet?" asked every run, every time, forever.
//!
//! 🚀 A progress bar over the input documents while the walk runs, and a table
//! so comfy it has lumbar support once every CSV is on disk.
//!
//! ⚠️ Watching this progress bar will not make it go faster.
//! Neither will refreshing it. We've tried. Science says no.

use std::time::{Duration, Instant};

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use indicatif::{ProgressBar, ProgressStyle};

use crate::supervisor::RunSummary;

/// 🔢 Formats a number with commas for the 3 people in the audience who like readability.
/// "1000000 rows" → "1,000,000 rows", you're welcome, eyes.
pub(crate) fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// ⏱️ Formats a Duration into MM:SS or HH:MM:SS.
/// If it shows HH:MM:SS on a folder of JSON, something is deeply wrong.
pub(crate) fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// 📊 Document-level progress. Hidden entirely when the runtime says so, in
/// which case every call is a cheap no-op inside indicatif.
pub(crate) struct ProgressMetrics {
    documents_done: u64,
    progress_bar: ProgressBar,
    start_time: Instant,
}

impl std::fmt::Debug for ProgressMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -- ProgressBar is a diva and doesn't derive Debug
        f.debug_struct("ProgressMetrics")
            .field("documents_done", &self.documents_done)
            .finish()
    }
}

impl ProgressMetrics {
    pub(crate) fn new(total_documents: u64, visible: bool) -> Self {
        let progress_bar = if visible {
            ProgressBar::new(total_documents)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_bar()
            .template("{msg}\n| [{bar:40.cyan/blue}] {pos}/{len} documents")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        progress_bar.set_style(style);

        Self {
            documents_done: 0,
            progress_bar,
            start_time: Instant::now(),
        }
    }

    /// 🔄 One more document down. `name` shows up as the bar's message.
    pub(crate) fn document_done(&mut self, name: &str) {
        self.documents_done += 1;
        self.progress_bar.set_message(format!("walking: {}", name));
        self.progress_bar.set_position(self.documents_done);
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// ✅ Ring the bell. We made it. (Or the source ran dry. Same energy.)
    pub(crate) fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

/// 🍽️ Render the end-of-run summary: headline counters first, then one row per
/// table written, in write order.
pub(crate) fn render_summary(summary: &RunSummary) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["table", "rows"]);

    for (name, rows) in &summary.table_rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format_number(*rows as u64)).set_alignment(CellAlignment::Right),
        ]);
    }

    format!(
        "📦 {} documents walked, {} skipped, {} fact rows in {}\n{}",
        format_number(summary.documents_walked as u64),
        format_number(summary.documents_skipped as u64),
        format_number(summary.fact_rows as u64),
        format_duration(summary.elapsed),
        table
    )
}
