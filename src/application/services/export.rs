//! Export service
//!
//! Renders the export document to JSON and writes it to a destination file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, ResultContextExt};
use crate::config::ExportSettings;
use crate::domain::{ExportDocument, ExportSerializer, TreeStore};
use crate::infrastructure::traits::FileSystem;

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Destination file, None when rendered only
    pub path: Option<PathBuf>,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Size of the rendered JSON
    pub bytes: usize,
}

impl ExportSummary {
    pub fn size_kb(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

pub struct ExportService {
    fs: Arc<dyn FileSystem>,
    settings: ExportSettings,
}

impl ExportService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: ExportSettings) -> Self {
        Self { fs, settings }
    }

    pub fn serializer(&self) -> ExportSerializer {
        ExportSerializer::new(self.settings.include_positions)
    }

    pub fn document(&self, store: &TreeStore) -> ExportDocument {
        self.serializer().serialize(store)
    }

    pub fn render(&self, document: &ExportDocument) -> ApplicationResult<String> {
        let rendered = if self.settings.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        rendered.with_context("render export document")
    }

    /// Render the current store without writing anything.
    pub fn preview(&self, store: &TreeStore) -> ApplicationResult<(String, ExportSummary)> {
        let document = self.document(store);
        let json = self.render(&document)?;
        let summary = ExportSummary {
            path: None,
            total_nodes: document.metadata.total_nodes,
            total_edges: document.metadata.total_edges,
            bytes: json.len(),
        };
        Ok((json, summary))
    }

    /// `<file_prefix>-YYYY-MM-DD.json`
    pub fn default_file_name(&self, date: NaiveDate) -> String {
        format!("{}-{}.json", self.settings.file_prefix, date.format("%Y-%m-%d"))
    }

    pub fn default_path(&self, date: NaiveDate) -> PathBuf {
        self.settings.output_dir.join(self.default_file_name(date))
    }

    /// Write the export to `destination`, or to today's default file name in
    /// the configured output directory.
    #[instrument(level = "debug", skip(self, store))]
    pub fn write(&self, store: &TreeStore, destination: Option<&Path>) -> ApplicationResult<ExportSummary> {
        let path = match destination {
            Some(p) => p.to_path_buf(),
            None => self.default_path(Utc::now().date_naive()),
        };
        let (json, mut summary) = self.preview(store)?;

        self.fs
            .ensure_parent(&path)
            .with_path_context("create export directory", &path)?;
        self.fs
            .write(&path, &json)
            .with_path_context("write export", &path)?;
        debug!("wrote {} bytes to {}", json.len(), path.display());

        summary.path = Some(path);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(settings: ExportSettings) -> ExportService {
        ExportService::new(
            Arc::new(crate::infrastructure::traits::RealFileSystem),
            settings,
        )
    }

    #[test]
    fn given_date_when_building_default_name_then_uses_prefix_and_iso_date() {
        let service = service(ExportSettings::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        assert_eq!(service.default_file_name(date), "loan-tree-2024-03-09.json");
    }

    #[test]
    fn given_summary_when_sizing_then_reports_kilobytes() {
        let summary = ExportSummary {
            path: None,
            total_nodes: 0,
            total_edges: 0,
            bytes: 2048,
        };
        assert_eq!(summary.size_kb(), 2.0);
    }
}
