// src/storage/mod.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};

use crate::batch::{BatchOutcome, ReportRow, COLUMNS};
use crate::extractors::dedup::RENDER_FORMAT_VERSION;
use crate::utils::error::StorageError;

pub const DEFAULT_OUTPUT: &str = "combined_bureau_report.xlsx";
pub const SHEET_NAME: &str = "Report";

/// Table encodings the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    /// `.csv` selects CSV; anything else gets a workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ReportFormat::Csv,
            _ => ReportFormat::Xlsx,
        }
    }
}

pub struct ReportWriter {
    output_path: PathBuf,
    format: ReportFormat,
    overwrite: bool,
}

impl ReportWriter {
    /// Creates a writer for `output_path`, creating its parent directory if needed.
    pub fn new<P: AsRef<Path>>(output_path: P, overwrite: bool) -> Result<Self, StorageError> {
        let output_path = output_path.as_ref().to_path_buf();

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        let format = ReportFormat::from_path(&output_path);
        Ok(Self { output_path, format, overwrite })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Path of the JSON run summary written next to the report.
    pub fn summary_path(&self) -> PathBuf {
        let mut name = self
            .output_path
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        name.push(".summary.json");
        self.output_path.with_file_name(name)
    }

    /// Writes the combined report to the output file.
    pub fn write_rows(&self, rows: &[ReportRow]) -> Result<PathBuf, StorageError> {
        if rows.is_empty() {
            return Err(StorageError::NothingToExport);
        }
        self.ensure_writable(&self.output_path)?;

        let bytes = render_rows(rows, self.format)?;
        fs::write(&self.output_path, bytes).map_err(StorageError::IoError)?;

        tracing::info!("Saved {} rows to {} ({:?})", rows.len(), self.output_path.display(), self.format);
        Ok(self.output_path.clone())
    }

    /// Saves a JSON summary of the run: counts, per-file failures and a timestamp.
    pub fn write_summary(&self, outcome: &BatchOutcome) -> Result<PathBuf, StorageError> {
        let path = self.summary_path();
        self.ensure_writable(&path)?;

        let failures: Vec<serde_json::Value> = outcome
            .failures
            .iter()
            .map(|f| serde_json::json!({ "identifier": f.identifier, "reason": f.reason() }))
            .collect();

        let summary = serde_json::json!({
            "report": self.output_path.display().to_string(),
            "row_count": outcome.success_count(),
            "failure_count": outcome.failure_count(),
            "failures": failures,
            "cell_format_version": RENDER_FORMAT_VERSION,
            "generated_at": chrono::Utc::now().to_rfc3339(),
        });

        let summary_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&path, summary_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved run summary to {}", path.display());
        Ok(path)
    }

    fn ensure_writable(&self, path: &Path) -> Result<(), StorageError> {
        if path.exists() && !self.overwrite {
            return Err(StorageError::FileExists(path.display().to_string()));
        }
        Ok(())
    }
}

/// Renders the report into memory, for handing out as a download or on stdout.
pub fn render_rows(rows: &[ReportRow], format: ReportFormat) -> Result<Vec<u8>, StorageError> {
    if rows.is_empty() {
        return Err(StorageError::NothingToExport);
    }
    match format {
        ReportFormat::Xlsx => render_workbook(rows),
        ReportFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(&mut buf, rows)?;
            Ok(buf)
        }
    }
}

fn render_workbook(rows: &[ReportRow]) -> Result<Vec<u8>, StorageError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            worksheet.write_string(row_num, col as u16, *cell)?;
        }
    }
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

fn write_csv<W: Write>(sink: W, rows: &[ReportRow]) -> Result<(), StorageError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(StorageError::IoError)?;
    Ok(())
}
