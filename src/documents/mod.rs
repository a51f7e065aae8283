//! Plain text extraction for uploaded documents.
//!
//! Every format has a fallible `extract_*` function and a
//! `read_*_from_uploaded_file` counterpart that never fails. The
//! latter turns a parse failure into a readable `Erro ao ler <FORMAT>`
//! string so that a broken upload still flows into the chat as
//! context instead of interrupting it.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Txt,
    Csv,
}

impl DocumentKind {
    /// Guess the kind from a file name's extension (case insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Txt => "TXT",
            Self::Csv => "CSV",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Erro ao ler PDF: {0}")]
    Pdf(String),
    #[error("Erro ao ler TXT: {0}")]
    Txt(String),
    #[error("Erro ao ler CSV: {0}")]
    Csv(String),
}

/// Text of every page, each followed by a newline.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of
    // returning an error
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractError::Pdf("falha ao interpretar o documento".to_string()))?
    .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}

pub fn extract_txt(bytes: &[u8]) -> Result<String, ExtractError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::Txt(e.to_string()))
}

/// Parses a CSV with a header row and renders it as an aligned table
/// with a leading row index column.
pub fn extract_csv(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ExtractError::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ExtractError::Csv(
            "No columns to parse from file".to_string(),
        ));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExtractError::Csv(e.to_string()))?;
        // Short rows are padded with NaN, long rows are an error
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ExtractError::Csv(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), "NaN".to_string());
        rows.push(row);
    }

    Ok(render_table(&headers, &rows))
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let index_width = rows.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|v| v.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);

    let mut header_line = " ".repeat(index_width);
    for (header, width) in headers.iter().zip(&widths) {
        header_line.push_str(&format!("  {:>width$}", header, width = width));
    }
    lines.push(header_line);

    for (idx, row) in rows.iter().enumerate() {
        let mut line = format!("{:<width$}", idx, width = index_width);
        for (value, width) in row.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", value, width = width));
        }
        lines.push(line);
    }

    lines.join("\n")
}

pub fn read_pdf_from_uploaded_file(bytes: &[u8]) -> String {
    extract_pdf(bytes).unwrap_or_else(|e| e.to_string())
}

pub fn read_txt_from_uploaded_file(bytes: &[u8]) -> String {
    extract_txt(bytes).unwrap_or_else(|e| e.to_string())
}

pub fn read_csv_from_uploaded_file(bytes: &[u8]) -> String {
    extract_csv(bytes).unwrap_or_else(|e| e.to_string())
}

/// Extract text from an upload of the given kind, degrading to an
/// error description on failure.
pub fn read_uploaded_file(kind: DocumentKind, bytes: &[u8]) -> String {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Txt => extract_txt(bytes),
        DocumentKind::Csv => extract_csv(bytes),
    };
    text.unwrap_or_else(|e| {
        tracing::warn!("Document extraction failed: {}", e);
        e.to_string()
    })
}
