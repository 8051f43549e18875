//! Uploaded-file inspection: CSV headers and PDF text.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub mod pdf;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("file is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("unsupported file type: .{0}. Only CSV and PDF files are allowed")]
    Unsupported(String),
    #[error("CSV file contains no data")]
    NoCsvData,
    #[error("no text could be extracted from PDF; it may be image-based or empty")]
    NoPdfText,
    #[error("failed to parse PDF: {0}")]
    Pdf(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What an uploaded file contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    CsvHeaders(Vec<String>),
    PdfText(String),
}

/// Inspect an uploaded file by extension.
pub fn inspect(path: &Path) -> Result<Inspection, IngestError> {
    check_readable(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            info!(path = %path.display(), "reading CSV headers");
            Ok(Inspection::CsvHeaders(read_csv_headers(path)?))
        }
        "pdf" => {
            info!(path = %path.display(), "extracting PDF text");
            Ok(Inspection::PdfText(pdf::extract_pdf_text(path)?))
        }
        other => Err(IngestError::Unsupported(other.to_string())),
    }
}

fn check_readable(path: &Path) -> Result<(), IngestError> {
    if !path.exists() {
        return Err(IngestError::Missing(path.to_path_buf()));
    }
    if fs::metadata(path)?.len() == 0 {
        return Err(IngestError::Empty(path.to_path_buf()));
    }
    Ok(())
}

/// Read the header row of a CSV file.
///
/// No CSV crate in the stack; a quote-aware split of the first line is
/// all header inspection needs.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>, IngestError> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;

    let line = first_line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(IngestError::NoCsvData);
    }

    Ok(split_csv_line(line))
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next(); // escaped quote
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
