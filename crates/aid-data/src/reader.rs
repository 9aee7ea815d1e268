//! CSV ingestion for case exports.
//!
//! Decodes the raw input, parses it with a header row, drops blank rows and
//! checks that every required column is present before any record is built.

use std::io::Read;
use std::path::Path;

use aid_core::models::{AssistanceRecord, REQUIRED_COLUMNS};
use aid_core::{Result, SummaryError};
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of reading one input batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// Header accepted; records in input order with blank rows removed.
    Records {
        headers: Vec<String>,
        records: Vec<AssistanceRecord>,
    },
    /// Required columns absent from the header, in reporting order.
    MissingColumns(Vec<String>),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read the whole input, from `path` when given, otherwise from stdin.
pub fn load_input_bytes(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) => std::fs::read(p).map_err(|source| SummaryError::FileRead {
            path: p.to_path_buf(),
            source,
        }),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Interpret `bytes` as UTF-8 text, tolerating a leading byte-order mark.
pub fn decode_input(bytes: &[u8]) -> Result<&str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(std::str::from_utf8(bytes)?)
}

/// Parse CSV `text` into [`AssistanceRecord`]s.
///
/// Rows may be shorter or longer than the header; missing cells read as
/// blank and surplus cells are ignored. Cell values are kept verbatim so the
/// normalizer sees exactly what was exported.
///
/// Input without any header names is an error, not a schema mismatch.
pub fn read_records(text: &str) -> Result<ReadOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(clean_header)
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SummaryError::EmptyInput);
    }

    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        info!("Input is missing required columns: {:?}", missing);
        return Ok(ReadOutcome::MissingColumns(missing));
    }

    let mut records = Vec::new();
    let mut blank_rows = 0u64;

    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            blank_rows += 1;
            continue;
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), row.get(i).unwrap_or("")));
        records.push(AssistanceRecord::from_columns(columns));
    }

    debug!(
        "Read {} records ({} blank rows dropped, {} columns)",
        records.len(),
        blank_rows,
        headers.len()
    );

    Ok(ReadOutcome::Records { headers, records })
}

/// Required columns not present in `headers`, in [`REQUIRED_COLUMNS`] order.
pub fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect()
}

/// Header names are matched after trimming whitespace and any stray BOM.
pub(crate) fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
