//! Main summary pipeline.
//!
//! Orchestrates reading, normalization, classification and assembly,
//! returning a [`Report`] ready to be written out.

use aid_core::document::{ErrorDocument, Report, SummaryDocument};
use aid_core::models::AssistanceRecord;
use aid_core::settings::PipelineConfig;
use aid_core::{Result, SummaryError};
use tracing::info;

use crate::assembler::ResultAssembler;
use crate::classifier::Classifier;
use crate::lookup::CityLookup;
use crate::normalizer::Normalizer;
use crate::reader::{decode_input, read_records, ReadOutcome};

/// Run the full pipeline over raw input bytes.
///
/// 1. Decode the bytes as UTF-8 (BOM tolerated).
/// 2. Parse the CSV and check required columns.
/// 3. Normalize, classify and assemble via [`summarize_records`].
///
/// Missing required columns produce `Ok(Report::Error(..))`; undecodable or
/// unparseable input is an `Err`.
pub fn analyze_bytes<L>(input: &[u8], lookup: &L, config: &PipelineConfig) -> Result<Report>
where
    L: CityLookup + ?Sized,
{
    let text = decode_input(input)?;
    analyze_text(text, lookup, config)
}

/// Same as [`analyze_bytes`] for already decoded text.
pub fn analyze_text<L>(text: &str, lookup: &L, config: &PipelineConfig) -> Result<Report>
where
    L: CityLookup + ?Sized,
{
    analyze_text_with(text, config, || Ok::<_, SummaryError>(lookup))
}

/// Like [`analyze_text`], but `load_lookup` only runs once the header has
/// every required column. A schema error never touches the lookup source.
pub fn analyze_text_with<L, E, F>(
    text: &str,
    config: &PipelineConfig,
    load_lookup: F,
) -> std::result::Result<Report, E>
where
    L: CityLookup,
    E: From<SummaryError>,
    F: FnOnce() -> std::result::Result<L, E>,
{
    let load_start = std::time::Instant::now();
    let records = match read_records(text)? {
        ReadOutcome::Records { records, .. } => records,
        ReadOutcome::MissingColumns(missing) => {
            return Ok(Report::Error(ErrorDocument::missing_columns(&missing)));
        }
    };
    let lookup = load_lookup()?;
    let load_time = load_start.elapsed().as_secs_f64();

    let transform_start = std::time::Instant::now();
    let document = summarize_records(records, &lookup, config);
    let transform_time = transform_start.elapsed().as_secs_f64();

    info!(
        "Summarized {} records (read {:.3}s, transform {:.3}s)",
        document.dataset_info.record_count, load_time, transform_time
    );

    Ok(Report::Summary(Box::new(document)))
}

/// Normalize, classify and assemble an in-memory batch.
pub fn summarize_records<L>(
    records: Vec<AssistanceRecord>,
    lookup: &L,
    config: &PipelineConfig,
) -> SummaryDocument
where
    L: CityLookup + ?Sized,
{
    // ── Step 1: Normalize ─────────────────────────────────────────────────────
    let normalized = Normalizer::new(lookup, config).normalize_all(records);

    // ── Step 2: Classify ──────────────────────────────────────────────────────
    let classified = Classifier::classify_all(normalized);

    // ── Step 3: Aggregate and assemble ────────────────────────────────────────
    ResultAssembler::assemble(&classified)
}
