//! Field cleaning: amount coercion, county and zip standardization, city
//! resolution.

use aid_core::formatting::{normalize_zip, title_case};
use aid_core::models::{AssistanceRecord, NormalizedRecord, UNMATCHED_CITY};
use aid_core::settings::PipelineConfig;
use tracing::{debug, warn};

use crate::lookup::CityLookup;

/// County used when the cell is blank.
pub const UNKNOWN_COUNTY: &str = "unknown";

/// Parse an amount cell. Anything that is not a finite, non-negative decimal
/// becomes `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Trim, lowercase and alias-correct a county name.
pub fn normalize_county(raw: &str, config: &PipelineConfig) -> String {
    let county = raw.trim().to_lowercase();
    if county.is_empty() {
        return UNKNOWN_COUNTY.to_string();
    }
    config.resolve_county(&county).to_string()
}

/// Cleans [`AssistanceRecord`]s against a city lookup and alias table.
pub struct Normalizer<'a, L: CityLookup + ?Sized> {
    lookup: &'a L,
    config: &'a PipelineConfig,
}

impl<'a, L: CityLookup + ?Sized> Normalizer<'a, L> {
    pub fn new(lookup: &'a L, config: &'a PipelineConfig) -> Self {
        Self { lookup, config }
    }

    pub fn normalize(&self, record: AssistanceRecord) -> NormalizedRecord {
        let amount = parse_amount(&record.amount);
        let county = normalize_county(&record.county, self.config);
        let zip = normalize_zip(&record.zip_code);
        let city = match self.lookup.city_for(&zip) {
            Some(name) => title_case(name),
            None => UNMATCHED_CITY.to_string(),
        };

        NormalizedRecord {
            source: record,
            amount,
            county,
            zip,
            city,
        }
    }

    /// Normalize a batch, preserving length and order.
    pub fn normalize_all(&self, records: Vec<AssistanceRecord>) -> Vec<NormalizedRecord> {
        let mut malformed_amounts = 0usize;
        let normalized: Vec<NormalizedRecord> = records
            .into_iter()
            .map(|record| {
                if record.amount.trim().parse::<f64>().is_err() {
                    malformed_amounts += 1;
                }
                self.normalize(record)
            })
            .collect();

        let unmatched = normalized.iter().filter(|r| r.is_unmatched()).count();
        if unmatched > 0 {
            warn!(
                "{} of {} records have a zip code with no city mapping",
                unmatched,
                normalized.len()
            );
        }
        debug!(
            "Normalized {} records ({} malformed amounts set to 0)",
            normalized.len(),
            malformed_amounts
        );

        normalized
    }
}
