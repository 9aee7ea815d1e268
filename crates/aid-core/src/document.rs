//! The summary document consumed by the reporting dashboard.
//!
//! Field names follow the dashboard's JSON contract, which mixes
//! `snake_case`, `camelCase` and column-style names; every deviation from the
//! Rust field name is spelled out with `#[serde(rename)]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Demographics ──────────────────────────────────────────────────────────────

/// One label of a demographic distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// The four demographic distributions attached to a summary row.
///
/// Each list is present even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicLists {
    #[serde(rename = "Race")]
    pub race: Vec<LabelCount>,
    #[serde(rename = "Income")]
    pub income: Vec<LabelCount>,
    #[serde(rename = "Education")]
    pub education: Vec<LabelCount>,
    #[serde(rename = "Employment")]
    pub employment: Vec<LabelCount>,
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRow {
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRow {
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "amountDelivered")]
    pub amount_delivered: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
    #[serde(flatten)]
    pub demographics: DemographicLists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    #[serde(rename = "YearMonth")]
    pub year_month: String,
    /// Display label, e.g. `"January 2024"`.
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "amountDelivered")]
    pub amount_delivered: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
    #[serde(flatten)]
    pub demographics: DemographicLists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRow {
    #[serde(rename = "Week")]
    pub week: String,
    #[serde(rename = "amountDelivered")]
    pub amount_delivered: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
}

/// Dataset-wide zip row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipRow {
    #[serde(rename = "Zip code")]
    pub zip_code: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
    #[serde(flatten)]
    pub demographics: DemographicLists,
}

/// Zip row inside a monthly or yearly period map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipPeriodRow {
    #[serde(rename = "ZipCode")]
    pub zip_code: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
    #[serde(flatten)]
    pub demographics: DemographicLists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedZipRow {
    #[serde(rename = "Zip code")]
    pub zip_code: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "peopleHelped")]
    pub people_helped: u64,
}

// ── Period maps ───────────────────────────────────────────────────────────────

/// Rows keyed by period identifier (`"2024-01"` or `"2024"`), in key order.
pub type PeriodMap<T> = BTreeMap<String, Vec<T>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monthly<T> {
    pub monthly: PeriodMap<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yearly<T> {
    pub yearly: PeriodMap<T>,
}

// ── Document ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Earliest parsed assistance date, `None` when no date parsed.
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    #[serde(rename = "recordCount")]
    pub record_count: u64,
}

/// The complete summary document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub dataset_info: DatasetInfo,
    pub total_people_helped: u64,
    pub total_food_delivered: f64,
    pub county_summary: Vec<CountyRow>,
    pub yearly_summary: Vec<YearlyRow>,
    pub monthly_summary: Vec<MonthlyRow>,
    pub weekly_summary: Vec<WeeklyRow>,
    pub county_monthly: Monthly<CountyRow>,
    pub county_yearly: Yearly<CountyRow>,
    pub zip_summary: Vec<ZipRow>,
    pub zip_monthly: Monthly<ZipPeriodRow>,
    pub zip_yearly: Yearly<ZipPeriodRow>,
    pub unmatched_zip_summary: Vec<UnmatchedZipRow>,
}

/// Error-shaped output: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub error: String,
}

impl ErrorDocument {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Schema failure listing the absent required columns, as
    /// `Missing columns: ['Case #', 'Zip code']`.
    pub fn missing_columns(missing: &[String]) -> Self {
        let quoted: Vec<String> = missing.iter().map(|name| quote_label(name)).collect();
        Self::new(format!("Missing columns: [{}]", quoted.join(", ")))
    }

    /// Unrecoverable failure.
    pub fn fatal(cause: impl std::fmt::Display) -> Self {
        Self::new(format!("Fatal error: {}", cause))
    }
}

/// Single-quote `label`, switching to double quotes when it contains a
/// single quote and no double quote.
fn quote_label(label: &str) -> String {
    let escaped = label.replace('\\', "\\\\");
    if label.contains('\'') && !label.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}

/// What one run of the pipeline produces: a summary, or a recoverable error
/// reported in-band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Summary(Box<SummaryDocument>),
    Error(ErrorDocument),
}

impl Report {
    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zip_row_field_names() {
        let row = ZipRow {
            zip_code: "30301".to_string(),
            city: "Atlanta".to_string(),
            amount: 100.0,
            people_helped: 2,
            demographics: DemographicLists::default(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "Zip code": "30301",
                "City": "Atlanta",
                "Amount": 100.0,
                "peopleHelped": 2,
                "Race": [],
                "Income": [],
                "Education": [],
                "Employment": [],
            })
        );
    }

    #[test]
    fn test_dataset_info_nulls() {
        let info = DatasetInfo {
            start_date: None,
            end_date: None,
            record_count: 0,
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            json!({"startDate": null, "endDate": null, "recordCount": 0})
        );
    }

    #[test]
    fn test_period_map_nests_under_period_name() {
        let mut monthly = PeriodMap::new();
        monthly.insert(
            "2024-01".to_string(),
            vec![CountyRow {
                county: "fulton".to_string(),
                amount: 5.0,
                people_helped: 1,
            }],
        );
        let value = serde_json::to_value(Monthly { monthly }).unwrap();
        assert_eq!(value["monthly"]["2024-01"][0]["County"], "fulton");
    }

    #[test]
    fn test_error_report_serializes_flat() {
        let report = Report::Error(ErrorDocument::missing_columns(&[
            "Case #".to_string(),
            "Amount".to_string(),
        ]));
        assert!(report.is_error());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({"error": "Missing columns: ['Case #', 'Amount']"})
        );
    }

    #[test]
    fn test_missing_columns_quotes_like_a_list_literal() {
        let doc = ErrorDocument::missing_columns(&[
            "Zip code".to_string(),
            "Owner's zip".to_string(),
            "a'b\"c".to_string(),
        ]);
        assert_eq!(
            doc.error,
            r#"Missing columns: ['Zip code', "Owner's zip", 'a\'b"c']"#
        );
        assert_eq!(
            ErrorDocument::missing_columns(&[]).error,
            "Missing columns: []"
        );
    }

    #[test]
    fn test_fatal_message() {
        let doc = ErrorDocument::fatal("stream did not contain valid UTF-8");
        assert_eq!(doc.error, "Fatal error: stream did not contain valid UTF-8");
    }
}
