use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Column names ──────────────────────────────────────────────────────────────

pub const COL_CASE: &str = "Case #";
pub const COL_COUNTY: &str = "County";
pub const COL_CATEGORY: &str = "Assistance Category";
pub const COL_AMOUNT: &str = "Amount";
pub const COL_UNIT: &str = "Unit";
pub const COL_DATE: &str = "Assistance Date";
pub const COL_ZIP: &str = "Zip code";
pub const COL_HOUSEHOLD_INCOME: &str = "Household Income";
pub const COL_EDUCATION: &str = "Education";

/// Columns that must be present in the input header, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_CASE,
    COL_COUNTY,
    COL_CATEGORY,
    COL_AMOUNT,
    COL_UNIT,
    COL_DATE,
    COL_ZIP,
];

/// City assigned to records whose zip has no entry in the reference table.
pub const UNMATCHED_CITY: &str = "Unmatched Zip";

/// Label used whenever a categorical attribute cannot be derived.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ── AssistanceRecord ──────────────────────────────────────────────────────────

/// One input row, exactly as read. Never modified after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistanceRecord {
    pub case_id: String,
    pub county: String,
    pub category: String,
    /// Raw amount text; may be empty or malformed.
    pub amount: String,
    pub unit: String,
    /// Raw assistance date text; may be unparseable.
    pub assistance_date: String,
    pub zip_code: String,
    /// Every column that is not one of [`REQUIRED_COLUMNS`].
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl AssistanceRecord {
    /// Build a record from `(column, value)` pairs.
    ///
    /// Required columns populate the typed fields; everything else lands in
    /// [`AssistanceRecord::extra`]. Absent required columns stay empty.
    pub fn from_columns<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::default();
        for (name, value) in columns {
            let value = value.to_string();
            match name {
                COL_CASE => record.case_id = value,
                COL_COUNTY => record.county = value,
                COL_CATEGORY => record.category = value,
                COL_AMOUNT => record.amount = value,
                COL_UNIT => record.unit = value,
                COL_DATE => record.assistance_date = value,
                COL_ZIP => record.zip_code = value,
                other => {
                    record.extra.insert(other.to_string(), value);
                }
            }
        }
        record
    }

    /// Value of an optional column.
    ///
    /// Returns `None` when the column is absent from the input or the cell is
    /// blank, so callers only ever see meaningful text.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.extra
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// `true` when the indicator column holds an affirmative flag
    /// (`"yes"` in any case, surrounding whitespace ignored).
    pub fn is_affirmative(&self, column: &str) -> bool {
        self.field(column)
            .map(|v| v.to_uppercase() == "YES")
            .unwrap_or(false)
    }
}

// ── NormalizedRecord ──────────────────────────────────────────────────────────

/// A record with cleaned amount, county, zip and resolved city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub source: AssistanceRecord,
    /// Always finite and `>= 0`.
    pub amount: f64,
    /// Trimmed, lowercased and alias-corrected.
    pub county: String,
    /// Always exactly five characters.
    pub zip: String,
    /// Title-cased city from the reference table, or [`UNMATCHED_CITY`].
    pub city: String,
}

impl NormalizedRecord {
    /// `true` when the zip had no entry in the reference table.
    pub fn is_unmatched(&self) -> bool {
        self.city == UNMATCHED_CITY
    }
}

// ── TemporalKeys ──────────────────────────────────────────────────────────────

/// Period identifiers derived from a successfully parsed assistance date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalKeys {
    pub date: NaiveDate,
    /// Four-digit year, e.g. `"2024"`.
    pub year: String,
    /// Display form, e.g. `"January 2024"`.
    pub month_label: String,
    /// Sunday-first week number, e.g. `"Week 02, 2024"`.
    pub week_label: String,
    /// Sortable month key, e.g. `"2024-01"`.
    pub year_month: String,
}

// ── ClassifiedRecord ──────────────────────────────────────────────────────────

/// A normalized record annotated with its demographic labels and periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub normalized: NormalizedRecord,
    pub race: String,
    pub income_bin: String,
    pub education: String,
    pub employment: String,
    /// `None` when the assistance date could not be parsed.
    pub temporal: Option<TemporalKeys>,
}

impl ClassifiedRecord {
    pub fn amount(&self) -> f64 {
        self.normalized.amount
    }

    pub fn county(&self) -> &str {
        &self.normalized.county
    }

    pub fn zip(&self) -> &str {
        &self.normalized.zip
    }

    pub fn city(&self) -> &str {
        &self.normalized.city
    }

    pub fn is_unmatched(&self) -> bool {
        self.normalized.is_unmatched()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.temporal.as_ref().map(|t| t.date)
    }

    pub fn year(&self) -> Option<&str> {
        self.temporal.as_ref().map(|t| t.year.as_str())
    }

    pub fn year_month(&self) -> Option<&str> {
        self.temporal.as_ref().map(|t| t.year_month.as_str())
    }

    pub fn month_label(&self) -> Option<&str> {
        self.temporal.as_ref().map(|t| t.month_label.as_str())
    }

    pub fn week_label(&self) -> Option<&str> {
        self.temporal.as_ref().map(|t| t.week_label.as_str())
    }
}
