//! Demographic and temporal classification of normalized records.

use aid_core::dates::DateParser;
use aid_core::models::{
    AssistanceRecord, ClassifiedRecord, NormalizedRecord, COL_EDUCATION, COL_HOUSEHOLD_INCOME,
    UNKNOWN_LABEL,
};
use tracing::{debug, warn};

// ── Indicator tables ──────────────────────────────────────────────────────────

/// Race/ethnicity indicator columns in priority order. The label is the
/// column name. Order decides ties between several affirmative flags.
pub const RACE_COLUMNS: [&str; 12] = [
    "Asian",
    "Black or African-American",
    "Hispanic, Latino, or Spanish Origin",
    "Middle Eastern or North African",
    "White",
    "American Indian",
    "Multiracial",
    "Pacific Islander",
    "Other",
    "Prefers not to answer",
    "Undisclosed",
    "A race/ethnicity not listed here",
];

/// Employment indicator columns in priority order.
pub const EMPLOYMENT_COLUMNS: [&str; 10] = [
    "Full time",
    "Part time",
    "Unemployed-Seeking",
    "Unemployed-Not Seeking",
    "Disabled",
    "Retired",
    "Prefer not to answer",
    "College Student",
    "Not applicable",
    "Unemployed",
];

/// First column of `columns` flagged affirmative on `record`, else `"Unknown"`.
pub fn first_affirmative(record: &AssistanceRecord, columns: &[&'static str]) -> &'static str {
    columns
        .iter()
        .copied()
        .find(|column| record.is_affirmative(column))
        .unwrap_or(UNKNOWN_LABEL)
}

// ── IncomeBin ─────────────────────────────────────────────────────────────────

/// Household income bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IncomeBin {
    Under25K,
    From25KTo50K,
    From50KTo75K,
    From75KTo100K,
    From100KTo125K,
    Over125K,
    Unknown,
}

impl IncomeBin {
    /// Bracket for a parsed income; each bracket is half-open `[lo, hi)`.
    pub fn from_income(income: f64) -> Self {
        if income.is_nan() {
            IncomeBin::Unknown
        } else if income < 25_000.0 {
            IncomeBin::Under25K
        } else if income < 50_000.0 {
            IncomeBin::From25KTo50K
        } else if income < 75_000.0 {
            IncomeBin::From50KTo75K
        } else if income < 100_000.0 {
            IncomeBin::From75KTo100K
        } else if income < 125_000.0 {
            IncomeBin::From100KTo125K
        } else {
            IncomeBin::Over125K
        }
    }

    /// Bracket for a raw cell; blank or unparseable text is `Unknown`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(parse_income)
            .map(Self::from_income)
            .unwrap_or(IncomeBin::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncomeBin::Under25K => "0-25K",
            IncomeBin::From25KTo50K => "25K-50K",
            IncomeBin::From50KTo75K => "50K-75K",
            IncomeBin::From75KTo100K => "75K-100K",
            IncomeBin::From100KTo125K => "100K-125K",
            IncomeBin::Over125K => "125K+",
            IncomeBin::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl std::fmt::Display for IncomeBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse an income cell, accepting a leading `$` and thousands separators.
fn parse_income(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ── Classifier ────────────────────────────────────────────────────────────────

/// Derives the four demographic labels and the period keys of a record.
pub struct Classifier;

impl Classifier {
    pub fn classify(record: NormalizedRecord) -> ClassifiedRecord {
        let source = &record.source;
        let race = first_affirmative(source, &RACE_COLUMNS).to_string();
        let employment = first_affirmative(source, &EMPLOYMENT_COLUMNS).to_string();
        let income_bin = IncomeBin::from_raw(source.field(COL_HOUSEHOLD_INCOME))
            .label()
            .to_string();
        let education = source
            .field(COL_EDUCATION)
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();
        let temporal = DateParser::temporal_keys(&source.assistance_date);

        ClassifiedRecord {
            normalized: record,
            race,
            income_bin,
            education,
            employment,
            temporal,
        }
    }

    /// Classify a batch, preserving length and order.
    pub fn classify_all(records: Vec<NormalizedRecord>) -> Vec<ClassifiedRecord> {
        let classified: Vec<ClassifiedRecord> = records.into_iter().map(Self::classify).collect();

        let undated = classified.iter().filter(|r| r.temporal.is_none()).count();
        if undated > 0 {
            warn!(
                "{} records have an unparseable assistance date and are left out of period summaries",
                undated
            );
        }
        debug!("Classified {} records", classified.len());

        classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aid_core::models::{COL_DATE, UNMATCHED_CITY};

    fn normalized(columns: &[(&str, &str)]) -> NormalizedRecord {
        NormalizedRecord {
            source: AssistanceRecord::from_columns(columns.iter().copied()),
            amount: 0.0,
            county: "fulton".to_string(),
            zip: "30301".to_string(),
            city: UNMATCHED_CITY.to_string(),
        }
    }

    // ── race / employment ─────────────────────────────────────────────────────

    #[test]
    fn test_race_first_affirmative_in_priority_order() {
        let r = Classifier::classify(normalized(&[("White", "Yes"), ("Asian", "YES")]));
        assert_eq!(r.race, "Asian");
    }

    #[test]
    fn test_race_independent_of_column_order() {
        let a = Classifier::classify(normalized(&[
            ("Multiracial", "yes"),
            ("Black or African-American", "yes"),
        ]));
        let b = Classifier::classify(normalized(&[
            ("Black or African-American", "yes"),
            ("Multiracial", "yes"),
        ]));
        assert_eq!(a.race, "Black or African-American");
        assert_eq!(a.race, b.race);
    }

    #[test]
    fn test_race_unknown_without_flags() {
        let r = Classifier::classify(normalized(&[("White", "No"), ("Asian", "")]));
        assert_eq!(r.race, UNKNOWN_LABEL);
    }

    #[test]
    fn test_race_flag_is_trimmed_and_case_insensitive() {
        let r = Classifier::classify(normalized(&[("Pacific Islander", "  yEs ")]));
        assert_eq!(r.race, "Pacific Islander");
    }

    #[test]
    fn test_employment_priority() {
        let r = Classifier::classify(normalized(&[
            ("Unemployed", "YES"),
            ("Retired", "YES"),
        ]));
        assert_eq!(r.employment, "Retired");
    }

    #[test]
    fn test_employment_unknown() {
        let r = Classifier::classify(normalized(&[]));
        assert_eq!(r.employment, UNKNOWN_LABEL);
    }

    // ── income ────────────────────────────────────────────────────────────────

    #[test]
    fn test_income_bin_boundaries() {
        assert_eq!(IncomeBin::from_income(0.0), IncomeBin::Under25K);
        assert_eq!(IncomeBin::from_income(24_999.99), IncomeBin::Under25K);
        assert_eq!(IncomeBin::from_income(25_000.0), IncomeBin::From25KTo50K);
        assert_eq!(IncomeBin::from_income(50_000.0), IncomeBin::From50KTo75K);
        assert_eq!(IncomeBin::from_income(75_000.0), IncomeBin::From75KTo100K);
        assert_eq!(IncomeBin::from_income(100_000.0), IncomeBin::From100KTo125K);
        assert_eq!(IncomeBin::from_income(124_999.0), IncomeBin::From100KTo125K);
        assert_eq!(IncomeBin::from_income(125_000.0), IncomeBin::Over125K);
        assert_eq!(IncomeBin::from_income(f64::INFINITY), IncomeBin::Over125K);
    }

    #[test]
    fn test_income_bin_from_raw() {
        assert_eq!(IncomeBin::from_raw(Some("42000")), IncomeBin::From25KTo50K);
        assert_eq!(IncomeBin::from_raw(Some("$42,000")), IncomeBin::From25KTo50K);
        assert_eq!(IncomeBin::from_raw(Some("-10")), IncomeBin::Under25K);
        assert_eq!(IncomeBin::from_raw(Some("n/a")), IncomeBin::Unknown);
        assert_eq!(IncomeBin::from_raw(Some("NaN")), IncomeBin::Unknown);
        assert_eq!(IncomeBin::from_raw(None), IncomeBin::Unknown);
    }

    #[test]
    fn test_income_labels() {
        assert_eq!(IncomeBin::Under25K.to_string(), "0-25K");
        assert_eq!(IncomeBin::From100KTo125K.to_string(), "100K-125K");
        assert_eq!(IncomeBin::Over125K.to_string(), "125K+");
        assert_eq!(IncomeBin::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_classify_income_column() {
        let r = Classifier::classify(normalized(&[(COL_HOUSEHOLD_INCOME, "80000")]));
        assert_eq!(r.income_bin, "75K-100K");
        let missing = Classifier::classify(normalized(&[]));
        assert_eq!(missing.income_bin, UNKNOWN_LABEL);
    }

    // ── education ─────────────────────────────────────────────────────────────

    #[test]
    fn test_education_pass_through_and_default() {
        let r = Classifier::classify(normalized(&[(COL_EDUCATION, " High School ")]));
        assert_eq!(r.education, "High School");
        let blank = Classifier::classify(normalized(&[(COL_EDUCATION, "")]));
        assert_eq!(blank.education, UNKNOWN_LABEL);
        let absent = Classifier::classify(normalized(&[]));
        assert_eq!(absent.education, UNKNOWN_LABEL);
    }

    // ── temporal ──────────────────────────────────────────────────────────────

    #[test]
    fn test_temporal_keys_from_date() {
        let r = Classifier::classify(normalized(&[(COL_DATE, "2024-01-15")]));
        assert_eq!(r.year(), Some("2024"));
        assert_eq!(r.year_month(), Some("2024-01"));
        assert_eq!(r.month_label(), Some("January 2024"));
        assert_eq!(r.week_label(), Some("Week 02, 2024"));
    }

    #[test]
    fn test_temporal_keys_absent_for_bad_date() {
        let r = Classifier::classify(normalized(&[(COL_DATE, "soon")]));
        assert!(r.temporal.is_none());
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let out = Classifier::classify_all(vec![
            normalized(&[("Asian", "yes")]),
            normalized(&[("White", "yes")]),
        ]);
        let races: Vec<&str> = out.iter().map(|r| r.race.as_str()).collect();
        assert_eq!(races, vec!["Asian", "White"]);
    }
}
