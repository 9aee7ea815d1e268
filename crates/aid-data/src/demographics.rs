//! Label-count distributions of the classified demographic attributes.

use std::collections::BTreeMap;

use aid_core::document::{DemographicLists, LabelCount};
use aid_core::models::ClassifiedRecord;

// ── DemographicBreakdown ──────────────────────────────────────────────────────

/// Occurrence counts per label for race, income, education and employment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemographicBreakdown {
    pub race: BTreeMap<String, u64>,
    pub income: BTreeMap<String, u64>,
    pub education: BTreeMap<String, u64>,
    pub employment: BTreeMap<String, u64>,
}

impl DemographicBreakdown {
    pub fn add_record(&mut self, record: &ClassifiedRecord) {
        *self.race.entry(record.race.clone()).or_default() += 1;
        *self.income.entry(record.income_bin.clone()).or_default() += 1;
        *self.education.entry(record.education.clone()).or_default() += 1;
        *self.employment.entry(record.employment.clone()).or_default() += 1;
    }

    /// Fold `other`'s counts into `self`.
    pub fn merge(&mut self, other: &DemographicBreakdown) {
        merge_counts(&mut self.race, &other.race);
        merge_counts(&mut self.income, &other.income);
        merge_counts(&mut self.education, &other.education);
        merge_counts(&mut self.employment, &other.employment);
    }

    /// Number of records counted (every record has exactly one race label).
    pub fn record_count(&self) -> u64 {
        self.race.values().sum()
    }

    /// Document form: `{label, count}` lists sorted by label.
    pub fn to_lists(&self) -> DemographicLists {
        DemographicLists {
            race: to_label_counts(&self.race),
            income: to_label_counts(&self.income),
            education: to_label_counts(&self.education),
            employment: to_label_counts(&self.employment),
        }
    }
}

fn merge_counts(into: &mut BTreeMap<String, u64>, from: &BTreeMap<String, u64>) {
    for (label, count) in from {
        *into.entry(label.clone()).or_default() += count;
    }
}

fn to_label_counts(counts: &BTreeMap<String, u64>) -> Vec<LabelCount> {
    counts
        .iter()
        .map(|(label, count)| LabelCount {
            label: label.clone(),
            count: *count,
        })
        .collect()
}

// ── DemographicIndex ──────────────────────────────────────────────────────────

/// Breakdowns keyed by a grouping key such as a zip or `(period, zip)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemographicIndex<K: Ord> {
    entries: BTreeMap<K, DemographicBreakdown>,
}

impl<K: Ord> Default for DemographicIndex<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord> DemographicIndex<K> {
    /// Count labels per key. Records for which `key_fn` yields `None` are
    /// left out.
    pub fn build<F>(records: &[ClassifiedRecord], key_fn: F) -> Self
    where
        F: Fn(&ClassifiedRecord) -> Option<K>,
    {
        let mut entries: BTreeMap<K, DemographicBreakdown> = BTreeMap::new();
        for record in records {
            if let Some(key) = key_fn(record) {
                entries.entry(key).or_default().add_record(record);
            }
        }
        Self { entries }
    }

    /// Re-key through `f`, merging breakdowns whose new keys collide.
    ///
    /// Used to drop the zip component of a `(period, zip)` index.
    pub fn rollup<J, F>(&self, f: F) -> DemographicIndex<J>
    where
        J: Ord,
        F: Fn(&K) -> J,
    {
        let mut entries: BTreeMap<J, DemographicBreakdown> = BTreeMap::new();
        for (key, breakdown) in &self.entries {
            entries.entry(f(key)).or_default().merge(breakdown);
        }
        DemographicIndex { entries }
    }

    pub fn get(&self, key: &K) -> Option<&DemographicBreakdown> {
        self.entries.get(key)
    }

    /// Document lists for `key`; four empty lists when nothing was counted.
    pub fn lists_for(&self, key: &K) -> DemographicLists {
        self.get(key)
            .map(DemographicBreakdown::to_lists)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &DemographicBreakdown)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── DemographicIndexer ────────────────────────────────────────────────────────

/// `(period, zip)`.
pub type PeriodZip = (String, String);

/// The indexes the document needs.
pub struct DemographicIndexer;

impl DemographicIndexer {
    /// By zip, over every record.
    pub fn by_zip(records: &[ClassifiedRecord]) -> DemographicIndex<String> {
        DemographicIndex::build(records, |r| Some(r.zip().to_string()))
    }

    /// By `(year_month, zip)`, dated records only.
    pub fn by_month_zip(records: &[ClassifiedRecord]) -> DemographicIndex<PeriodZip> {
        DemographicIndex::build(records, |r| {
            r.year_month()
                .map(|ym| (ym.to_string(), r.zip().to_string()))
        })
    }

    /// By `(year, zip)`, dated records only.
    pub fn by_year_zip(records: &[ClassifiedRecord]) -> DemographicIndex<PeriodZip> {
        DemographicIndex::build(records, |r| {
            r.year().map(|y| (y.to_string(), r.zip().to_string()))
        })
    }

    /// Collapse a `(period, zip)` index to a per-period index.
    pub fn by_period(index: &DemographicIndex<PeriodZip>) -> DemographicIndex<String> {
        index.rollup(|(period, _zip)| period.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aid_core::models::{AssistanceRecord, NormalizedRecord, TemporalKeys, UNKNOWN_LABEL};
    use chrono::NaiveDate;

    fn make_record(zip: &str, race: &str, income: &str, date: Option<&str>) -> ClassifiedRecord {
        ClassifiedRecord {
            normalized: NormalizedRecord {
                source: AssistanceRecord::default(),
                amount: 1.0,
                county: "fulton".to_string(),
                zip: zip.to_string(),
                city: "Atlanta".to_string(),
            },
            race: race.to_string(),
            income_bin: income.to_string(),
            education: UNKNOWN_LABEL.to_string(),
            employment: "Retired".to_string(),
            temporal: date.map(|d| {
                TemporalKeys::from_date(NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap())
            }),
        }
    }

    fn sample() -> Vec<ClassifiedRecord> {
        vec![
            make_record("30301", "White", "0-25K", Some("2024-01-15")),
            make_record("30301", "Asian", "0-25K", Some("2024-01-16")),
            make_record("30301", "White", "125K+", Some("2024-02-01")),
            make_record("30043", "White", UNKNOWN_LABEL, Some("2024-01-02")),
            make_record("30043", UNKNOWN_LABEL, UNKNOWN_LABEL, None),
        ]
    }

    fn label_pairs(list: &[LabelCount]) -> Vec<(&str, u64)> {
        list.iter().map(|lc| (lc.label.as_str(), lc.count)).collect()
    }

    #[test]
    fn test_by_zip_counts_every_record() {
        let index = DemographicIndexer::by_zip(&sample());
        assert_eq!(index.len(), 2);

        let lists = index.lists_for(&"30301".to_string());
        assert_eq!(label_pairs(&lists.race), vec![("Asian", 1), ("White", 2)]);
        assert_eq!(label_pairs(&lists.income), vec![("0-25K", 2), ("125K+", 1)]);
        assert_eq!(label_pairs(&lists.employment), vec![("Retired", 3)]);

        let undated_zip = index.get(&"30043".to_string()).unwrap();
        assert_eq!(undated_zip.record_count(), 2);
    }

    #[test]
    fn test_lists_for_absent_key_is_empty() {
        let index = DemographicIndexer::by_zip(&sample());
        let lists = index.lists_for(&"99999".to_string());
        assert_eq!(lists, DemographicLists::default());
        assert!(lists.race.is_empty());
        assert!(lists.employment.is_empty());
    }

    #[test]
    fn test_by_month_zip_skips_undated() {
        let index = DemographicIndexer::by_month_zip(&sample());
        let keys: Vec<(&str, &str)> = index
            .iter()
            .map(|(k, _)| (k.0.as_str(), k.1.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("2024-01", "30043"), ("2024-01", "30301"), ("2024-02", "30301")]
        );
        let total: u64 = index.iter().map(|(_, b)| b.record_count()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_by_period_rolls_up_zips() {
        let by_month_zip = DemographicIndexer::by_month_zip(&sample());
        let by_month = DemographicIndexer::by_period(&by_month_zip);

        assert_eq!(by_month.len(), 2);
        let january = by_month.lists_for(&"2024-01".to_string());
        assert_eq!(label_pairs(&january.race), vec![("Asian", 1), ("White", 2)]);
        assert_eq!(
            label_pairs(&january.income),
            vec![("0-25K", 2), (UNKNOWN_LABEL, 1)]
        );
    }

    #[test]
    fn test_rollup_matches_direct_period_index() {
        let records = sample();
        let rolled = DemographicIndexer::by_period(&DemographicIndexer::by_year_zip(&records));
        let direct = DemographicIndex::build(&records, |r| r.year().map(str::to_string));
        assert_eq!(rolled, direct);
    }

    #[test]
    fn test_merge_adds_counts() {
        let records = sample();
        let mut a = DemographicBreakdown::default();
        a.add_record(&records[0]);
        let mut b = DemographicBreakdown::default();
        b.add_record(&records[2]);
        b.add_record(&records[1]);

        a.merge(&b);
        assert_eq!(a.record_count(), 3);
        assert_eq!(a.race.get("White"), Some(&2));
        assert_eq!(a.employment.get("Retired"), Some(&3));
    }

    #[test]
    fn test_empty_records() {
        let index = DemographicIndexer::by_zip(&[]);
        assert!(index.is_empty());
    }
}
