//! Group-by-sum/count over classified records.
//!
//! Every summary in the document is one application of [`Aggregator::group_by`]
//! with a different key selector.

use std::collections::BTreeMap;

use aid_core::models::ClassifiedRecord;

// ── AggregatedStats ───────────────────────────────────────────────────────────

/// Amount and record totals accumulated across records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregatedStats {
    pub amount: f64,
    pub count: u64,
}

impl AggregatedStats {
    /// Add a single record to the running totals.
    pub fn add_record(&mut self, record: &ClassifiedRecord) {
        self.amount += record.amount();
        self.count += 1;
    }
}

// ── Bucket ────────────────────────────────────────────────────────────────────

/// Totals for one distinct grouping key.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<K> {
    pub key: K,
    pub stats: AggregatedStats,
}

/// `(period, county)`.
pub type PeriodCountyKey = (String, String);
/// `(period, zip, city)`.
pub type PeriodZipKey = (String, String, String);

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that groups records by one or more keys.
pub struct Aggregator;

impl Aggregator {
    /// Group by normalized county.
    pub fn by_county(records: &[ClassifiedRecord]) -> Vec<Bucket<String>> {
        Self::group_by(records, |r| Some(r.county().to_string()))
    }

    /// Group by `(zip, city)`.
    pub fn by_zip_city(records: &[ClassifiedRecord]) -> Vec<Bucket<(String, String)>> {
        Self::group_by(records, |r| Some((r.zip().to_string(), r.city().to_string())))
    }

    /// Group by week label. Undated records are skipped.
    pub fn by_week(records: &[ClassifiedRecord]) -> Vec<Bucket<String>> {
        Self::group_by(records, |r| r.week_label().map(str::to_string))
    }

    /// Group by `(year_month, month_label)`. The label is determined by the
    /// year-month, so this is a grouping by month ordered by `"YYYY-MM"`.
    pub fn by_month(records: &[ClassifiedRecord]) -> Vec<Bucket<(String, String)>> {
        Self::group_by(records, |r| {
            r.temporal
                .as_ref()
                .map(|t| (t.year_month.clone(), t.month_label.clone()))
        })
    }

    /// Group by year.
    pub fn by_year(records: &[ClassifiedRecord]) -> Vec<Bucket<String>> {
        Self::group_by(records, |r| r.year().map(str::to_string))
    }

    /// Group by `(year_month, county)`.
    pub fn by_month_county(records: &[ClassifiedRecord]) -> Vec<Bucket<PeriodCountyKey>> {
        Self::group_by(records, |r| {
            r.year_month()
                .map(|ym| (ym.to_string(), r.county().to_string()))
        })
    }

    /// Group by `(year, county)`.
    pub fn by_year_county(records: &[ClassifiedRecord]) -> Vec<Bucket<PeriodCountyKey>> {
        Self::group_by(records, |r| {
            r.year().map(|y| (y.to_string(), r.county().to_string()))
        })
    }

    /// Group by `(year_month, zip, city)`.
    pub fn by_month_zip(records: &[ClassifiedRecord]) -> Vec<Bucket<PeriodZipKey>> {
        Self::group_by(records, |r| {
            r.year_month()
                .map(|ym| (ym.to_string(), r.zip().to_string(), r.city().to_string()))
        })
    }

    /// Group by `(year, zip, city)`.
    pub fn by_year_zip(records: &[ClassifiedRecord]) -> Vec<Bucket<PeriodZipKey>> {
        Self::group_by(records, |r| {
            r.year()
                .map(|y| (y.to_string(), r.zip().to_string(), r.city().to_string()))
        })
    }

    /// Group records whose zip has no city mapping by zip.
    pub fn unmatched_zips(records: &[ClassifiedRecord]) -> Vec<Bucket<String>> {
        Self::group_by(records, |r| {
            if r.is_unmatched() {
                Some(r.zip().to_string())
            } else {
                None
            }
        })
    }

    /// Sum the stats of all buckets into a single [`AggregatedStats`].
    pub fn calculate_totals<K>(buckets: &[Bucket<K>]) -> AggregatedStats {
        let mut totals = AggregatedStats::default();
        for bucket in buckets {
            totals.amount += bucket.stats.amount;
            totals.count += bucket.stats.count;
        }
        totals
    }

    /// Totals over every record, dated or not.
    pub fn totals(records: &[ClassifiedRecord]) -> AggregatedStats {
        let mut totals = AggregatedStats::default();
        for record in records {
            totals.add_record(record);
        }
        totals
    }

    /// Generic aggregation driver.
    ///
    /// `key_fn` returns the grouping key of a record, or `None` to leave the
    /// record out of this grouping. Buckets come back in ascending key order.
    pub fn group_by<K, F>(records: &[ClassifiedRecord], key_fn: F) -> Vec<Bucket<K>>
    where
        K: Ord,
        F: Fn(&ClassifiedRecord) -> Option<K>,
    {
        let mut map: BTreeMap<K, AggregatedStats> = BTreeMap::new();

        for record in records {
            if let Some(key) = key_fn(record) {
                map.entry(key).or_default().add_record(record);
            }
        }

        map.into_iter()
            .map(|(key, stats)| Bucket { key, stats })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
