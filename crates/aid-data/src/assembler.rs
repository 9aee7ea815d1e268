//! Joins buckets, demographic indexes and dataset metadata into the
//! [`SummaryDocument`].

use aid_core::dates::format_iso_date;
use aid_core::document::{
    CountyRow, DatasetInfo, Monthly, MonthlyRow, PeriodMap, SummaryDocument, UnmatchedZipRow,
    WeeklyRow, Yearly, YearlyRow, ZipPeriodRow, ZipRow,
};
use aid_core::models::ClassifiedRecord;
use tracing::debug;

use crate::aggregator::{Aggregator, Bucket, PeriodCountyKey, PeriodZipKey};
use crate::demographics::{DemographicIndex, DemographicIndexer, PeriodZip};

/// Builds the summary document from classified records.
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn assemble(records: &[ClassifiedRecord]) -> SummaryDocument {
        let totals = Aggregator::totals(records);

        let month_zip_demo = DemographicIndexer::by_month_zip(records);
        let year_zip_demo = DemographicIndexer::by_year_zip(records);
        let month_demo = DemographicIndexer::by_period(&month_zip_demo);
        let year_demo = DemographicIndexer::by_period(&year_zip_demo);
        let zip_demo = DemographicIndexer::by_zip(records);

        let document = SummaryDocument {
            dataset_info: Self::dataset_info(records),
            total_people_helped: totals.count,
            total_food_delivered: totals.amount,
            county_summary: county_rows(Aggregator::by_county(records)),
            yearly_summary: Aggregator::by_year(records)
                .into_iter()
                .map(|b| YearlyRow {
                    demographics: year_demo.lists_for(&b.key),
                    year: b.key,
                    amount_delivered: b.stats.amount,
                    people_helped: b.stats.count,
                })
                .collect(),
            monthly_summary: Aggregator::by_month(records)
                .into_iter()
                .map(|b| {
                    let (year_month, month) = b.key;
                    MonthlyRow {
                        demographics: month_demo.lists_for(&year_month),
                        year_month,
                        month,
                        amount_delivered: b.stats.amount,
                        people_helped: b.stats.count,
                    }
                })
                .collect(),
            weekly_summary: Aggregator::by_week(records)
                .into_iter()
                .map(|b| WeeklyRow {
                    week: b.key,
                    amount_delivered: b.stats.amount,
                    people_helped: b.stats.count,
                })
                .collect(),
            county_monthly: Monthly {
                monthly: county_period_map(Aggregator::by_month_county(records)),
            },
            county_yearly: Yearly {
                yearly: county_period_map(Aggregator::by_year_county(records)),
            },
            zip_summary: Aggregator::by_zip_city(records)
                .into_iter()
                .map(|b| {
                    let (zip_code, city) = b.key;
                    ZipRow {
                        demographics: zip_demo.lists_for(&zip_code),
                        zip_code,
                        city,
                        amount: b.stats.amount,
                        people_helped: b.stats.count,
                    }
                })
                .collect(),
            zip_monthly: Monthly {
                monthly: zip_period_map(Aggregator::by_month_zip(records), &month_zip_demo),
            },
            zip_yearly: Yearly {
                yearly: zip_period_map(Aggregator::by_year_zip(records), &year_zip_demo),
            },
            unmatched_zip_summary: Aggregator::unmatched_zips(records)
                .into_iter()
                .map(|b| UnmatchedZipRow {
                    zip_code: b.key,
                    amount: b.stats.amount,
                    people_helped: b.stats.count,
                })
                .collect(),
        };

        debug!(
            "Assembled summary: {} counties, {} zips, {} months, {} weeks",
            document.county_summary.len(),
            document.zip_summary.len(),
            document.monthly_summary.len(),
            document.weekly_summary.len()
        );

        document
    }

    /// Date range over parseable dates and the full record count.
    pub fn dataset_info(records: &[ClassifiedRecord]) -> DatasetInfo {
        let start = records.iter().filter_map(ClassifiedRecord::date).min();
        let end = records.iter().filter_map(ClassifiedRecord::date).max();

        DatasetInfo {
            start_date: start.map(format_iso_date),
            end_date: end.map(format_iso_date),
            record_count: records.len() as u64,
        }
    }
}

fn county_rows(buckets: Vec<Bucket<String>>) -> Vec<CountyRow> {
    buckets
        .into_iter()
        .map(|b| CountyRow {
            county: b.key,
            amount: b.stats.amount,
            people_helped: b.stats.count,
        })
        .collect()
}

fn county_period_map(buckets: Vec<Bucket<PeriodCountyKey>>) -> PeriodMap<CountyRow> {
    let mut map = PeriodMap::new();
    for b in buckets {
        let (period, county) = b.key;
        map.entry(period).or_insert_with(Vec::new).push(CountyRow {
            county,
            amount: b.stats.amount,
            people_helped: b.stats.count,
        });
    }
    map
}

fn zip_period_map(
    buckets: Vec<Bucket<PeriodZipKey>>,
    demographics: &DemographicIndex<PeriodZip>,
) -> PeriodMap<ZipPeriodRow> {
    let mut map = PeriodMap::new();
    for b in buckets {
        let (period, zip_code, city) = b.key;
        let demo_key = (period, zip_code);
        let row = ZipPeriodRow {
            demographics: demographics.lists_for(&demo_key),
            zip_code: demo_key.1,
            city,
            amount: b.stats.amount,
            people_helped: b.stats.count,
        };
        map.entry(demo_key.0).or_insert_with(Vec::new).push(row);
    }
    map
}
