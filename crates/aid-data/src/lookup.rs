//! Zip-to-city reference table.

use std::collections::HashMap;
use std::path::Path;

use aid_core::formatting::normalize_zip;
use aid_core::{Result, SummaryError};
use tracing::debug;

use crate::reader::clean_header;

const ZIP_COLUMN: &str = "zip";
const CITY_COLUMN: &str = "City";

/// Anything that can resolve a normalized zip code to a city name.
pub trait CityLookup {
    fn city_for(&self, zip: &str) -> Option<&str>;
}

impl<T: CityLookup + ?Sized> CityLookup for &T {
    fn city_for(&self, zip: &str) -> Option<&str> {
        (**self).city_for(zip)
    }
}

impl CityLookup for HashMap<String, String> {
    fn city_for(&self, zip: &str) -> Option<&str> {
        self.get(zip).map(String::as_str)
    }
}

/// The reference table loaded from a CSV with `zip` and `City` columns.
#[derive(Debug, Clone, Default)]
pub struct ZipCityLookup {
    cities: HashMap<String, String>,
}

impl ZipCityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping. The zip is normalized; an existing entry is kept.
    pub fn insert(&mut self, zip: &str, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }
        self.cities
            .entry(normalize_zip(zip))
            .or_insert_with(|| city.to_string());
    }

    /// Load the table from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| SummaryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let lookup = Self::from_reader(file)?;
        debug!(
            "Loaded {} zip-city mappings from {}",
            lookup.len(),
            path.display()
        );
        Ok(lookup)
    }

    /// Parse the table from any CSV source.
    ///
    /// Rows with a blank city are skipped and the first row for a zip wins.
    pub fn from_reader<R: std::io::Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
        let zip_idx = column_index(&headers, ZIP_COLUMN)?;
        let city_idx = column_index(&headers, CITY_COLUMN)?;

        let mut lookup = Self::new();
        for row in reader.records() {
            let row = row?;
            let zip = row.get(zip_idx).unwrap_or("");
            let city = row.get(city_idx).unwrap_or("");
            lookup.insert(zip, city);
        }
        Ok(lookup)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl CityLookup for ZipCityLookup {
    fn city_for(&self, zip: &str) -> Option<&str> {
        self.cities.get(zip).map(String::as_str)
    }
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| SummaryError::ZipMap(format!("missing column \"{}\"", name)))
}
