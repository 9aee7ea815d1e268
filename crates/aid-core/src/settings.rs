use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SummaryError};

/// Location of the zip-to-city reference table when none is given.
pub const DEFAULT_ZIP_MAP: &str = "./public/data/Zip-City_Mapping.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarize financial-assistance case records for the reporting dashboard
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aid-summary",
    about = "Summarize financial-assistance case records for the reporting dashboard",
    version
)]
pub struct Settings {
    /// CSV file with case records (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Zip-to-city reference table (CSV with "zip" and "City" columns)
    #[arg(long, env = "AID_SUMMARY_ZIP_MAP", default_value = DEFAULT_ZIP_MAP)]
    pub zip_map: PathBuf,

    /// Pipeline configuration file (JSON)
    #[arg(long, env = "AID_SUMMARY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Pretty-print the JSON document
    #[arg(long)]
    pub pretty: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::parse()
    }

    /// Parse an explicit argument list (argv[0] included).
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Resolve the pipeline configuration.
    ///
    /// An explicit `--config` file must load cleanly. Without one, the
    /// per-user file is used when it exists, otherwise the built-in defaults.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        match &self.config {
            Some(path) => PipelineConfig::load_from(path),
            None => PipelineConfig::load_default(),
        }
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Tunable normalization tables, read from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Misspelled county name -> canonical name. Replaces the defaults when
    /// present in a config file.
    pub county_aliases: BTreeMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut county_aliases = BTreeMap::new();
        county_aliases.insert("gwinett".to_string(), "gwinnett".to_string());
        Self { county_aliases }
    }
}

impl PipelineConfig {
    /// Per-user config path: `<config_dir>/aid-summary/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| Self::config_path_in(&dir))
    }

    /// The config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join("aid-summary").join("config.json")
    }

    /// Load the per-user config if present, defaults otherwise.
    pub fn load_default() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SummaryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SummaryError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(
            "Loaded pipeline config from {} ({} county aliases)",
            path.display(),
            config.county_aliases.len()
        );
        Ok(config.normalized())
    }

    /// Canonical county name for `county`, which must already be trimmed and
    /// lowercased.
    pub fn resolve_county<'a>(&'a self, county: &'a str) -> &'a str {
        self.county_aliases
            .get(county)
            .map(String::as_str)
            .unwrap_or(county)
    }

    /// Alias keys and targets are compared against trimmed, lowercased
    /// county names.
    fn normalized(self) -> Self {
        let county_aliases = self
            .county_aliases
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_lowercase()))
            .collect();
        Self { county_aliases }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::load_from_args(["aid-summary"]);
        assert!(settings.input.is_none());
        assert_eq!(settings.log_level, "WARNING");
        assert!(!settings.pretty);
    }

    #[test]
    fn test_settings_explicit_args() {
        let settings = Settings::load_from_args([
            "aid-summary",
            "--input",
            "cases.csv",
            "--zip-map",
            "zips.csv",
            "--log-level",
            "DEBUG",
            "--pretty",
        ]);
        assert_eq!(settings.input, Some(PathBuf::from("cases.csv")));
        assert_eq!(settings.zip_map, PathBuf::from("zips.csv"));
        assert_eq!(settings.log_level, "DEBUG");
        assert!(settings.pretty);
    }

    #[test]
    fn test_default_config_has_gwinnett_alias() {
        let config = PipelineConfig::default();
        assert_eq!(config.resolve_county("gwinett"), "gwinnett");
        assert_eq!(config.resolve_county("fulton"), "fulton");
    }

    #[test]
    fn test_load_from_normalizes_aliases() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"county_aliases": {" DeKalb Co ": "DeKalb", "cobb county": "cobb"}}"#,
        )
        .unwrap();

        let config = PipelineConfig::load_from(&path).expect("config loads");
        assert_eq!(config.county_aliases.len(), 2);
        assert_eq!(config.resolve_county("dekalb co"), "dekalb");
        assert_eq!(config.resolve_county("cobb county"), "cobb");
        // Aliases in a file replace the defaults.
        assert_eq!(config.resolve_county("gwinett"), "gwinett");
    }

    #[test]
    fn test_load_from_empty_object_uses_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();

        let config = PipelineConfig::load_from(&path).expect("config loads");
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = PipelineConfig::load_from(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SummaryError::FileRead { .. }));
    }

    #[test]
    fn test_load_from_malformed_file_is_config_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"county_aliases": ["gwinett"]}"#).unwrap();

        let err = PipelineConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SummaryError::Config(_)));
    }

    #[test]
    fn test_config_path_in() {
        let path = PipelineConfig::config_path_in(Path::new("/home/user/.config"));
        assert_eq!(
            path,
            PathBuf::from("/home/user/.config/aid-summary/config.json")
        );
    }
}
