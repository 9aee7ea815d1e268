mod bootstrap;

use std::process::ExitCode;

use aid_core::document::{ErrorDocument, Report};
use aid_core::settings::Settings;
use aid_data::analysis::analyze_text_with;
use aid_data::lookup::ZipCityLookup;
use aid_data::reader::{decode_input, load_input_bytes};
use anyhow::{Context, Result};
use serde::Serialize;

fn main() -> ExitCode {
    let settings = Settings::load();

    if let Err(e) = bootstrap::setup_logging(&settings.log_level) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    tracing::info!("aid-summary v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(report) => {
            if let Report::Error(e) = &report {
                tracing::warn!("Input rejected: {}", e.error);
            }
            emit(&report, settings.pretty);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            emit(&ErrorDocument::fatal(format!("{:#}", e)), settings.pretty);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and input, then run the pipeline. The zip-city table
/// is read only after the input header passes the column check.
fn run(settings: &Settings) -> Result<Report> {
    let config = settings.pipeline_config()?;

    let input = load_input_bytes(settings.input.as_deref())?;
    tracing::debug!("Read {} input bytes", input.len());
    let text = decode_input(&input)?;

    analyze_text_with(text, &config, || {
        ZipCityLookup::load_from(&settings.zip_map).with_context(|| {
            format!(
                "loading zip-city mapping from {}",
                settings.zip_map.display()
            )
        })
    })
}

/// Write one JSON document to stdout.
fn emit<T: Serialize>(document: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };

    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!("Failed to serialize output: {}", e);
            println!("{{\"error\": \"Fatal error: failed to serialize output\"}}");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
