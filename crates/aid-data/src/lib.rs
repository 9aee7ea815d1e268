//! Processing layer for the assistance summary.
//!
//! Reads case exports, normalizes and classifies every record, groups them
//! along the geographic and temporal keys the dashboard needs, and assembles
//! the summary document.

pub mod aggregator;
pub mod analysis;
pub mod assembler;
pub mod classifier;
pub mod demographics;
pub mod lookup;
pub mod normalizer;
pub mod reader;

pub use aid_core as core;
