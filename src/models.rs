//! Core data structures for postal extremes processing.
//!
//! Defines the decoded postal record, report format selection and the
//! statistics returned by a processing run.

use crate::constants::{CODE_LENGTH, COUNTY_LENGTH, PLACE_LENGTH, SUBDIVISION_LENGTH};
use arrayvec::ArrayString;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub type PostalCode = ArrayString<CODE_LENGTH>;
pub type PlaceName = ArrayString<PLACE_LENGTH>;
pub type SubdivisionCode = ArrayString<SUBDIVISION_LENGTH>;
pub type CountyName = ArrayString<COUNTY_LENGTH>;

/// One input line mapped onto the fixed postal record layout.
///
/// Text fields are bounded by their declared maximum length; coordinates
/// are already converted. Created per input line and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// Postal code, the record identifier in reports
    pub code: PostalCode,
    pub place: PlaceName,
    /// Subdivision (state/province) code, the grouping key for extremes
    pub subdivision: SubdivisionCode,
    pub county: CountyName,
    pub latitude: f64,
    pub longitude: f64,
}

/// Output layout for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Fixed-width columns with a separator line under the header
    #[default]
    Table,
    /// Delimited rows with a header row
    Csv,
}

/// Processing statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    /// Data lines read after the header
    pub lines_read: usize,
    /// Lines decoded and observed
    pub records_processed: usize,
    /// Blank lines skipped
    pub blank_lines: usize,
    /// Distinct grouping keys seen
    pub regions: usize,
    pub extremes_output: Option<PathBuf>,
    pub listing_output: Option<PathBuf>,
    pub records_output: Option<PathBuf>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Records processed per second, 0 when the run was instantaneous
    pub fn throughput(&self) -> f64 {
        if self.processing_time_ms == 0 {
            0.0
        } else {
            self.records_processed as f64 / (self.processing_time_ms as f64 / 1000.0)
        }
    }
}
