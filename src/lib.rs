//! Postal Extremes Library
//!
//! Reads delimited postal-code datasets and reports, for each region, the
//! codes lying furthest east, west, north and south.
//!
//! This library provides tools for:
//! - Packing and unpacking fixed-width records through a schema-driven field buffer
//! - Normalizing raw lines into bounded postal records with lenient coordinate parsing
//! - Tracking directional extremes per grouping key in a single pass
//! - Writing the extremes table, the flat listing and a fixed-width record export

pub mod aggregator;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod field_buffer;
pub mod models;
pub mod processor;

// Re-export commonly used types
pub use aggregator::{ExtremeAggregator, ExtremeRecord, Observation};
pub use codec::RecordCodec;
pub use config::ExtremesConfig;
pub use error::{FieldBufferError, PostalError, Result};
pub use field_buffer::{FieldBuffer, FieldSchema};
pub use models::{DecodedRecord, ProcessingStats, ReportFormat};
pub use processor::ExtremesProcessor;
