//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline against small postal datasets
//! written to temporary directories.
