//! Main processing engine.
//!
//! Runs one forward pass over a postal dataset: every line is split, decoded
//! and then both folded into the extremes aggregator and streamed to the
//! listing (and, when configured, to the fixed-width export). The extremes
//! table is written once the pass completes.

pub mod source;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::source::{LineSource, split_fields};
use self::writer::{ListingWriter, RecordExporter, open_sink, write_extremes};

use crate::aggregator::{ExtremeAggregator, Observation};
use crate::codec::RecordCodec;
use crate::config::ExtremesConfig;
use crate::constants::{PROGRESS_UPDATE_INTERVAL, RECORD_FIELD_COUNT};
use crate::error::{PostalError, Result};
use crate::models::ProcessingStats;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Processor for one postal dataset
#[derive(Debug)]
pub struct ExtremesProcessor {
    config: ExtremesConfig,
    codec: RecordCodec,
}

impl ExtremesProcessor {
    /// Create a processor after validating `config`
    pub fn new(config: ExtremesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codec: RecordCodec::new(),
        })
    }

    pub fn config(&self) -> &ExtremesConfig {
        &self.config
    }

    /// Main processing entry point.
    ///
    /// Opens the input and every configured output before reading any
    /// record, so a missing input or an uncreatable output fails the run
    /// without producing partial reports.
    pub fn process(&self) -> Result<(ExtremeAggregator, ProcessingStats)> {
        let start_time = Instant::now();
        let input_path = &self.config.input_path;

        info!("Processing postal dataset: {}", input_path.display());

        let input = File::open(input_path).map_err(|source| PostalError::InputOpen {
            path: input_path.clone(),
            source,
        })?;

        let listing_sink = open_sink(self.config.listing_output.as_deref())?;
        let mut extremes_sink = open_sink(self.config.extremes_output.as_deref())?;
        let mut exporter = match self.config.records_output.as_deref() {
            Some(path) => Some(RecordExporter::new(open_sink(Some(path))?)?),
            None => None,
        };

        let mut listing =
            ListingWriter::new(listing_sink, self.config.format, self.config.delimiter)?;
        let mut stats = ProcessingStats {
            extremes_output: self.config.extremes_output.clone(),
            listing_output: self.config.listing_output.clone(),
            records_output: self.config.records_output.clone(),
            ..Default::default()
        };

        let aggregator = self.ingest(
            BufReader::new(input),
            &mut listing,
            exporter.as_mut(),
            &mut stats,
        )?;

        listing.finish()?;
        if let Some(exporter) = exporter {
            exporter.finish()?;
        }

        if self.config.extremes_output.is_none() && self.config.listing_output.is_none() {
            // Both reports share stdout
            writeln!(extremes_sink)?;
        }
        write_extremes(
            &mut extremes_sink,
            &aggregator,
            self.config.format,
            self.config.delimiter,
        )?;

        stats.regions = aggregator.len();
        stats.processing_time_ms = start_time.elapsed().as_millis();

        info!(
            "Processed {} records into {} regions in {}ms",
            stats.records_processed, stats.regions, stats.processing_time_ms
        );

        Ok((aggregator, stats))
    }

    /// Single forward pass over `reader`.
    ///
    /// The header is skipped when configured. Blank lines are counted and
    /// skipped; every other line becomes exactly one observation keyed by
    /// its subdivision code.
    pub fn ingest<R, L, E>(
        &self,
        reader: R,
        listing: &mut ListingWriter<L>,
        mut exporter: Option<&mut RecordExporter<E>>,
        stats: &mut ProcessingStats,
    ) -> Result<ExtremeAggregator>
    where
        R: BufRead,
        L: Write,
        E: Write,
    {
        let mut source = LineSource::new(reader);
        let mut aggregator = ExtremeAggregator::new();
        let progress = self.create_progress_bar();

        if self.config.skip_header {
            match source.skip_header()? {
                Some(header) => {
                    let columns = split_fields(&header, self.config.delimiter).len();
                    if columns < RECORD_FIELD_COUNT {
                        warn!(
                            "Header has {} columns, records are read as {} positional fields",
                            columns, RECORD_FIELD_COUNT
                        );
                    }
                }
                None => debug!("Input is empty, no header found"),
            }
        }

        while let Some(line) = source.next_line()? {
            stats.lines_read += 1;

            if line.trim().is_empty() {
                stats.blank_lines += 1;
                debug!("Skipping blank line {}", source.line_number());
                continue;
            }

            let fields = split_fields(line, self.config.delimiter);
            let record = self.codec.decode(fields.as_slice());

            aggregator.observe(
                &record.subdivision,
                Observation::new(&record.code, record.latitude, record.longitude),
            );
            listing.write_record(&record)?;
            if let Some(exporter) = exporter.as_deref_mut() {
                exporter.write_record(&record)?;
            }

            stats.records_processed += 1;
            if stats.records_processed % PROGRESS_UPDATE_INTERVAL == 0 {
                progress.set_position(stats.records_processed as u64);
            }
        }

        progress.finish_and_clear();
        debug!(
            "Ingested {} records from {} lines ({} blank)",
            stats.records_processed, stats.lines_read, stats.blank_lines
        );

        Ok(aggregator)
    }

    fn create_progress_bar(&self) -> ProgressBar {
        let progress = ProgressBar::new_spinner();
        if !self.config.show_progress {
            progress.set_draw_target(ProgressDrawTarget::hidden());
            return progress;
        }

        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} records ({per_sec})")
        {
            progress.set_style(style);
        }
        progress.enable_steady_tick(std::time::Duration::from_millis(100));
        progress
    }
}
