//! Report writing for postal extremes
//!
//! Produces the region extremes table, the flat listing and the optional
//! fixed-width record export. Table rows are laid out through a
//! [`FieldBuffer`] so every column keeps its declared width.

use crate::aggregator::ExtremeRecord;
use crate::codec::{RecordCodec, fit_coordinate, format_coordinate};
use crate::constants::{
    EXTREMES_COLUMN_WIDTHS, EXTREMES_HEADERS, LISTING_COLUMN_WIDTHS, LISTING_HEADERS,
    SEPARATOR_CHAR, VALUE_COLUMN_WIDTH,
};
use crate::error::{PostalError, Result};
use crate::field_buffer::FieldBuffer;
use crate::models::{DecodedRecord, ReportFormat};

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Open a buffered output sink: a created file, or stdout when no path is given
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    };

    let output_create = |source| PostalError::OutputCreate {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_create)?;
    }

    let file = File::create(path).map_err(output_create)?;
    debug!("Created output file: {}", path.display());
    Ok(Box::new(BufWriter::new(file)))
}

/// Writes header and rows in one of the report formats
#[derive(Debug)]
struct RowLayout {
    format: ReportFormat,
    delimiter: char,
    columns: FieldBuffer,
}

impl RowLayout {
    fn new(widths: &[usize], format: ReportFormat, delimiter: char) -> Result<Self> {
        Ok(Self {
            format,
            delimiter,
            columns: FieldBuffer::from_sizes(widths)?,
        })
    }

    fn write_row<W: Write>(&mut self, sink: &mut W, values: &[&str]) -> Result<()> {
        match self.format {
            ReportFormat::Table => {
                self.columns.clear();
                for value in values {
                    self.columns.pack(value)?;
                }
                self.columns.write_to(sink)?;
            }
            ReportFormat::Csv => {
                let mut encoded = [0u8; 4];
                let separator: &str = self.delimiter.encode_utf8(&mut encoded);
                writeln!(sink, "{}", values.join(separator))?;
            }
        }
        Ok(())
    }

    fn write_header<W: Write>(&mut self, sink: &mut W, headers: &[&str]) -> Result<()> {
        self.write_row(sink, headers)?;
        if self.format == ReportFormat::Table {
            let separator: String = std::iter::repeat_n(SEPARATOR_CHAR, self.columns.capacity())
                .collect();
            writeln!(sink, "{}", separator)?;
        }
        Ok(())
    }
}

/// Write the extremes table, one row per key in key order.
///
/// Returns the number of data rows written.
pub fn write_extremes<'a, W, I>(
    sink: &mut W,
    results: I,
    format: ReportFormat,
    delimiter: char,
) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a String, &'a ExtremeRecord)>,
{
    let mut layout = RowLayout::new(&EXTREMES_COLUMN_WIDTHS, format, delimiter)?;
    layout.write_header(sink, &EXTREMES_HEADERS)?;

    let mut rows = 0;
    for (region, record) in results {
        layout.write_row(
            sink,
            &[
                region.as_str(),
                record.east.id.as_str(),
                record.west.id.as_str(),
                record.north.id.as_str(),
                record.south.id.as_str(),
            ],
        )?;
        rows += 1;
    }

    sink.flush()?;
    debug!("Wrote {} extremes rows", rows);
    Ok(rows)
}

/// Streams the flat listing in input order
pub struct ListingWriter<W: Write> {
    sink: W,
    layout: RowLayout,
    rows: usize,
}

impl<W: Write> ListingWriter<W> {
    /// Create the writer and emit the header
    pub fn new(mut sink: W, format: ReportFormat, delimiter: char) -> Result<Self> {
        let mut layout = RowLayout::new(&LISTING_COLUMN_WIDTHS, format, delimiter)?;
        layout.write_header(&mut sink, &LISTING_HEADERS)?;
        Ok(Self {
            sink,
            layout,
            rows: 0,
        })
    }

    /// Append one record as `region, id, latitude, longitude`.
    ///
    /// Coordinates carry four decimals. In the table layout a coordinate too
    /// wide for its column is written in scientific notation instead.
    pub fn write_record(&mut self, record: &DecodedRecord) -> Result<()> {
        let coordinate = |value| match self.layout.format {
            ReportFormat::Table => fit_coordinate(value, VALUE_COLUMN_WIDTH),
            ReportFormat::Csv => format_coordinate(value),
        };
        let latitude = coordinate(record.latitude);
        let longitude = coordinate(record.longitude);
        self.layout.write_row(
            &mut self.sink,
            &[
                record.subdivision.as_str(),
                record.code.as_str(),
                latitude.as_str(),
                longitude.as_str(),
            ],
        )?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the sink with the number of rows written
    pub fn finish(mut self) -> Result<(W, usize)> {
        self.sink.flush()?;
        debug!("Wrote {} listing rows", self.rows);
        Ok((self.sink, self.rows))
    }
}

/// Writes each normalized record as one fixed-width line
pub struct RecordExporter<W: Write> {
    sink: W,
    codec: RecordCodec,
    buffer: FieldBuffer,
    records: usize,
}

impl<W: Write> RecordExporter<W> {
    pub fn new(sink: W) -> Result<Self> {
        Ok(Self {
            sink,
            codec: RecordCodec::new(),
            buffer: RecordCodec::init_buffer()?,
            records: 0,
        })
    }

    pub fn write_record(&mut self, record: &DecodedRecord) -> Result<()> {
        self.codec.pack(record, &mut self.buffer)?;
        self.buffer.write_to(&mut self.sink)?;
        self.records += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(W, usize)> {
        self.sink.flush()?;
        debug!("Exported {} fixed-width records", self.records);
        Ok((self.sink, self.records))
    }
}

/// Read back a fixed-width export produced by [`RecordExporter`]
pub fn read_exported_records<R: io::BufRead>(reader: R) -> Result<Vec<DecodedRecord>> {
    let codec = RecordCodec::new();
    let mut buffer = RecordCodec::init_buffer()?;
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        buffer
            .load(line.as_bytes())
            .map_err(|e| PostalError::record(index + 1, e))?;
        let record = codec
            .unpack(&mut buffer)
            .map_err(|e| PostalError::record(index + 1, e))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{ExtremeAggregator, Observation};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn record(fields: &[&str]) -> DecodedRecord {
        RecordCodec::new().decode(fields)
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    #[test]
    fn test_extremes_table_layout() {
        let mut aggregator = ExtremeAggregator::new();
        aggregator.observe("NY", Observation::new("10001", 40.7128, -74.0060));
        aggregator.observe("CA", Observation::new("90001", 33.9731, -118.2437));

        let mut out = Vec::new();
        let rows = write_extremes(&mut out, aggregator.results(), ReportFormat::Table, ',')
            .unwrap();
        assert_eq!(rows, 2);

        let raw = String::from_utf8(out.clone()).unwrap();
        let first_line = raw.lines().next().unwrap();
        assert_eq!(first_line.len(), 68);
        assert!(first_line.starts_with("Region  Easternmost    "));

        let lines = lines(&out);
        assert_eq!(lines[1], "-".repeat(68));
        assert_eq!(
            lines[2],
            "CA      90001          90001          90001          90001"
        );
        assert!(lines[3].starts_with("NY      10001"));
    }

    #[test]
    fn test_extremes_csv_layout() {
        let mut aggregator = ExtremeAggregator::new();
        aggregator.observe("NY", Observation::new("10001", 40.7128, -74.0060));

        let mut out = Vec::new();
        write_extremes(&mut out, &aggregator, ReportFormat::Csv, ';').unwrap();

        assert_eq!(
            lines(&out),
            [
                "Region;Easternmost;Westernmost;Northernmost;Southernmost",
                "NY;10001;10001;10001;10001"
            ]
        );
    }

    #[test]
    fn test_empty_extremes_writes_only_header() {
        let aggregator = ExtremeAggregator::new();
        let mut out = Vec::new();
        let rows = write_extremes(&mut out, &aggregator, ReportFormat::Csv, ',').unwrap();

        assert_eq!(rows, 0);
        assert_eq!(lines(&out).len(), 1);
    }

    #[test]
    fn test_listing_rows_in_input_order() {
        let mut writer = ListingWriter::new(Vec::new(), ReportFormat::Csv, ',').unwrap();
        writer
            .write_record(&record(&["10001", "New York", "NY", "New York", "40.7128", "-74.0060"]))
            .unwrap();
        writer
            .write_record(&record(&["90001", "LA", "CA", "LA", "33.97", "-118.2437"]))
            .unwrap();
        assert_eq!(writer.rows(), 2);

        let (out, rows) = writer.finish().unwrap();
        assert_eq!(rows, 2);
        assert_eq!(
            lines(&out),
            [
                "Region,Code,Latitude,Longitude",
                "NY,10001,40.7128,-74.0060",
                "CA,90001,33.9700,-118.2437"
            ]
        );
    }

    #[test]
    fn test_listing_table_layout() {
        let mut writer = ListingWriter::new(Vec::new(), ReportFormat::Table, ',').unwrap();
        writer
            .write_record(&record(&["10001", "New York", "NY", "New York", "40.7128", "-74.0060"]))
            .unwrap();
        let (out, _) = writer.finish().unwrap();

        let lines = lines(&out);
        assert_eq!(lines[1], "-".repeat(53));
        assert_eq!(lines[2], "NY      10001          40.7128        -74.0060");
    }

    #[test]
    fn test_listing_table_keeps_wide_coordinates_readable() {
        let mut writer = ListingWriter::new(Vec::new(), ReportFormat::Table, ',').unwrap();
        writer
            .write_record(&record(&["00001", "Far", "ZZ", "Away", "1e99", "-74.0060"]))
            .unwrap();
        let (out, _) = writer.finish().unwrap();

        let lines = lines(&out);
        assert_eq!(lines[2], "ZZ      00001          1.0000e99      -74.0060");

        let mut writer = ListingWriter::new(Vec::new(), ReportFormat::Csv, ',').unwrap();
        writer
            .write_record(&record(&["00001", "Far", "ZZ", "Away", "1e20", "0"]))
            .unwrap();
        let (out, _) = writer.finish().unwrap();
        assert_eq!(
            self::lines(&out)[1],
            "ZZ,00001,100000000000000000000.0000,0.0000"
        );
    }

    #[test]
    fn test_export_round_trip() {
        let records = [
            record(&["10001", "New York", "NY", "New York", "40.7128", "-74.0060"]),
            record(&["90001", "Los Angeles", "CA", "Los Angeles", "33.9731", "-118.2437"]),
        ];

        let mut exporter = RecordExporter::new(Vec::new()).unwrap();
        for record in &records {
            exporter.write_record(record).unwrap();
        }
        let (out, count) = exporter.finish().unwrap();
        assert_eq!(count, 2);

        let raw = String::from_utf8(out.clone()).unwrap();
        assert!(raw.lines().all(|line| line.len() == 127));

        let restored = read_exported_records(Cursor::new(out)).unwrap();
        assert_eq!(restored, records);
    }

    #[test]
    fn test_read_export_rejects_over_long_line() {
        let line = "x".repeat(200);
        let err = read_exported_records(Cursor::new(line)).unwrap_err();
        assert!(matches!(err, PostalError::Record { line: 1, .. }));
    }

    #[test]
    fn test_open_sink_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("report.txt");

        let mut sink = open_sink(Some(&path)).unwrap();
        writeln!(sink, "hello").unwrap();
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_open_sink_reports_uncreatable_output() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as an output file
        let result = open_sink(Some(temp_dir.path()));
        assert!(matches!(result, Err(PostalError::OutputCreate { .. })));
    }
}
