use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use postal_extremes::processor::writer::{ListingWriter, RecordExporter};
use postal_extremes::{
    ExtremesConfig, ExtremesProcessor, ProcessingStats, RecordCodec, ReportFormat,
};
use std::hint::black_box;
use std::io::{Cursor, sink};

const REGIONS: [&str; 8] = ["AK", "CA", "FL", "ME", "MN", "NY", "TX", "WA"];

fn synthetic_dataset(rows: usize) -> String {
    let mut data = String::from("zip,place,state,county,latitude,longitude\n");
    for i in 0..rows {
        let latitude = 25.0 + (i % 2_300) as f64 * 0.01;
        let longitude = -125.0 + (i % 5_700) as f64 * 0.01;
        data.push_str(&format!(
            "{:05},Place {},{},County {},{:.4},{:.4}\n",
            i % 100_000,
            i,
            REGIONS[i % REGIONS.len()],
            i % 40,
            latitude,
            longitude
        ));
    }
    data
}

fn ingestion(c: &mut Criterion) {
    const ROWS: usize = 100_000;
    let data = synthetic_dataset(ROWS);
    let processor = ExtremesProcessor::new(ExtremesConfig::default().without_progress()).unwrap();

    let mut group = c.benchmark_group("Ingestion");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("csv_listing", |b| {
        b.iter(|| {
            let mut listing = ListingWriter::new(sink(), ReportFormat::Csv, ',').unwrap();
            let mut stats = ProcessingStats::default();
            let aggregator = processor
                .ingest(
                    Cursor::new(data.as_bytes()),
                    &mut listing,
                    None::<&mut RecordExporter<std::io::Sink>>,
                    &mut stats,
                )
                .unwrap();
            black_box(aggregator.len());
        })
    });

    group.bench_function("table_listing_with_export", |b| {
        b.iter(|| {
            let mut listing = ListingWriter::new(sink(), ReportFormat::Table, ',').unwrap();
            let mut exporter = RecordExporter::new(sink()).unwrap();
            let mut stats = ProcessingStats::default();
            let aggregator = processor
                .ingest(
                    Cursor::new(data.as_bytes()),
                    &mut listing,
                    Some(&mut exporter),
                    &mut stats,
                )
                .unwrap();
            black_box(aggregator.len());
        })
    });

    group.finish();
}

fn decoding(c: &mut Criterion) {
    let codec = RecordCodec::new();
    let fields = ["10001", "New York", "NY", "New York", "40.7128", "-74.0060"];

    c.bench_function("decode_record", |b| {
        b.iter(|| black_box(codec.decode(black_box(&fields))))
    });
}

criterion_group!(benches, ingestion, decoding);
criterion_main!(benches);
