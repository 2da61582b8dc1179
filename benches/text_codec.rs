use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use orso::dataset::{DataTable, OrsoDataset};
use orso::header::{empty_header, ColumnSpec};
use orso::ort::{decode_ort, encode_ort, OrtWriterConfig};
use orso::resolve::Value;

/// Generate a batch of synthetic reflectivity curves
fn generate_batch(num_datasets: usize, points: usize) -> Vec<OrsoDataset> {
    let columns = [
        ColumnSpec::with_unit("Qz", "1/angstrom"),
        ColumnSpec::new("R"),
        ColumnSpec::error_of("R"),
        ColumnSpec::error_of("Qz"),
    ];
    (0..num_datasets)
        .map(|n| {
            let mut header = empty_header(&columns).expect("header");
            header.set("data_set", Value::Int(n as i64)).expect("data_set");
            let qz: Vec<f64> = (0..points).map(|i| 0.005 + i as f64 * 1e-4).collect();
            let r: Vec<f64> = qz.iter().map(|q| (0.01 / q).powi(4).min(1.0)).collect();
            let dr: Vec<f64> = r.iter().map(|r| r * 0.03).collect();
            let dq: Vec<f64> = qz.iter().map(|q| q * 0.02).collect();
            let data = DataTable::from_columns(vec![qz, r, dr, dq]).expect("table");
            OrsoDataset::new(header, data).expect("dataset")
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ort_encode");
    let config = OrtWriterConfig::default();

    for points in [100, 1_000, 10_000] {
        let batch = generate_batch(4, points);
        group.throughput(Throughput::Elements((4 * points) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &batch, |b, batch| {
            b.iter(|| encode_ort(batch, &config).expect("encode"))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ort_decode");
    let config = OrtWriterConfig::default();

    for points in [100, 1_000, 10_000] {
        let (text, _) = encode_ort(&generate_batch(4, points), &config).expect("encode");
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &text, |b, text| {
            b.iter(|| decode_ort(text).expect("decode"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
