//! Performance benchmarks for ferro-varnorm
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- trimming

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_varnorm::batch::BatchProcessor;
use ferro_varnorm::normalize::trim;
use ferro_varnorm::{
    GlobalAligner, NormalizerConfig, PairwiseAligner, StudyEntry, Variant, VariantNormalizer,
};

// =============================================================================
// Trimming benchmarks
// =============================================================================

/// Benchmark allele trimming for different variant shapes
fn bench_trimming(c: &mut Criterion) {
    let long_reference = "ACGT".repeat(25);
    let long_deletion = format!("A{}", &long_reference[50..]);
    let cases = vec![
        ("snv", "A", "G"),
        ("deletion", "CAG", "CG"),
        ("insertion", "C", "CTTT"),
        ("mnv", "ACGT", "AGCT"),
        ("long_deletion", long_reference.as_str(), long_deletion.as_str()),
    ];

    let mut group = c.benchmark_group("trimming");

    for (name, reference, alternate) in &cases {
        group.bench_with_input(
            BenchmarkId::new("shape", name),
            &(reference, alternate),
            |b, (r, a)| b.iter(|| trim(black_box(100), black_box(r), black_box(a), 0)),
        );
    }

    group.finish();
}

// =============================================================================
// Alignment benchmarks
// =============================================================================

/// Benchmark the global aligner used by MNV decomposition
fn bench_alignment(c: &mut Criterion) {
    let aligner = GlobalAligner::default();
    let mut group = c.benchmark_group("alignment");

    for length in [4usize, 16, 64] {
        let reference = "ACGT".repeat(length / 4);
        let alternate = reference.replace("CG", "GC");
        group.bench_with_input(
            BenchmarkId::new("length", length),
            &(reference, alternate),
            |b, (r, a)| b.iter(|| aligner.align(black_box(r), black_box(a))),
        );
    }

    group.finish();
}

// =============================================================================
// Normalization benchmarks
// =============================================================================

fn multiallelic_with_samples(samples: usize) -> Variant {
    let mut study = StudyEntry::new("S1")
        .with_format(["GT", "PL"])
        .with_secondary_alternates(["G", "AT"]);
    for i in 0..samples {
        study = study.with_sample(format!("S{}", i), ["1/2", "0,10,20,30,40,50,60,70,80,90"]);
    }
    Variant::new("1", 100, 100, "A", "C").with_study(study)
}

/// Benchmark full variant normalization under each configuration
fn bench_normalization(c: &mut Criterion) {
    let configs = vec![
        ("default", NormalizerConfig::default()),
        (
            "decompose",
            NormalizerConfig::default().with_mnv_decomposition(true),
        ),
        (
            "reference_blocks",
            NormalizerConfig::default().with_reference_blocks(true),
        ),
    ];
    let variants = vec![
        Variant::new("1", 100, 102, "CAG", "CG"),
        Variant::new("1", 10, 13, "ATCG", "GTAC"),
        multiallelic_with_samples(10),
    ];

    let mut group = c.benchmark_group("normalization");

    for (name, config) in configs {
        let normalizer = VariantNormalizer::new(config);
        group.bench_function(name, |b| {
            b.iter(|| normalizer.normalize(black_box(variants.clone())))
        });
    }

    group.finish();
}

/// Benchmark sample remapping as the sample count grows
fn bench_samples(c: &mut Criterion) {
    let normalizer = VariantNormalizer::new(NormalizerConfig::default());
    let mut group = c.benchmark_group("samples");

    for samples in [1usize, 100, 1000] {
        let variant = multiallelic_with_samples(samples);
        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(BenchmarkId::new("count", samples), &variant, |b, v| {
            b.iter(|| normalizer.normalize_variant(black_box(v.clone())))
        });
    }

    group.finish();
}

// =============================================================================
// Batch throughput
// =============================================================================

fn batch(size: u64) -> Vec<Variant> {
    (1..=size)
        .map(|i| Variant::new("1", i * 10, i * 10 + 2, "CAG", "CTG"))
        .collect()
}

/// Benchmark sequential batch processing
fn bench_batch_throughput(c: &mut Criterion) {
    let processor = BatchProcessor::new(NormalizerConfig::default());
    let variants = batch(1000);

    let mut group = c.benchmark_group("throughput");
    group.throughput(Throughput::Elements(variants.len() as u64));
    group.bench_function("sequential", |b| {
        b.iter(|| processor.normalize(black_box(variants.clone())))
    });

    #[cfg(feature = "parallel")]
    {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        group.bench_function("parallel", |b| {
            b.iter(|| {
                ferro_varnorm::parallel::normalize_parallel(&normalizer, black_box(variants.clone()))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_trimming,
    bench_alignment,
    bench_normalization,
    bench_samples,
    bench_batch_throughput,
);

criterion_main!(benches);
