//! Benchmarks for assembly and solve

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fem_engine::prelude::*;

fn run(config: &AnalysisConfig) {
    let analysis = config.run().unwrap();
    black_box(&analysis);
}

fn benchmark_bar(c: &mut Criterion) {
    let config = AnalysisConfig::axial_bar(50).unwrap();
    c.bench_function("axial_bar_50", |b| b.iter(|| run(&config)));
}

fn benchmark_cst(c: &mut Criterion) {
    let small = AnalysisConfig::cst(4, 4).unwrap();
    let medium = AnalysisConfig::cst(12, 12).unwrap();
    c.bench_function("cst_4x4", |b| b.iter(|| run(&small)));
    c.bench_function("cst_12x12", |b| b.iter(|| run(&medium)));
}

fn benchmark_quad(c: &mut Criterion) {
    let small = AnalysisConfig::quad(4, 2).unwrap();
    let medium = AnalysisConfig::quad(16, 8).unwrap();
    c.bench_function("quad_4x2", |b| b.iter(|| run(&small)));
    c.bench_function("quad_16x8", |b| b.iter(|| run(&medium)));
}

fn benchmark_hex(c: &mut Criterion) {
    let small = AnalysisConfig::hex(2, 2, 2).unwrap();
    let medium = AnalysisConfig::hex(4, 4, 4).unwrap();
    let parallel = medium
        .clone()
        .with_options(AnalysisOptions::default().with_parallel(true));
    c.bench_function("hex_2x2x2", |b| b.iter(|| run(&small)));
    c.bench_function("hex_4x4x4", |b| b.iter(|| run(&medium)));
    c.bench_function("hex_4x4x4_parallel", |b| b.iter(|| run(&parallel)));
}

criterion_group!(
    benches,
    benchmark_bar,
    benchmark_cst,
    benchmark_quad,
    benchmark_hex,
);

criterion_main!(benches);
