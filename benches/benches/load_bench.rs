//! # Loader Benchmarks
//!
//! Measures the two-pass loader on programs of growing size.
//!
//! Run: `cargo bench --bench load_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use fryer_core::vm::{assemble, assembler::tokenize, Vm, VmConfig};

/// Programa sintético com `blocks` blocos rotulados
fn synthetic_source(blocks: usize) -> String {
    let mut source = String::from("SDEF 1 \"pronto\"\n");
    for i in 0..blocks {
        source.push_str(&format!(
            "block{i}:\n    SET R0 {i}        ; contador\n    SET R1, 3\n    ADD R0, R1\n    PUSH R0\n    POP R2\n    JZ R2 block{i}\n"
        ));
    }
    source.push_str("SPRINT 1\nHALT\n");
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    group.bench_function("binary_with_commas", |b| {
        b.iter(|| black_box(tokenize(black_box("ADD R0, R1"))))
    });

    group.bench_function("branch_with_spaces", |b| {
        b.iter(|| black_box(tokenize(black_box("DECJZ   TIME    loop_end"))))
    });

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");

    for blocks in [10usize, 100, 1000] {
        let source = synthetic_source(blocks);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("blocks", blocks),
            &source,
            |b, s| {
                b.iter(|| black_box(assemble(s).unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_vm_load(c: &mut Criterion) {
    let source = synthetic_source(100);
    let mut vm = Vm::new(VmConfig::default());

    c.bench_function("vm_load_100_blocks", |b| {
        b.iter(|| {
            vm.load(black_box(&source)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_assemble,
    bench_vm_load,
);
criterion_main!(benches);
