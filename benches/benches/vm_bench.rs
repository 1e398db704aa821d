//! # VM Benchmarks
//!
//! Measures execution throughput: countdown loops, arithmetic mixes and
//! single-step overhead.
//!
//! Run: `cargo bench --bench vm_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use fryer_core::vm::{assemble, Program, Vm, VmConfig};

const COUNTDOWN: &str = "loop:\nDECJZ R0 end\nGOTO loop\nend:\nHALT";

const ARITHMETIC: &str = r#"
    SET R1 7
    SET R2 3
loop:
    ADD R3, R1
    MUL R3, R2
    MOD R3, R1
    MULF R3, R2
    LT R3, R1
    PUSH R3
    POP R3
    DECJZ R0 end
    GOTO loop
end:
    HALT
"#;

/// Programa com o contador R0 pré-carregado
fn with_counter(source: &str, iterations: i64) -> Program {
    assemble(&format!("SET R0 {iterations}\n{source}")).unwrap()
}

fn config() -> VmConfig {
    VmConfig::default().with_max_steps(u64::MAX)
}

fn bench_countdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("countdown");

    for iterations in [100i64, 1_000, 10_000] {
        let program = with_counter(COUNTDOWN, iterations);
        group.throughput(Throughput::Elements(iterations as u64 * 2));
        group.bench_with_input(
            BenchmarkId::new("run", iterations),
            &program,
            |b, p| {
                let mut vm = Vm::new(config());
                b.iter(|| {
                    vm.load_program(p.clone());
                    black_box(vm.run().unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_arithmetic(c: &mut Criterion) {
    let program = with_counter(ARITHMETIC, 1_000);

    c.bench_function("arithmetic_mix_1000", |b| {
        let mut vm = Vm::new(config());
        b.iter(|| {
            vm.load_program(program.clone());
            black_box(vm.run().unwrap())
        })
    });
}

fn bench_single_step(c: &mut Criterion) {
    let program = assemble("loop:\nINC R0\nGOTO loop").unwrap();
    let mut vm = Vm::new(config());
    vm.load_program(program);

    c.bench_function("step", |b| {
        b.iter(|| black_box(vm.step().unwrap()))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut vm = Vm::new(config());
    vm.load("SET R0 1\nPUSH R0\nPUSH R0\nPUSH R0\nHALT").unwrap();
    vm.run().unwrap();

    c.bench_function("snapshot", |b| {
        b.iter(|| black_box(vm.snapshot()))
    });

    c.bench_function("snapshot_json", |b| {
        b.iter(|| black_box(vm.snapshot().to_json().unwrap()))
    });
}

criterion_group!(
    benches,
    bench_countdown,
    bench_arithmetic,
    bench_single_step,
    bench_snapshot,
);
criterion_main!(benches);
