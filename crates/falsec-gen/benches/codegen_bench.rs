//! Code generation throughput benchmark. Run with `cargo bench --package falsec-gen`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use falsec_par::Parser;

fn compile(source: &str) -> usize {
    let ast = Parser::new(source).unwrap().parse_program().unwrap();
    falsec_gen::compile(&ast).unwrap().len()
}

fn bench_codegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("codegen");

    let small = "1 2 + .";
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("small_program", |b| b.iter(|| compile(black_box(small))));

    let countdown = "1 [ $ 0 > ] [ $ . 1 - ] # %";
    group.throughput(Throughput::Bytes(countdown.len() as u64));
    group.bench_function("countdown_loop", |b| b.iter(|| compile(black_box(countdown))));

    group.finish();
}

criterion_group!(benches, bench_codegen);
criterion_main!(benches);
