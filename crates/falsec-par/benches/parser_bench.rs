//! Parser throughput benchmark. Run with `cargo bench --package falsec-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use falsec_par::Parser;

fn node_count(source: &str) -> usize {
    fn count(nodes: &[falsec_par::AstNode]) -> usize {
        nodes
            .iter()
            .map(|n| match n {
                falsec_par::AstNode::Quote(body) => 1 + count(body),
                _ => 1,
            })
            .sum()
    }
    let ast = Parser::new(source).unwrap().parse_program().unwrap();
    count(&ast)
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let small = "1 2 + .";
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("small_program", |b| b.iter(|| node_count(black_box(small))));

    let countdown = "1 [ $ 0 > ] [ $ . 1 - ] # %".repeat(50);
    group.throughput(Throughput::Bytes(countdown.len() as u64));
    group.bench_function("repeated_loop", |b| b.iter(|| node_count(black_box(&countdown))));

    group.finish();
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
