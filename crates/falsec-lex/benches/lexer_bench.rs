//! Lexer throughput benchmark. Run with `cargo bench --package falsec-lex`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use falsec_lex::Lexer;

fn token_count(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    while lexer.next_token().unwrap().is_some() {
        count += 1;
    }
    count
}

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let small = "1 2 + .";
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("small_program", |b| b.iter(|| token_count(black_box(small))));

    let countdown = "1 [ $ 0 > ] [ $ . 1 - ] # %".repeat(50);
    group.throughput(Throughput::Bytes(countdown.len() as u64));
    group.bench_function("repeated_loop", |b| b.iter(|| token_count(black_box(&countdown))));

    group.finish();
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
