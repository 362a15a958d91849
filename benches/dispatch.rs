//! Parse + dispatch benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kumo_vt::{Parser, Performer, Terminal};

fn run(term: &mut Terminal, parser: &mut Parser, bytes: &[u8]) {
    let mut performer = Performer::new(term);
    parser.feed_with(bytes, |action| {
        let _ = performer.perform(action);
    });
}

fn bench_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let input = "The quick brown fox jumps over the lazy dog. ".repeat(500);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24);
            let mut parser = Parser::new();
            run(&mut term, &mut parser, black_box(input.as_bytes()));
            black_box(term.cursor().col)
        })
    });

    group.finish();
}

fn bench_styled_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let input = "\x1b[1;31mERROR\x1b[0m something broke \x1b[38;2;10;20;30mdetail\x1b[0m\r\n"
        .repeat(200);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("styled_output", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24);
            let mut parser = Parser::new();
            run(&mut term, &mut parser, black_box(input.as_bytes()));
            black_box(term.screen().styles().len())
        })
    });

    group.finish();
}

fn bench_cursor_and_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let input = "\x1b[5;10H\x1b[2Kredraw\x1b[1A\x1b[10D\x1b[J".repeat(300);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("cursor_and_erase", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24);
            let mut parser = Parser::new();
            run(&mut term, &mut parser, black_box(input.as_bytes()));
            black_box(term.cursor().row)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_plain_text,
    bench_styled_output,
    bench_cursor_and_erase
);
criterion_main!(benches);
