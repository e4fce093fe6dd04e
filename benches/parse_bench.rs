// Criterion benchmark suite: parsing and normalization
//
// Run: cargo bench
// Specific group: cargo bench -- factor
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ferroni_syntax::regexp::Regexp;
use ferroni_syntax::regparse::parse;
use ferroni_syntax::regsyntax::Flags;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_ok(pattern: &str, flags: Flags) -> Regexp {
    parse(pattern, flags).expect("parse failed")
}

fn word_list(n: usize) -> String {
    (0..n)
        .map(|i| format!("pre{:03}fix{}", i % 97, i))
        .collect::<Vec<_>>()
        .join("|")
}

// ---------------------------------------------------------------------------
// 1. parse -- typical patterns
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let patterns: &[(&str, &str)] = &[
        ("literal", "hello world"),
        ("dot_star", "foo.*bar"),
        ("alternation", "alpha|beta|gamma|delta"),
        ("char_class", "[a-zA-Z0-9_]+"),
        ("quantifier", "a{2,5}b+c?d*"),
        ("group", "(abc)+(def)*"),
        ("named_capture", r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})"),
        ("quoted", r"\Q[a-z]+(foo|bar)\E"),
    ];

    let mut group = c.benchmark_group("parse");
    for (name, pat) in patterns {
        group.bench_with_input(BenchmarkId::from_parameter(name), pat, |b, pat| {
            b.iter(|| black_box(parse_ok(black_box(pat), Flags::PERL)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. fold -- case-insensitive literals and classes
// ---------------------------------------------------------------------------

fn bench_fold(c: &mut Criterion) {
    let flags = Flags::PERL | Flags::FOLD_CASE;
    let mut group = c.benchmark_group("fold");
    group.bench_function("literal", |b| {
        b.iter(|| black_box(parse_ok(black_box("the quick brown fox"), flags)));
    });
    group.bench_function("class", |b| {
        b.iter(|| black_box(parse_ok(black_box(r"[a-z\x{100}-\x{17f}]+\w"), flags)));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. factor -- alternations with shared prefixes
// ---------------------------------------------------------------------------

fn bench_factor(c: &mut Criterion) {
    let mut group = c.benchmark_group("factor");
    for n in [10, 100, 1000] {
        let pattern = word_list(n);
        group.bench_with_input(BenchmarkId::new("words", n), &pattern, |b, pat| {
            b.iter(|| black_box(parse_ok(black_box(pat), Flags::PERL)));
        });
    }
    group.bench_function("pieces", |b| {
        let pattern = (0..50)
            .map(|i| format!(r"[0-9]{{3}}-{}", i))
            .collect::<Vec<_>>()
            .join("|");
        b.iter(|| black_box(parse_ok(black_box(&pattern), Flags::PERL)));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. simplify -- counted repetition rewriting
// ---------------------------------------------------------------------------

fn bench_simplify(c: &mut Criterion) {
    let re = parse_ok(r"(?:a{2,10}b{3,}){5}[a-z]{0,20}", Flags::PERL);
    c.bench_function("simplify", |b| {
        b.iter(|| black_box(black_box(&re).simplify()));
    });
}

criterion_group!(benches, bench_parse, bench_fold, bench_factor, bench_simplify);
criterion_main!(benches);
