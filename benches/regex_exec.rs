use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kdgu_text::Regex;

fn bench_literal_scan(c: &mut Criterion) {
    let re = Regex::compile("needle", Regex::UNANCHORED).unwrap();
    let haystack = "hay ".repeat(512) + "needle";

    c.bench_function("literal_unanchored_scan", |b| {
        b.iter(|| re.find(black_box(&haystack)).unwrap())
    });
}

fn bench_global_word_match(c: &mut Criterion) {
    let re = Regex::compile(r"\w+", Regex::GLOBAL).unwrap();
    let text = "the quick brown fox jumps over the lazy dog ".repeat(128);

    c.bench_function("global_word_match", |b| {
        b.iter(|| re.exec(black_box(&text)).unwrap())
    });
}

fn bench_backtracking_quantifier(c: &mut Criterion) {
    let re = Regex::compile(r"(a+)+b", Regex::UNANCHORED).unwrap();
    let text = "a".repeat(24) + "c";

    c.bench_function("guarded_nested_quantifier", |b| {
        b.iter(|| re.find(black_box(&text)).unwrap())
    });
}

criterion_group!(benches, bench_literal_scan, bench_global_word_match, bench_backtracking_quantifier);
criterion_main!(benches);
