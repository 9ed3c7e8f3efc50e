use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kdgu_text::normalize::{self, NormalForm};
use kdgu_text::property::PropertyDb;

fn sample_cps() -> Vec<u32> {
    // A mix of precomposed Latin-1 and combining-mark sequences, repeated
    // to give normalization something to chew on.
    let mut out = Vec::new();
    for _ in 0..256 {
        out.extend_from_slice(&[0x00E9, 0x0065, 0x0301, 0x00E5, 0x0041, 0x030A]);
    }
    out
}

fn bench_normalize(c: &mut Criterion) {
    let db = PropertyDb::builtin();
    let cps = sample_cps();

    c.bench_function("normalize_nfc", |b| {
        b.iter(|| normalize::normalize(black_box(&db), black_box(&cps), NormalForm::Nfc))
    });

    c.bench_function("normalize_nfd", |b| {
        b.iter(|| normalize::normalize(black_box(&db), black_box(&cps), NormalForm::Nfd))
    });
}

fn bench_stream_safe(c: &mut Criterion) {
    let db = PropertyDb::builtin();
    let mut cps = vec![0x0061u32];
    cps.extend(std::iter::repeat(0x0300u32).take(200));

    c.bench_function("make_stream_safe", |b| {
        b.iter(|| normalize::make_stream_safe(black_box(&db), black_box(&cps)))
    });
}

criterion_group!(benches, bench_normalize, bench_stream_safe);
criterion_main!(benches);
