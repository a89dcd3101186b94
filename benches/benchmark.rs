use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use kopeck::interface::extract_parallel;
use kopeck::Extractor;

const TEXT: &str = "По договору поставки покупатель перечисляет 1 250 000 (один миллион двести \
пятьдесят тысяч) рублей 50 копеек, а также $120 млн. в виде аванса. Остаток в размере \
3,5 млрд руб. и 10 000 канадских долларов выплачивается до конца года; штраф составляет 15 евро.";

fn bench_extract(c: &mut Criterion) {
    let extractor = Extractor::builtin().unwrap();
    c.bench_function("extract_paragraph", |b| {
        b.iter(|| black_box(extractor.extract(black_box(TEXT)).unwrap()))
    });
}

fn bench_batch(c: &mut Criterion) {
    let extractor = Extractor::builtin().unwrap();
    let texts: Vec<String> = (0..256).map(|n| format!("{TEXT} Счёт №{n}.")).collect();
    c.bench_function("extract_parallel_256", |b| {
        b.iter(|| black_box(extract_parallel(&extractor, texts.as_slice(), 4)))
    });
}

criterion_group!(benches, bench_extract, bench_batch);
criterion_main!(benches);
