#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use qitnotation::NotationFeature;
use qitnotation_core::{invocation::Mode, testing::lex};
use std::hint::black_box;

fn bench_delimited_macros(c: &mut Criterion) {
    let feature = NotationFeature::new().unwrap();
    let mut group = c.benchmark_group("delimited_macros");

    let cases = [
        ("abs", "plain", "{x}"),
        ("braket", "plain", r"{\psi}{\phi}"),
        ("braket", "backtick", r"`\big{\psi}{\phi}"),
        ("braket", "star", r"*{\psi}{\phi}"),
        ("matrixel", "bracket", r"[\Big]{\psi}{A}{\phi}"),
    ];

    for (name, form, source) in cases {
        let tokens = lex(source);
        group.bench_with_input(
            BenchmarkId::new(name, form),
            &tokens,
            |b, tokens| {
                b.iter(|| {
                    let mut tokens = tokens.clone();
                    feature
                        .invoke_macro(black_box(name), &mut tokens, Mode::Math)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_sized_group(c: &mut Criterion) {
    let feature = NotationFeature::new().unwrap();
    let tokens = lex(r"\bigg<\psi>");
    c.bench_function("sized_group", |b| {
        b.iter(|| {
            let mut tokens = tokens.clone();
            feature
                .invoke_specials(black_box("`"), &mut tokens, Mode::Math)
                .unwrap()
        });
    });
}

fn bench_registry(c: &mut Criterion) {
    c.bench_function("builtin_registry", |b| {
        b.iter(|| NotationFeature::new().unwrap());
    });
}

criterion_group!(
    benches,
    bench_delimited_macros,
    bench_sized_group,
    bench_registry
);
criterion_main!(benches);
