//! Translation throughput on small and large trees, for both expression
//! rendering and whole source files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use readex_core::build::*;
use readex_core::members::{MethodInfo, ParameterInfo};
use readex_core::{ExprRef, TypeRef};
use readex_translate::{to_source_code, translate, TranslationSettings};

// ---------------------------------------------------------------------------
// Benchmark trees
// ---------------------------------------------------------------------------

fn simple_tree() -> ExprRef {
    let x = parameter(TypeRef::int(), "x");
    let y = parameter(TypeRef::int(), "y");
    lambda(vec![x.clone(), y.clone()], add(multiply(x.expr(), int(2)), y.expr()))
}

/// A statement body with `width` branches, each declaring and printing a
/// variable.
fn branching_tree(width: usize) -> ExprRef {
    let console = TypeRef::class("System", "Console");
    let write_line = MethodInfo::new(console, "WriteLine", TypeRef::void())
        .with_parameters(vec![ParameterInfo::new("value", TypeRef::int())])
        .static_method();
    let flag = parameter(TypeRef::int(), "flag");
    let variables: Vec<_> = (0..width)
        .map(|i| parameter(TypeRef::int(), &format!("value{i}")))
        .collect();
    let statements = variables
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if_then(
                equal(flag.expr(), int(i as i64)),
                block(
                    vec![],
                    vec![
                        assign(v.expr(), multiply(flag.expr(), int(i as i64))),
                        call_static(write_line.clone(), vec![v.expr()]),
                    ],
                ),
            )
        })
        .collect();
    lambda(vec![flag], block(variables, statements))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_translate(c: &mut Criterion) {
    let settings = TranslationSettings::default();
    let simple = simple_tree();
    let wide = branching_tree(50);

    c.bench_function("translate_simple_lambda", |b| {
        b.iter(|| translate(black_box(&simple), &settings))
    });
    c.bench_function("translate_fifty_branches", |b| {
        b.iter(|| translate(black_box(&wide), &settings))
    });
}

fn bench_source(c: &mut Criterion) {
    let settings = TranslationSettings::default();
    let wide = branching_tree(50);

    c.bench_function("source_fifty_branches", |b| {
        b.iter(|| to_source_code(black_box(&wide), &settings))
    });
}

criterion_group!(benches, bench_translate, bench_source);
criterion_main!(benches);
