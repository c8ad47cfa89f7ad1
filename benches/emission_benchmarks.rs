//! Benchmarks for the scope emission path.
//!
//! Covers the operations a generator hits for every node it visits:
//! - Straight-line emission and register traffic
//! - Symbol and literal interning
//! - Loops with break exits and backpatching
//! - Finishing a wide tree and sizing it
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- tree
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rite::prelude::*;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

fn emit_straight_line(scope: &mut Scope, statements: usize) {
    for i in 0..statements {
        scope.push().unwrap();
        scope.push_op_u16(0x03, (i % 256) as u16).unwrap();
        scope.push().unwrap();
        scope.push_code(0x3b).unwrap();
        scope.pop_n(2).unwrap();
    }
}

fn emit_loop(scope: &mut Scope, breaks: usize) {
    scope.push_break_stack().unwrap();
    let head = scope.position();
    for _ in 0..breaks {
        scope.push_code(0x27).unwrap();
        let label = scope.reserve_jmp_label().unwrap();
        scope.add_break_exit(label).unwrap();
        scope.push_n_code(&[0x01, 0x02, 0x03]).unwrap();
    }
    scope.push_code(0x25).unwrap();
    let back = scope.reserve_jmp_label().unwrap();
    scope.backpatch_jmp_label(back, head).unwrap();
    scope.pop_break_stack().unwrap();
}

fn emission_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("emission");

    for statements in [100usize, 1_000, 5_000] {
        group.throughput(Throughput::Elements(statements as u64));
        group.bench_with_input(
            BenchmarkId::new("straight_line", statements),
            &statements,
            |b, &n| {
                b.iter(|| {
                    let mut tree = ScopeTree::new();
                    let root = tree.create(None, true).unwrap();
                    emit_straight_line(tree.scope_mut(root).unwrap(), black_box(n));
                    tree.finish(root).unwrap();
                    end_profiling_frame();
                    black_box(tree.container_size(root).unwrap())
                });
            },
        );
    }

    group.bench_function("loop_with_breaks", |b| {
        b.iter(|| {
            let mut tree = ScopeTree::new();
            let root = tree.create(None, true).unwrap();
            let scope = tree.scope_mut(root).unwrap();
            for _ in 0..50 {
                emit_loop(scope, black_box(8));
            }
            tree.finish(root).unwrap();
            end_profiling_frame();
            black_box(tree.scope(root).unwrap().position())
        });
    });

    group.finish();
}

fn interning_benchmarks(c: &mut Criterion) {
    let names: Vec<String> = (0..64).map(|i| format!("method_{i}")).collect();
    let values: Vec<String> = (0..64).map(|i| (i * 1_000).to_string()).collect();

    c.bench_function("intern_repeated", |b| {
        b.iter(|| {
            let mut tree = ScopeTree::new();
            let root = tree.create(None, true).unwrap();
            let scope = tree.scope_mut(root).unwrap();
            for _ in 0..16 {
                for (name, value) in names.iter().zip(&values) {
                    black_box(scope.new_sym(name).unwrap());
                    black_box(scope.new_lit(value, LiteralType::Int32).unwrap());
                    black_box(scope.new_lit(name, LiteralType::SString).unwrap());
                }
            }
            black_box(scope.symbols().len())
        });
    });
}

fn tree_benchmarks(c: &mut Criterion) {
    c.bench_function("tree_finish_and_size", |b| {
        b.iter(|| {
            let mut tree = ScopeTree::new();
            let root = tree.create(None, true).unwrap();
            for m in 0..32 {
                let method = tree.create(Some(root), true).unwrap();
                let block = tree.create(Some(method), false).unwrap();
                for id in [block, method] {
                    let scope = tree.scope_mut(id).unwrap();
                    scope.new_lvar("x", RegisterRequest::Next).unwrap();
                    scope.new_sym(&format!("m{m}")).unwrap();
                    emit_straight_line(scope, 20);
                    tree.finish(id).unwrap();
                }
            }
            tree.finish(root).unwrap();
            end_profiling_frame();
            black_box(tree.container_size(root).unwrap())
        });
    });
}

criterion_group!(
    benches,
    emission_benchmarks,
    interning_benchmarks,
    tree_benchmarks
);

criterion_main!(benches);
