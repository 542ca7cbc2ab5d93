//! Codec and locator benchmark suite.
//!
//! Benchmarks the hot paths every lookup goes through:
//! - Element reference decoding (single and list, mixed dialects)
//! - Locator rewriting and CSS escaping
//! - Script argument encoding
//!
//! Run with: cargo bench --bench codec
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

use remote_webdriver::protocol::reference;
use remote_webdriver::protocol::{LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY};
use remote_webdriver::{By, Dialect, ElementId, ScriptArg, css_escape, encode_args};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const LIST_SIZES: &[usize] = &[10, 100, 1000];

// ============================================================================
// Helpers
// ============================================================================

fn reference_list(size: usize) -> Value {
    Value::Array(
        (0..size)
            .map(|i| match i % 3 {
                0 => json!({ W3C_ELEMENT_KEY: format!("w3c-{i}") }),
                1 => json!({ LEGACY_ELEMENT_KEY: format!("legacy-{i}") }),
                _ => json!(format!("bare-{i}")),
            })
            .collect(),
    )
}

// ============================================================================
// Benchmark: Reference Decoding
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let single = json!({ W3C_ELEMENT_KEY: "abc", LEGACY_ELEMENT_KEY: "abc" });
    group.bench_function("one", |b| {
        b.iter(|| reference::decode_one(black_box(&single)));
    });

    for &size in LIST_SIZES {
        let list = reference_list(size);
        group.bench_with_input(BenchmarkId::new("many", size), &list, |b, list| {
            b.iter(|| reference::decode_many(black_box(list)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Locator Rewriting
// ============================================================================

fn bench_locators(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator");

    let cases = [
        ("id", By::id("main-content")),
        ("id_escaped", By::id("3rd.item:last")),
        ("class", By::class_name("btn-primary")),
        ("name", By::name("email")),
        ("xpath", By::xpath("//div[@id='x']")),
    ];

    for (label, by) in &cases {
        group.bench_with_input(BenchmarkId::new("w3c", label), by, |b, by| {
            b.iter(|| black_box(by).to_wire(Dialect::W3c));
        });
    }

    group.bench_function("css_escape", |b| {
        b.iter(|| css_escape(black_box("9lives#[data-x='y']")));
    });

    group.finish();
}

// ============================================================================
// Benchmark: Script Arguments
// ============================================================================

fn bench_script_args(c: &mut Criterion) {
    let mut group = c.benchmark_group("script_args");

    for &size in LIST_SIZES {
        let args: Vec<ScriptArg> = (0..size)
            .map(|i| match i % 3 {
                0 => ScriptArg::from(ElementId::new(format!("e-{i}"))),
                1 => ScriptArg::from(i),
                _ => ScriptArg::from(format!("s-{i}")),
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("encode", size), &args, |b, args| {
            b.iter(|| encode_args(Some(black_box(args.as_slice()))));
        });
    }

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_decode, bench_locators, bench_script_args);
criterion_main!(benches);
