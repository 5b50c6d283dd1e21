use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use ucum::{analyse, convert_to_base_units, convert_unit_to, validate};

/// Benchmark parsing/validation performance across different expression
/// complexities.
fn bench_parsing_by_complexity(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing_by_complexity");

    let test_cases = [
        ("simple_unit", "m"),
        ("prefixed_unit", "kg"),
        ("basic_product", "kg.m"),
        ("simple_quotient", "m/s"),
        ("complex_expression", "kg.m/s2"),
        ("medical_units", "mg/dL"),
        ("multiple_powers", "m2.kg/s3"),
        ("nested_quotient", "J/mol/K"),
        ("leading_division", "/min"),
        ("annotation", "m{length}"),
        ("ten_power", "10^3.mol"),
        ("parentheses", "(kg.m)/s2"),
        ("bracketed_atom", "[in_i]"),
        ("celsius", "Cel"),
    ];

    for (name, expr) in &test_cases {
        group.bench_with_input(BenchmarkId::new("validate", name), expr, |b, &expr| {
            b.iter(|| validate(black_box(expr)))
        });
    }

    group.finish();
}

/// Benchmark parsing performance for various unit categories.
fn bench_parsing_categories(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing_categories");

    let base_units = ["m", "g", "s", "rad", "K", "mol", "cd"];
    for unit in &base_units {
        group.bench_with_input(BenchmarkId::new("base_units", unit), unit, |b, &unit| {
            b.iter(|| validate(black_box(unit)))
        });
    }

    let prefixed_units = ["km", "mg", "us", "kPa", "mL", "cm", "mm", "ng"];
    for unit in &prefixed_units {
        group.bench_with_input(BenchmarkId::new("prefixed", unit), unit, |b, &unit| {
            b.iter(|| validate(black_box(unit)))
        });
    }

    let medical_units = ["mg/dL", "mmol/L", "mEq/L", "U/L", "mm[Hg]"];
    for unit in &medical_units {
        group.bench_with_input(BenchmarkId::new("medical", unit), unit, |b, &unit| {
            b.iter(|| validate(black_box(unit)))
        });
    }

    let engineering_units = ["N", "Pa", "J", "W", "V", "Hz", "kPa"];
    for unit in &engineering_units {
        group.bench_with_input(BenchmarkId::new("engineering", unit), unit, |b, &unit| {
            b.iter(|| validate(black_box(unit)))
        });
    }

    group.finish();
}

/// Benchmark the conversion path end to end (parse both sides, run the
/// dimensional algebra, apply the conversion factor).
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    let pairs = [
        ("ratio_scale", "g", "[car_m]"),
        ("prefixed_ratio", "mg", "g"),
        ("compound", "kg.m/s2", "N"),
        ("special_temperature", "[degF]", "Cel"),
    ];

    for (name, from, to) in pairs {
        group.bench_function(name, |b| {
            b.iter(|| convert_unit_to(black_box(from), black_box(1.0), black_box(to), false, None))
        });
    }

    group.bench_function("mass_to_substance_amount", |b| {
        b.iter(|| {
            convert_unit_to(
                black_box("mmol/L"),
                black_box(5.33),
                black_box("mg/dL"),
                false,
                Some(180.156),
            )
        })
    });

    group.finish();
}

/// Benchmark reduction to base (coherent) units.
fn bench_base_units(c: &mut Criterion) {
    let mut group = c.benchmark_group("base_units");

    for expr in ["kg.m/s2", "cm2/ms3", "[degF]", "mm[Hg]"] {
        group.bench_function(expr, |b| {
            b.iter(|| convert_to_base_units(black_box(expr), black_box(1.0)))
        });
    }

    group.finish();
}

/// Benchmark high-level API functions.
fn bench_api_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("api");

    group.bench_function("validate", |b| b.iter(|| validate(black_box("kg.m/s2"))));
    group.bench_function("analyse", |b| b.iter(|| analyse(black_box("kg.m/s2"))));

    group.finish();
}

/// Benchmark parser-specific constructs: ten-power literals and
/// annotations.
fn bench_parser_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_features");

    let ten_power_cases = ["10^3", "10^-2", "10^6.mol", "10^-12.kg"];
    for expr in &ten_power_cases {
        group.bench_with_input(BenchmarkId::new("ten_power", expr), expr, |b, &expr| {
            b.iter(|| validate(black_box(expr)))
        });
    }

    let annotation_cases = ["m{length}", "kg{mass}", "s{time}", "K{temperature}"];
    for expr in &annotation_cases {
        group.bench_with_input(BenchmarkId::new("annotations", expr), expr, |b, &expr| {
            b.iter(|| validate(black_box(expr)))
        });
    }

    group.finish();
}

/// Benchmark edge cases and error conditions.
fn bench_edge_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_cases");

    group.bench_function("empty", |b| b.iter(|| validate(black_box(""))));
    group.bench_function("single_char", |b| b.iter(|| validate(black_box("m"))));
    group.bench_function("leading_division", |b| b.iter(|| validate(black_box("/min"))));
    group.bench_function("nested_parens", |b| {
        b.iter(|| validate(black_box("((kg.m)/s)/mol")))
    });

    let long_expr = "kg.m.s.mol.cd/kg.m.s.mol.cd";
    group.bench_function("long_expression", |b| b.iter(|| validate(black_box(long_expr))));

    group.finish();
}

/// End-to-end benchmarks simulating real usage patterns.
fn bench_real_world_usage(c: &mut Criterion) {
    let mut group = c.benchmark_group("real_world_usage");

    group.bench_function("validate_then_convert", |b| {
        b.iter(|| {
            let expr = "mg/dL";
            let _ = validate(black_box(expr));
            let _ = convert_unit_to(black_box(expr), black_box(1.0), black_box("g/L"), false, None);
        })
    });

    group.bench_function("medical_dosing", |b| {
        b.iter(|| {
            let dose_unit = "mg/kg";
            let time_unit = "/d";
            let _ = validate(black_box(dose_unit));
            let _ = validate(black_box(time_unit));
        })
    });

    group.bench_function("engineering_calc", |b| {
        b.iter(|| {
            let pressure = "kPa";
            let area = "m2";
            let force_expr = "kPa.m2";
            let _ = validate(black_box(pressure));
            let _ = validate(black_box(area));
            let _ = analyse(black_box(force_expr));
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing_by_complexity,
    bench_parsing_categories,
    bench_conversion,
    bench_base_units,
    bench_api_operations,
    bench_parser_features,
    bench_edge_cases,
    bench_real_world_usage
);
criterion_main!(benches);
