#![allow(unused_crate_dependencies)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::{hint::black_box, time::Duration};
use toroid::{
    codegen,
    config::{BoundsChecking, CodegenOpts},
};
use toroid_bench::{SRCS, Source, get_src, grid, module, run, tree};

const FUEL: u64 = 1_000_000;

fn micro_benches(c: &mut Criterion) {
    let mut g = make_group(c, "micro");

    g.bench_function("grid/new", |b| {
        let src = black_box(get_src("full_grid").src);
        b.iter(|| grid(src));
    });

    g.finish();
}

fn pipeline_benches(c: &mut Criterion) {
    for s in SRCS {
        eprintln!("{}: {} lines, {} bytes", s.name, s.src.lines().count(), s.src.len());
    }
    eprintln!();

    let mut g = make_group(c, "pipeline");

    for &Source { name, src, halts } in SRCS {
        let grid = grid(src);
        g.bench_function(format!("{name}/tree"), |b| {
            b.iter(|| toroid::flow::build(black_box(&grid)))
        });

        let tree = tree(src);
        for checking in [BoundsChecking::Checked, BoundsChecking::Unchecked] {
            let opts = CodegenOpts { bounds_checking: checking, ..Default::default() };
            g.bench_function(format!("{name}/generate/{checking}"), |b| {
                b.iter(|| codegen::generate(black_box(&tree), &opts))
            });
        }

        let opts = CodegenOpts::default();
        let module = module(src, &opts);
        g.bench_function(format!("{name}/llvm"), |b| {
            b.iter(|| codegen::emit_llvm(black_box(&module)))
        });
        g.bench_function(format!("{name}/mir"), |b| b.iter(|| black_box(&module).to_string()));

        if halts {
            g.bench_function(format!("{name}/run"), |b| {
                b.iter(|| run(black_box(&module), FUEL))
            });
        }
    }

    g.finish();
}

fn make_group<'a>(
    c: &'a mut Criterion,
    name: &str,
) -> criterion::BenchmarkGroup<'a, criterion::measurement::WallTime> {
    let mut g = c.benchmark_group(name);
    g.warm_up_time(Duration::from_secs(3));
    g.measurement_time(Duration::from_secs(10));
    g.sample_size(10);
    g.noise_threshold(0.05);
    g
}

criterion_group!(benches, micro_benches, pipeline_benches);
criterion_main!(benches);
