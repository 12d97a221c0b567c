//! Lightweight parse/stringify/dump benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p argstree_core --example parse_benchmark --release`

use std::sync::Arc;
use std::time::Instant;

use argstree_core::{
    ArgsTreeError, Spec, SpecOptions, StringifyOptions, spec, stringify, to_pretty_json,
};

fn build_spec() -> Result<Spec, ArgsTreeError> {
    let mut cmd = spec(SpecOptions {
        strict: Some(true),
        ..SpecOptions::default()
    });
    for flag in ["verbose", "quiet", "force", "all"] {
        cmd.option(
            format!("--{flag}"),
            SpecOptions {
                max_read: Some(0),
                ..SpecOptions::default()
            },
        )?
        .alias(format!("-{}", &flag[..1]))?;
    }
    cmd.option(
        "--jobs",
        SpecOptions {
            min: Some(1),
            max: Some(1),
            ..SpecOptions::default()
        },
    )?
    .alias("-j")?
    .command("build", SpecOptions::default())?
    .spec(|build| {
        build
            .option(
                "--target",
                SpecOptions {
                    max: Some(1),
                    ..SpecOptions::default()
                },
            )?
            .alias("-t")?
            .command(
                "--",
                SpecOptions {
                    strict: Some(false),
                    ..SpecOptions::default()
                },
            )?;
        Ok(())
    })?;
    Ok(cmd)
}

fn per_iter_ms(elapsed: std::time::Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

fn run_benchmark(label: &str, args: &[String], cmd: &Spec, iterations: usize) -> Result<(), ArgsTreeError> {
    let options = cmd.options();

    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = argstree_core::argstree(args, Arc::clone(&options))?;
    }
    let parse_elapsed = parse_start.elapsed();

    let tree = argstree_core::argstree(args, options)?;

    let stringify_start = Instant::now();
    for _ in 0..iterations {
        let _ = stringify(tree.root(), StringifyOptions::default());
    }
    let stringify_elapsed = stringify_start.elapsed();

    let dump_start = Instant::now();
    for _ in 0..iterations {
        let _ = to_pretty_json(&tree);
    }
    let dump_elapsed = dump_start.elapsed();

    println!("Benchmark: {label}");
    println!("  args: {}, nodes: {}", args.len(), tree.len());
    println!(
        "  parse:     total={:?}, per_iter={:.3} ms",
        parse_elapsed,
        per_iter_ms(parse_elapsed, iterations)
    );
    println!(
        "  stringify: total={:?}, per_iter={:.3} ms",
        stringify_elapsed,
        per_iter_ms(stringify_elapsed, iterations)
    );
    println!(
        "  dump:      total={:?}, per_iter={:.3} ms",
        dump_elapsed,
        per_iter_ms(dump_elapsed, iterations)
    );
    Ok(())
}

fn main() -> Result<(), ArgsTreeError> {
    let iterations = std::env::var("ARGSTREE_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(500);

    let cmd = build_spec()?;
    let short: Vec<String> = ["-vf", "--jobs=4", "build", "-t", "x86_64", "src"]
        .into_iter()
        .map(String::from)
        .collect();
    let long: Vec<String> = (0..200)
        .flat_map(|i| ["-vqa".to_string(), format!("--jobs={i}")])
        .chain(["build".to_string(), "--".to_string()])
        .chain((0..500).map(|i| format!("--raw-{i}")))
        .collect();

    run_benchmark("short", &short, &cmd, iterations)?;
    run_benchmark("long", &long, &cmd, iterations)?;
    Ok(())
}
