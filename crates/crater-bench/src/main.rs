use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use crater_bench::report;
use crater_bench::runner::BenchmarkRunner;
use crater_bench::scenes;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 600u32;
    let mut only: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => {
                baseline_path = Some(PathBuf::from(value_of(&args, &mut i)));
            }
            "--output" => {
                output_path = Some(PathBuf::from(value_of(&args, &mut i)));
            }
            "--regression-threshold" => {
                regression_threshold = parse_value(&args, &mut i);
            }
            "--ticks" => {
                tick_count = parse_value(&args, &mut i);
            }
            "--scene" => {
                only = Some(value_of(&args, &mut i).to_string());
            }
            "--help" | "-h" => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --ticks <n>                    Tick cap per scene (default: 600)");
                eprintln!("  --scene <name>                 Run only the named scene");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let scene_configs = match scenes::standard_scenes() {
        Ok(scenes) => scenes,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };

    let runner = BenchmarkRunner::new(tick_count);
    let mut results = Vec::new();
    for config in &scene_configs {
        if only.as_ref().is_some_and(|name| *name != config.name) {
            continue;
        }
        results.push(runner.run_scene(config));
    }
    if results.is_empty() {
        log::warn!("No scene matched {:?}", only);
    }

    // Print markdown summary
    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: bench_timestamp(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            log::error!("Failed to save baseline to {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

/// The argument after `args[*i]`, advancing `i` past it.
fn value_of<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => value,
        None => {
            eprintln!("{flag} needs a value");
            process::exit(1);
        }
    }
}

fn parse_value<T: FromStr>(args: &[String], i: &mut usize) -> T {
    let flag = args[*i].clone();
    let raw = value_of(args, i);
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("invalid {flag} value: {raw}");
            process::exit(1);
        }
    }
}

/// Seconds since the Unix epoch, without pulling in a date crate.
fn bench_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{secs}")
}
