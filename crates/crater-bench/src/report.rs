use std::path::Path;

use crate::runner::{BenchmarkResult, TimingSeries};

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file is missing or
/// does not parse.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Ignoring malformed baseline {}: {e}", path.display());
            None
        }
    }
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Why a scene was flagged against its baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Regression {
    /// A timing metric grew by more than the threshold.
    Slower {
        scene: String,
        metric: &'static str,
        pct_change: f64,
    },
    /// The same scene over the same ticks left a different amount of ground.
    /// Stepping is deterministic, so this means the physics changed.
    TerrainDrift {
        scene: String,
        expected: u64,
        actual: u64,
    },
}

/// Timing metrics checked by [`compare`].
const CHECKED_METRICS: [(&str, fn(&TimingSeries) -> f64); 2] =
    [("mean", |t: &TimingSeries| t.mean_ms), ("p95", |t: &TimingSeries| t.p95_ms)];

/// Compare `current` against `baseline`. Mean and p95 tick times are flagged
/// when they grew by more than `threshold_pct` percent; a zero baseline
/// metric is skipped. Scenes missing from the baseline are skipped.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };

        for (metric, read) in CHECKED_METRICS {
            let (was, now) = (read(&base.timings), read(&result.timings));
            if was <= 0.0 {
                continue;
            }
            let pct_change = (now - was) / was * 100.0;
            if pct_change > threshold_pct {
                regressions.push(Regression::Slower {
                    scene: result.scene_name.clone(),
                    metric,
                    pct_change,
                });
            }
        }

        let same_run = base.tick_count == result.tick_count
            && base.solid_before == result.solid_before
            && base.shells == result.shells;
        if same_run && base.solid_after != result.solid_after {
            regressions.push(Regression::TerrainDrift {
                scene: result.scene_name.clone(),
                expected: base.solid_after,
                actual: result.solid_after,
            });
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Shells | Craters | Ticks | Solid px (before / after) | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|--------|---------|-------|---------------------------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} / {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.shells,
            r.craters,
            r.tick_count,
            r.solid_before,
            r.solid_after,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for regression in regressions {
        match regression {
            Regression::Slower {
                scene,
                metric,
                pct_change,
            } => out.push_str(&format!("  - {scene}: {metric} +{pct_change:.1}%\n")),
            Regression::TerrainDrift {
                scene,
                expected,
                actual,
            } => out.push_str(&format!(
                "  - {scene}: solid pixels after run {actual}, baseline {expected}\n"
            )),
        }
    }
    out
}
