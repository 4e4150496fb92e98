use std::sync::Arc;
use std::time::Instant;

use crater_core::types::EntityId;
use crater_terrain::mask;
use crater_world::{CraterHooks, Projectile, WorldMap};

use crate::scenes::SceneConfig;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub shells: u32,
    pub craters: u32,
    /// Ticks actually run; less than the cap when every shell settled early.
    pub tick_count: u32,
    pub solid_before: u64,
    pub solid_after: u64,
    pub timings: TimingSeries,
}

/// Steps volleys of crater shells on the CPU.
pub struct BenchmarkRunner {
    tick_count: u32,
}

impl BenchmarkRunner {
    /// `tick_count` caps the ticks run per scene.
    pub fn new(tick_count: u32) -> Self {
        Self { tick_count }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({}x{}, {} shells)...",
            config.name,
            config.width,
            config.height,
            config.shells
        );

        let ground = config.build_ground();
        let solid_before = ground.solid_count();
        let map = Arc::new(WorldMap::new(Some(ground), None).with_environment(config.environment));

        let mut volley = fire_volley(config, &map);
        log::info!("  Fired {} shells", volley.len());

        let mut frame_times = Vec::with_capacity(self.tick_count as usize);
        for _ in 0..self.tick_count {
            if volley.iter().all(|p| !p.body().is_moving()) {
                break;
            }

            let frame_start = Instant::now();
            for shell in volley.iter_mut() {
                shell.update(config.dt);
            }
            let elapsed = frame_start.elapsed().as_secs_f64() * 1000.0;
            frame_times.push(elapsed);
        }

        let craters = volley
            .iter()
            .filter(|p| p.hooks().impact().is_some())
            .count() as u32;
        let solid_after = map.ground().map_or(0, |g| g.solid_count());

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: {} craters, mean={:.3}ms, p95={:.3}ms, p99={:.3}ms",
            craters,
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        BenchmarkResult {
            scene_name: config.name.clone(),
            shells: volley.len() as u32,
            craters,
            tick_count: frame_times.len() as u32,
            solid_before,
            solid_after,
            timings,
        }
    }
}

/// Shells spread evenly across the map, launched upwards at alternating
/// angles.
fn fire_volley(config: &SceneConfig, map: &Arc<WorldMap>) -> Vec<Projectile<CraterHooks>> {
    let hole = Arc::new(mask::circle(config.hole_diameter));
    let border = config
        .border_thickness
        .map(|t| Arc::new(mask::ring(config.hole_diameter, t)));

    let spacing = config.width as f32 / (config.shells + 1) as f32;
    (0..config.shells)
        .map(|i| {
            let mut hooks = CraterHooks::new(Arc::clone(&hole));
            if let Some(border) = &border {
                hooks = hooks.with_border(Arc::clone(border));
            }
            let mut shell = Projectile::with_hooks(EntityId(i), config.projectile, hooks);
            shell.attach(map);

            let x = (spacing * (i + 1) as f32) as i32;
            let y = (config.surface_at(x) - 40).max(0);
            shell.set_xy(x, y);

            let angle = if i % 2 == 0 { 60f32 } else { 120f32 }.to_radians();
            shell.set_velocity(
                config.launch_speed * angle.cos(),
                -config.launch_speed * angle.sin(),
            );
            shell.start_moving();
            shell
        })
        .collect()
}

/// Compute timing statistics from a list of frame times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
