use std::sync::{Arc, Weak};

use glam::Vec2;

use crater_core::config::{Environment, ProjectileParams};
use crater_core::constants::PROJECTILE_BOUND;
use crater_core::geometry::Point;
use crater_core::integrator::EulerAxis;
use crater_core::types::EntityId;

use crate::body::PhysicsBody;
use crate::hooks::{CollisionHooks, InertHooks};
use crate::map::WorldMap;
use crate::stride::StridePath;

/// Constant forces derived from a map's environment and a projectile's
/// factors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceTerms {
    /// Air-resistance coefficient, applied to both axes.
    pub drag: f32,
    /// Downward force on the y axis.
    pub gravity: f32,
    /// Horizontal force on the x axis.
    pub wind: f32,
}

impl ForceTerms {
    pub fn derive(env: &Environment, params: &ProjectileParams) -> Self {
        Self {
            drag: env.air_resistance * params.air_resist_factor,
            gravity: env.gravity * params.gravity_factor * params.mass,
            wind: env.wind * params.wind_factor,
        }
    }
}

/// A stepped ballistic body.
///
/// The integer position lives in the shared [`PhysicsBody`]; the two
/// [`EulerAxis`] carry the sub-pixel trajectory. Collisions move only the
/// integer position, the axes keep integrating from where they were.
#[derive(Debug)]
pub struct Projectile<H: CollisionHooks = InertHooks> {
    body: Arc<PhysicsBody>,
    params: ProjectileParams,
    axis_x: EulerAxis,
    axis_y: EulerAxis,
    forces: ForceTerms,
    /// Map the cached forces were derived from.
    forces_from: Weak<WorldMap>,
    hooks: H,
}

impl Projectile<InertHooks> {
    pub fn new(id: EntityId, params: ProjectileParams) -> Self {
        Self::with_hooks(id, params, InertHooks)
    }
}

impl<H: CollisionHooks> Projectile<H> {
    pub fn with_hooks(id: EntityId, params: ProjectileParams, hooks: H) -> Self {
        Self {
            body: Arc::new(PhysicsBody::new(id, PROJECTILE_BOUND)),
            params,
            axis_x: EulerAxis::default(),
            axis_y: EulerAxis::default(),
            forces: ForceTerms::default(),
            forces_from: Weak::new(),
            hooks,
        }
    }

    pub fn body(&self) -> &Arc<PhysicsBody> {
        &self.body
    }

    pub fn id(&self) -> EntityId {
        self.body.id()
    }

    pub fn params(&self) -> &ProjectileParams {
        &self.params
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn position(&self) -> Point {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.axis_x.velocity(), self.axis_y.velocity())
    }

    pub fn acceleration(&self) -> Vec2 {
        Vec2::new(self.axis_x.acceleration(), self.axis_y.acceleration())
    }

    /// Sub-pixel position held by the integrators.
    pub fn precise_position(&self) -> Vec2 {
        Vec2::new(self.axis_x.position(), self.axis_y.position())
    }

    pub fn forces(&self) -> ForceTerms {
        self.forces
    }

    /// Attach to `map` and derive forces from its current environment.
    pub fn attach(&mut self, map: &Arc<WorldMap>) {
        map.add_physical(&self.body);
        self.refresh_forces();
    }

    /// Detach from the current map. Cached forces are kept as they were.
    pub fn detach(&mut self) {
        if let Some(map) = self.body.map() {
            map.remove_physical(&self.body);
        }
    }

    /// Re-derive forces from the attached map's environment. Without a map
    /// the cached forces are left alone.
    pub fn refresh_forces(&mut self) {
        if let Some(map) = self.body.map() {
            self.forces = ForceTerms::derive(&map.environment(), &self.params);
            self.forces_from = Arc::downgrade(&map);
            log::trace!("body {} forces {:?}", self.body.id(), self.forces);
        }
    }

    fn forces_stale(&self) -> bool {
        match self.body.map() {
            Some(map) => !std::ptr::eq(self.forces_from.as_ptr(), Arc::as_ptr(&map)),
            None => false,
        }
    }

    /// Place the body and reset the integrators' positions to match.
    pub fn set_xy(&mut self, x: i32, y: i32) {
        self.body.set_xy(x, y);
        self.axis_x.set_position(x as f32);
        self.axis_y.set_position(y as f32);
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.axis_x.set_velocity(vx);
        self.axis_y.set_velocity(vy);
    }

    /// Zero velocity and acceleration on both axes.
    pub fn halt(&mut self) {
        self.axis_x.clear_motion();
        self.axis_y.clear_motion();
    }

    pub fn start_moving(&self) {
        self.body.start_moving();
    }

    pub fn stop_moving(&self) {
        self.body.stop_moving();
    }

    pub fn die(&self) {
        self.body.die();
    }

    /// Integrate one tick and sweep to the resulting pixel. Does nothing
    /// unless the body is living and moving.
    pub fn update(&mut self, dt: f32) {
        if !(self.body.is_moving() && self.body.is_living()) {
            return;
        }
        if dt.is_nan() || dt <= 0.0 {
            log::warn!("body {} stepped with dt {}", self.body.id(), dt);
        }
        if self.forces_stale() {
            self.refresh_forces();
        }
        let next = self.next_point(dt);
        self.move_to(next.x, next.y);
    }

    fn next_point(&mut self, dt: f32) -> Point {
        let mass = self.params.mass;
        let ForceTerms { drag, gravity, wind } = self.forces;
        self.axis_x.step(mass, drag, wind, dt);
        self.axis_y.step(mass, drag, gravity, dt);
        Point::new(self.axis_x.position() as i32, self.axis_y.position() as i32)
    }

    /// Sweep the body towards `(tx, ty)` one stride at a time.
    ///
    /// The stride deltas are fixed from where the body starts, but each one
    /// is applied to the body's position at that moment, so a handler that
    /// moves the body carries the rest of the sweep with it. At each
    /// candidate the moved bounding box is checked against other bodies,
    /// then terrain, then the map edges. The first contact moves the body
    /// there and runs its handler; if that leaves the body dead or at rest
    /// the sweep ends. A clean sweep lands exactly on the target.
    pub fn move_to(&mut self, tx: i32, ty: i32) {
        let Some(map) = self.body.map() else {
            return;
        };
        let start = self.body.position();
        let target = Point::new(tx, ty);
        if start == target {
            return;
        }

        for offset in StridePath::new(start, target) {
            let candidate = offset.applied_to(self.body.position());
            let rect = self.body.bound().offset_by(candidate);
            let hits = map.find_physical_objects(rect, Some(&*self.body));
            if !hits.is_empty() {
                self.body.set_xy(candidate.x, candidate.y);
                log::trace!(
                    "body {} hit {} bodies at {}",
                    self.body.id(),
                    hits.len(),
                    candidate
                );
                self.hooks.collide_objects(&self.body, &map, &hits);
            } else if !map.is_rectangle_empty(rect) {
                self.body.set_xy(candidate.x, candidate.y);
                log::trace!("body {} hit ground at {}", self.body.id(), candidate);
                self.hooks.collide_ground(&self.body, &map);
            } else if map.is_out_map(candidate.x, candidate.y) {
                self.body.set_xy(candidate.x, candidate.y);
                log::trace!("body {} left the map at {}", self.body.id(), candidate);
                self.hooks.fly_out(&self.body, &map);
            } else {
                continue;
            }

            if !(self.body.is_living() && self.body.is_moving()) {
                return;
            }
        }
        self.body.set_xy(target.x, target.y);
    }
}
