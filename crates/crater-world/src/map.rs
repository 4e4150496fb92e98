use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crater_core::config::Environment;
use crater_core::geometry::Rect;
use crater_terrain::TerrainBitmap;

use crate::body::PhysicsBody;
use crate::registry::BodyRegistry;

/// The playing field: up to two terrain layers, the environment scalars and
/// the bodies currently attached.
///
/// Maps are shared as `Arc<WorldMap>`. The ground layer sits behind an
/// `RwLock` so collision handlers can dig while other threads read; the dead
/// layer is never modified and needs no lock.
#[derive(Debug)]
pub struct WorldMap {
    /// Destructible layer. The only layer `dig` touches.
    ground: Option<RwLock<TerrainBitmap>>,
    /// Indestructible layer, used for occupancy queries only.
    dead: Option<TerrainBitmap>,
    bounds: Rect,
    environment: RwLock<Environment>,
    registry: BodyRegistry,
}

impl WorldMap {
    /// Build a map from its layers. Either may be absent; bounds come from
    /// the ground layer when present, else the dead layer, else zero.
    pub fn new(ground: Option<TerrainBitmap>, dead: Option<TerrainBitmap>) -> Self {
        let bounds = ground
            .as_ref()
            .or(dead.as_ref())
            .map(TerrainBitmap::extent)
            .unwrap_or(Rect::ZERO);
        log::debug!(
            "world map {:?} (ground: {}, dead: {})",
            bounds,
            ground.is_some(),
            dead.is_some()
        );
        Self {
            ground: ground.map(RwLock::new),
            dead,
            bounds,
            environment: RwLock::new(Environment::default()),
            registry: BodyRegistry::new(),
        }
    }

    pub fn with_environment(self, environment: Environment) -> Self {
        self.set_environment(environment);
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn environment(&self) -> Environment {
        *self
            .environment
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_environment(&self, environment: Environment) {
        *self
            .environment
            .write()
            .unwrap_or_else(PoisonError::into_inner) = environment;
    }

    fn update_environment(&self, f: impl FnOnce(&mut Environment)) {
        f(&mut self
            .environment
            .write()
            .unwrap_or_else(PoisonError::into_inner));
    }

    pub fn gravity(&self) -> f32 {
        self.environment().gravity
    }

    pub fn set_gravity(&self, gravity: f32) {
        self.update_environment(|env| env.gravity = gravity);
    }

    pub fn wind(&self) -> f32 {
        self.environment().wind
    }

    pub fn set_wind(&self, wind: f32) {
        self.update_environment(|env| env.wind = wind);
    }

    pub fn air_resistance(&self) -> f32 {
        self.environment().air_resistance
    }

    pub fn set_air_resistance(&self, air_resistance: f32) {
        self.update_environment(|env| env.air_resistance = air_resistance);
    }

    /// Read access to the ground layer.
    pub fn ground(&self) -> Option<RwLockReadGuard<'_, TerrainBitmap>> {
        self.ground
            .as_ref()
            .map(|layer| layer.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn dead(&self) -> Option<&TerrainBitmap> {
        self.dead.as_ref()
    }

    /// False if any present layer is solid at the point.
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        if let Some(ground) = self.ground() {
            if !ground.is_empty(x, y) {
                return false;
            }
        }
        self.dead.as_ref().map_or(true, |dead| dead.is_empty(x, y))
    }

    /// Corner-probe emptiness of `rect` on every present layer.
    pub fn is_rectangle_empty(&self, rect: Rect) -> bool {
        if let Some(ground) = self.ground() {
            if !ground.is_rectangle_empty_quick(rect) {
                return false;
            }
        }
        self.dead
            .as_ref()
            .map_or(true, |dead| dead.is_rectangle_empty_quick(rect))
    }

    /// Left/right edges and the bottom are walls; the sky is open, so points
    /// above the top edge are still in the map.
    pub fn is_out_map(&self, x: i32, y: i32) -> bool {
        if x >= self.bounds.left() && x < self.bounds.right() {
            y > self.bounds.bottom()
        } else {
            true
        }
    }

    /// Living bodies other than `except` whose bounding box overlaps `rect`
    /// (touching edges do not count). Order is unspecified.
    pub fn find_physical_objects(
        &self,
        rect: Rect,
        except: Option<&PhysicsBody>,
    ) -> Vec<Arc<PhysicsBody>> {
        let snapshot = self.registry.snapshot();
        snapshot
            .into_iter()
            .filter(|body| except.map_or(true, |e| !std::ptr::eq(Arc::as_ptr(body), e)))
            .filter(|body| body.is_living() && body.world_bound().intersects(&rect))
            .collect()
    }

    /// Attach `body` to this map. A body attached elsewhere is moved over.
    pub fn add_physical(self: &Arc<Self>, body: &Arc<PhysicsBody>) {
        if let Some(previous) = body.map() {
            if !Arc::ptr_eq(&previous, self) {
                previous.remove_physical(body);
            }
        }
        body.set_map(Some(self));
        if self.registry.insert(body) {
            log::debug!("body {} attached at {}", body.id(), body.position());
        }
    }

    /// Detach `body` from this map. Bodies attached elsewhere keep their
    /// owner handle.
    pub fn remove_physical(&self, body: &PhysicsBody) {
        if body.is_attached_to(self) {
            body.set_map(None);
        }
        if self.registry.remove(body) {
            log::debug!("body {} detached at {}", body.id(), body.position());
        }
    }

    /// Number of attached bodies, dead ones included.
    pub fn live_count(&self) -> usize {
        self.registry.len()
    }

    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.registry.contains(body)
    }

    /// Blast the ground layer. The dead layer is never touched.
    pub fn dig(
        &self,
        cx: i32,
        cy: i32,
        hole: Option<&TerrainBitmap>,
        border: Option<&TerrainBitmap>,
    ) {
        if let Some(ground) = &self.ground {
            ground
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .dig(cx, cy, hole, border);
        }
    }
}
