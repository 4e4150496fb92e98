use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crater_core::constants::DEFAULT_BODY_BOUND;
use crater_core::geometry::{Point, Rect};
use crater_core::types::EntityId;

use crate::map::WorldMap;

/// Lifecycle of a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// Alive but not registered with any map.
    Unattached,
    /// Registered with a map, at rest.
    Idle,
    /// Registered with a map and stepped every tick.
    Moving,
    /// Terminal. No transition leaves this state.
    Dead,
}

/// Identity, position and liveness of anything that takes part in collisions.
///
/// Bodies are shared as `Arc<PhysicsBody>` between their owner (for example a
/// [`crate::projectile::Projectile`]) and the registry of the map they are
/// attached to, so all mutable state is interior. The owning map is held as a
/// `Weak` handle: dropping a map never requires dropping its bodies, and a
/// body whose map is gone simply reads as unattached.
#[derive(Debug)]
pub struct PhysicsBody {
    id: EntityId,
    /// Local bounding box relative to the position. Fixed at construction.
    bound: Rect,
    /// x in the high 32 bits, y in the low 32 bits, so readers on other
    /// threads never see half of a move.
    position: AtomicU64,
    living: AtomicBool,
    moving: AtomicBool,
    map: RwLock<Weak<WorldMap>>,
}

fn pack_position(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

fn unpack_position(packed: u64) -> Point {
    Point::new((packed >> 32) as u32 as i32, packed as u32 as i32)
}

impl PhysicsBody {
    pub fn new(id: EntityId, bound: Rect) -> Self {
        Self {
            id,
            bound,
            position: AtomicU64::new(pack_position(0, 0)),
            living: AtomicBool::new(true),
            moving: AtomicBool::new(false),
            map: RwLock::new(Weak::new()),
        }
    }

    /// Body with the generic `(-5, -5, 10, 10)` bounding box.
    pub fn with_default_bound(id: EntityId) -> Self {
        Self::new(id, DEFAULT_BODY_BOUND)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Local bounding box, relative to the position.
    pub fn bound(&self) -> Rect {
        self.bound
    }

    /// Bounding box translated to the current position.
    pub fn world_bound(&self) -> Rect {
        self.bound.offset_by(self.position())
    }

    pub fn position(&self) -> Point {
        unpack_position(self.position.load(Ordering::Acquire))
    }

    pub fn x(&self) -> i32 {
        self.position().x
    }

    pub fn y(&self) -> i32 {
        self.position().y
    }

    pub fn set_xy(&self, x: i32, y: i32) {
        self.position.store(pack_position(x, y), Ordering::Release);
    }

    pub fn is_living(&self) -> bool {
        self.living.load(Ordering::Acquire)
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::Acquire)
    }

    /// The map this body is attached to, if it is still alive.
    pub fn map(&self) -> Option<Arc<WorldMap>> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()
    }

    pub fn is_attached(&self) -> bool {
        self.map().is_some()
    }

    /// Whether this body is attached to exactly `map`.
    pub fn is_attached_to(&self, map: &WorldMap) -> bool {
        let current = self.map.read().unwrap_or_else(PoisonError::into_inner);
        std::ptr::eq(current.as_ptr(), map) && current.strong_count() > 0
    }

    pub fn state(&self) -> BodyState {
        if !self.is_living() {
            BodyState::Dead
        } else if !self.is_attached() {
            BodyState::Unattached
        } else if self.is_moving() {
            BodyState::Moving
        } else {
            BodyState::Idle
        }
    }

    /// Point the owner handle at `map`, or clear it. Only the map's
    /// add/remove calls this; clearing also stops motion.
    pub(crate) fn set_map(&self, map: Option<&Arc<WorldMap>>) {
        let handle = map.map(Arc::downgrade).unwrap_or_default();
        *self.map.write().unwrap_or_else(PoisonError::into_inner) = handle;
        if map.is_none() {
            self.stop_moving();
        }
    }

    /// Begin stepping. Ignored while unattached or dead.
    pub fn start_moving(&self) {
        if self.is_living() && self.is_attached() {
            self.moving.store(true, Ordering::Release);
        }
    }

    pub fn stop_moving(&self) {
        self.moving.store(false, Ordering::Release);
    }

    /// Stop and mark dead. Calling it again changes nothing.
    pub fn die(&self) {
        self.stop_moving();
        if self.living.swap(false, Ordering::AcqRel) {
            log::debug!("body {} died at {}", self.id, self.position());
        }
    }
}
