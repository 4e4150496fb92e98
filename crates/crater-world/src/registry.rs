use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::body::PhysicsBody;

/// Set of bodies attached to one map.
///
/// Bodies are compared by identity (`Arc` pointer), not by id. One mutex
/// serializes registration against iteration; readers take a snapshot and
/// work on it after the lock is released, so collision handlers can add or
/// remove bodies without deadlocking or invalidating the iteration.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Mutex<Vec<Arc<PhysicsBody>>>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<PhysicsBody>>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.bodies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a body. Returns false if it was already registered.
    pub fn insert(&self, body: &Arc<PhysicsBody>) -> bool {
        let mut bodies = self.lock();
        if bodies.iter().any(|b| Arc::ptr_eq(b, body)) {
            return false;
        }
        bodies.push(Arc::clone(body));
        true
    }

    /// Deregister a body. Returns false if it was not registered.
    pub fn remove(&self, body: &PhysicsBody) -> bool {
        let mut bodies = self.lock();
        let before = bodies.len();
        bodies.retain(|b| !std::ptr::eq(Arc::as_ptr(b), body));
        bodies.len() != before
    }

    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.lock()
            .iter()
            .any(|b| std::ptr::eq(Arc::as_ptr(b), body))
    }

    /// Point-in-time copy of the registered bodies.
    pub fn snapshot(&self) -> Vec<Arc<PhysicsBody>> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
