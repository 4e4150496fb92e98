//! Collision reactions of a projectile.
//!
//! `Projectile::move_to` decides *that* something was hit; the hooks decide
//! what happens next. Each handler runs after the body has been moved to the
//! sub-step where the contact was detected.

use std::sync::Arc;

use crater_core::geometry::Point;
use crater_core::types::EntityId;
use crater_terrain::TerrainBitmap;

use crate::body::PhysicsBody;
use crate::map::WorldMap;

/// Reactions to the three contact kinds. The defaults give an inert shell:
/// it comes to rest on terrain, passes through bodies and dies off the map.
pub trait CollisionHooks {
    /// The body's rectangle touched solid terrain.
    fn collide_ground(&mut self, body: &PhysicsBody, _map: &WorldMap) {
        body.stop_moving();
    }

    /// The body's rectangle overlaps the living bodies in `hits`.
    fn collide_objects(
        &mut self,
        _body: &PhysicsBody,
        _map: &WorldMap,
        _hits: &[Arc<PhysicsBody>],
    ) {
    }

    /// The body left the map through a side wall or the bottom.
    fn fly_out(&mut self, body: &PhysicsBody, _map: &WorldMap) {
        body.die();
    }
}

/// The default reactions and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertHooks;

impl CollisionHooks for InertHooks {}

/// Explosive shell: blasts a crater where it hits terrain or a body, then
/// dies. Leaving the map still just dies.
#[derive(Debug, Clone)]
pub struct CraterHooks {
    hole: Arc<TerrainBitmap>,
    border: Option<Arc<TerrainBitmap>>,
    impact: Option<Point>,
    hit_ids: Vec<EntityId>,
}

impl CraterHooks {
    pub fn new(hole: Arc<TerrainBitmap>) -> Self {
        Self {
            hole,
            border: None,
            impact: None,
            hit_ids: Vec::new(),
        }
    }

    pub fn with_border(mut self, border: Arc<TerrainBitmap>) -> Self {
        self.border = Some(border);
        self
    }

    /// Where the shell exploded, if it has.
    pub fn impact(&self) -> Option<Point> {
        self.impact
    }

    /// Ids of the bodies caught in the explosion, in contact order.
    pub fn hit_ids(&self) -> &[EntityId] {
        &self.hit_ids
    }

    fn explode(&mut self, body: &PhysicsBody, map: &WorldMap) {
        let at = body.position();
        map.dig(at.x, at.y, Some(self.hole.as_ref()), self.border.as_deref());
        self.impact = Some(at);
        log::debug!("body {} exploded at {}", body.id(), at);
        body.die();
    }
}

impl CollisionHooks for CraterHooks {
    fn collide_ground(&mut self, body: &PhysicsBody, map: &WorldMap) {
        self.explode(body, map);
    }

    fn collide_objects(&mut self, body: &PhysicsBody, map: &WorldMap, hits: &[Arc<PhysicsBody>]) {
        self.hit_ids.extend(hits.iter().map(|hit| hit.id()));
        self.explode(body, map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crater_core::geometry::Rect;
    use crater_terrain::mask;

    fn setup() -> (Arc<WorldMap>, Arc<PhysicsBody>) {
        let mut ground = TerrainBitmap::blank(100, 100, true);
        ground.fill_rect(Rect::new(0, 50, 100, 50));
        let map = Arc::new(WorldMap::new(Some(ground), None));
        let body = Arc::new(PhysicsBody::with_default_bound(EntityId(1)));
        body.set_xy(50, 50);
        map.add_physical(&body);
        body.start_moving();
        (map, body)
    }

    #[test]
    fn test_inert_defaults() {
        let (map, body) = setup();
        let mut hooks = InertHooks;

        hooks.collide_objects(&body, &map, &[]);
        assert!(body.is_moving());

        hooks.collide_ground(&body, &map);
        assert!(!body.is_moving());
        assert!(body.is_living());

        hooks.fly_out(&body, &map);
        assert!(!body.is_living());
    }

    #[test]
    fn test_crater_digs_and_dies_on_ground() {
        let (map, body) = setup();
        let mut hooks = CraterHooks::new(Arc::new(mask::circle(20)));

        hooks.collide_ground(&body, &map);

        assert!(!body.is_living());
        assert_eq!(hooks.impact(), Some(Point::new(50, 50)));
        assert!(map.is_empty(50, 55));
        assert!(!map.is_empty(50, 65));
        assert!(hooks.hit_ids().is_empty());
    }

    #[test]
    fn test_crater_records_hits() {
        let (map, body) = setup();
        let other = Arc::new(PhysicsBody::with_default_bound(EntityId(9)));
        let mut hooks = CraterHooks::new(Arc::new(mask::circle(10)));

        hooks.collide_objects(&body, &map, &[Arc::clone(&other)]);

        assert_eq!(hooks.hit_ids(), &[EntityId(9)]);
        assert!(!body.is_living());
        assert!(other.is_living());
    }

    #[test]
    fn test_crater_border_refills_rim() {
        let (map, body) = setup();
        let mut hooks =
            CraterHooks::new(Arc::new(mask::circle(20))).with_border(Arc::new(mask::ring(20, 2)));

        hooks.collide_ground(&body, &map);

        // Centre cleared, rim just inside the hole's edge solid again.
        assert!(map.is_empty(50, 55));
        assert!(!map.is_empty(50, 59));
    }

    #[test]
    fn test_crater_fly_out_does_not_dig() {
        let (map, body) = setup();
        let before = map.ground().map(|g| g.solid_count());
        let mut hooks = CraterHooks::new(Arc::new(mask::circle(20)));

        hooks.fly_out(&body, &map);

        assert!(!body.is_living());
        assert_eq!(hooks.impact(), None);
        assert_eq!(map.ground().map(|g| g.solid_count()), before);
    }
}
