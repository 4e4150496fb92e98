/// End-to-end scenarios: terrain, map and projectiles stepped together the
/// way a host tick loop drives them.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crater_core::config::{Environment, ProjectileParams};
    use crater_core::geometry::{Point, Rect};
    use crater_core::types::EntityId;
    use crater_terrain::{mask, TerrainBitmap};
    use glam::Vec2;

    use crate::body::PhysicsBody;
    use crate::hooks::{CollisionHooks, CraterHooks};
    use crate::map::WorldMap;
    use crate::projectile::Projectile;

    /// Map with open sky above `surface` and solid ground from it down.
    fn flat_map(width: u32, height: u32, surface: i32) -> Arc<WorldMap> {
        let mut ground = TerrainBitmap::blank(width, height, true);
        ground.fill_rect(Rect::new(0, surface, width as i32, height as i32 - surface));
        Arc::new(WorldMap::new(Some(ground), None))
    }

    fn run_until_settled<H: CollisionHooks>(p: &mut Projectile<H>, dt: f32, max_ticks: u32) {
        for _ in 0..max_ticks {
            if !p.body().is_moving() {
                return;
            }
            p.update(dt);
        }
    }

    #[derive(Debug, Default)]
    struct Recorder {
        object_contacts: Vec<Point>,
    }

    impl CollisionHooks for Recorder {
        fn collide_objects(&mut self, body: &PhysicsBody, _map: &WorldMap, _hits: &[Arc<PhysicsBody>]) {
            self.object_contacts.push(body.position());
        }
    }

    #[test]
    fn test_shell_comes_to_rest_on_ground() {
        let map = flat_map(200, 200, 150);
        let mut p = Projectile::new(EntityId(1), ProjectileParams::default());
        p.attach(&map);
        p.set_xy(100, 100);
        p.start_moving();

        run_until_settled(&mut p, 1.0, 100);

        let at = p.position();
        assert_eq!(at.x, 100);
        assert!((147..=149).contains(&at.y), "rested at {at}");
        assert!(p.body().is_living());
        assert!(!p.body().is_moving());
    }

    #[test]
    fn test_side_exit_dies_at_wall() {
        let map = Arc::new(WorldMap::new(
            Some(TerrainBitmap::blank(100, 100, true)),
            None,
        ));
        map.set_gravity(0.0);
        let mut p = Projectile::new(EntityId(1), ProjectileParams::default());
        p.attach(&map);
        p.set_xy(90, 50);
        p.set_velocity(20.0, 0.0);
        p.start_moving();

        p.update(1.0);

        assert!(!p.body().is_living());
        assert_eq!(p.position(), Point::new(100, 50));
    }

    #[test]
    fn test_pass_through_body_carries_sweep_from_contact() {
        let map = Arc::new(WorldMap::new(
            Some(TerrainBitmap::blank(200, 200, true)),
            None,
        ));
        let target = Arc::new(PhysicsBody::with_default_bound(EntityId(2)));
        target.set_xy(60, 50);
        map.add_physical(&target);

        let mut p = Projectile::with_hooks(EntityId(1), ProjectileParams::default(), Recorder::default());
        p.attach(&map);
        p.set_xy(50, 50);
        p.start_moving();
        p.move_to(80, 50);

        // Strides 1, 4, 7, ... are added to wherever the body is: 51 is
        // clear and not taken, 54 hits, then 54 + 7 = 61 hits, then 71 onwards
        // is clear and the sweep snaps to the target.
        let xs: Vec<i32> = p.hooks().object_contacts.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![54, 61]);
        assert_eq!(p.position(), Point::new(80, 50));
        assert!(target.is_living());
    }

    #[test]
    fn test_contact_shift_can_carry_sweep_past_target() {
        let mut ground = TerrainBitmap::blank(200, 200, true);
        ground.fill_rect(Rect::new(88, 0, 112, 200));
        let map = Arc::new(WorldMap::new(Some(ground), None));
        let target = Arc::new(PhysicsBody::with_default_bound(EntityId(2)));
        target.set_xy(60, 50);
        map.add_physical(&target);

        let mut p = Projectile::with_hooks(EntityId(1), ProjectileParams::default(), Recorder::default());
        p.attach(&map);
        p.set_xy(50, 50);
        p.start_moving();
        p.move_to(80, 50);

        // After the contact at 61 the later strides land on 71, 74, ..., 86;
        // at 86 the box's right edge reaches the wall.
        let xs: Vec<i32> = p.hooks().object_contacts.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![54, 61]);
        assert_eq!(p.position(), Point::new(86, 50));
        assert!(!p.body().is_moving());
        assert!(p.body().is_living());
    }

    #[test]
    fn test_crater_shell_digs_circle() {
        let map = flat_map(200, 200, 100);
        let hooks = CraterHooks::new(Arc::new(mask::circle(20)));
        let mut p = Projectile::with_hooks(EntityId(1), ProjectileParams::default(), hooks);
        p.attach(&map);
        p.set_xy(100, 50);
        p.start_moving();

        run_until_settled(&mut p, 1.0, 100);

        assert!(!p.body().is_living());
        let impact = p.hooks().impact().expect("shell should have exploded");
        assert_eq!(impact, Point::new(100, 98));
        assert!(p.hooks().hit_ids().is_empty());

        // Row y = 105 is 7 below the centre: cleared for |dx| <= 7.
        assert!(map.is_empty(93, 105));
        assert!(map.is_empty(107, 105));
        assert!(!map.is_empty(92, 105));
        assert!(!map.is_empty(108, 105));
        // Below the hole the ground is intact.
        assert!(!map.is_empty(100, 110));
    }

    #[test]
    fn test_crater_shell_hits_body_first() {
        // Wall from x = 56; the tank stands in front of it.
        let mut ground = TerrainBitmap::blank(200, 200, true);
        ground.fill_rect(Rect::new(56, 0, 144, 200));
        let map = Arc::new(WorldMap::new(Some(ground), None));
        let tank = Arc::new(PhysicsBody::with_default_bound(EntityId(7)));
        tank.set_xy(60, 50);
        map.add_physical(&tank);

        let hooks = CraterHooks::new(Arc::new(mask::circle(10)));
        let mut p = Projectile::with_hooks(EntityId(1), ProjectileParams::default(), hooks);
        p.attach(&map);
        p.set_xy(50, 50);
        p.start_moving();
        p.move_to(80, 50);

        // At x = 54 the box touches both the tank and the wall; bodies win.
        assert_eq!(p.hooks().hit_ids(), &[EntityId(7)]);
        assert_eq!(p.hooks().impact(), Some(Point::new(54, 50)));
        assert!(map.is_empty(57, 50));
        assert!(!map.is_empty(60, 50));
        assert!(!p.body().is_living());
    }

    #[test]
    fn test_wind_pushes_sideways() {
        let map = Arc::new(WorldMap::new(
            Some(TerrainBitmap::blank(400, 400, true)),
            None,
        ));
        map.set_environment(Environment {
            gravity: 0.0,
            wind: 4.0,
            air_resistance: 0.0,
        });
        let mut p = Projectile::new(EntityId(1), ProjectileParams::default());
        p.attach(&map);
        p.set_xy(100, 100);
        p.start_moving();

        p.update(1.0);
        p.update(1.0);

        assert_eq!(p.velocity(), Vec2::new(8.0, 0.0));
        assert_eq!(p.position(), Point::new(112, 100));
    }

    #[test]
    fn test_identical_inputs_identical_trajectories() {
        fn trajectory() -> Vec<(Vec2, Point)> {
            let map = flat_map(600, 400, 350);
            map.set_environment(Environment {
                gravity: 9.8,
                wind: -1.3,
                air_resistance: 0.07,
            });
            let params = ProjectileParams {
                mass: 2.5,
                gravity_factor: 0.8,
                wind_factor: 1.7,
                air_resist_factor: 1.1,
            };
            let mut p = Projectile::new(EntityId(1), params);
            p.attach(&map);
            p.set_xy(300, 100);
            p.set_velocity(35.0, -60.0);
            p.start_moving();

            let mut out = Vec::new();
            for _ in 0..500 {
                if !p.body().is_moving() {
                    break;
                }
                p.update(0.05);
                out.push((p.precise_position(), p.position()));
            }
            out
        }

        let a = trajectory();
        let b = trajectory();
        assert!(!a.is_empty());
        assert_eq!(a.len(), b.len());
        for ((pa, ia), (pb, ib)) in a.iter().zip(b.iter()) {
            assert_eq!(pa.x.to_bits(), pb.x.to_bits());
            assert_eq!(pa.y.to_bits(), pb.y.to_bits());
            assert_eq!(ia, ib);
        }
    }

    #[test]
    fn test_concurrent_attach_and_query() {
        let map = Arc::new(WorldMap::new(
            Some(TerrainBitmap::blank(500, 500, true)),
            None,
        ));
        let bodies: Vec<Arc<PhysicsBody>> = (0..64)
            .map(|i| {
                let body = Arc::new(PhysicsBody::with_default_bound(EntityId(i)));
                body.set_xy((i as i32 % 8) * 20 + 10, (i as i32 / 8) * 20 + 10);
                body
            })
            .collect();
        let everywhere = Rect::new(-1000, -1000, 3000, 3000);

        std::thread::scope(|s| {
            for chunk in bodies.chunks(16) {
                let map = &map;
                s.spawn(move || {
                    for _ in 0..200 {
                        for body in chunk {
                            map.add_physical(body);
                        }
                        for body in chunk {
                            map.remove_physical(body);
                        }
                    }
                });
            }
            for _ in 0..2 {
                let map = &map;
                s.spawn(move || {
                    for _ in 0..500 {
                        let found = map.find_physical_objects(everywhere, None);
                        assert!(found.len() <= 64);
                        assert!(found.iter().all(|b| b.is_living()));
                    }
                });
            }
        });

        assert_eq!(map.live_count(), 0);
        assert!(bodies.iter().all(|b| !b.is_attached()));
    }

    #[test]
    fn test_removed_body_is_never_found() {
        let map = Arc::new(WorldMap::new(
            Some(TerrainBitmap::blank(500, 500, true)),
            None,
        ));
        let churn: Vec<Arc<PhysicsBody>> = (0..48)
            .map(|i| {
                let body = Arc::new(PhysicsBody::with_default_bound(EntityId(i)));
                body.set_xy((i as i32 % 8) * 20 + 10, (i as i32 / 8) * 20 + 10);
                body
            })
            .collect();
        let watched = Arc::new(PhysicsBody::with_default_bound(EntityId(100)));
        watched.set_xy(250, 250);
        let everywhere = Rect::new(-1000, -1000, 3000, 3000);

        std::thread::scope(|s| {
            for chunk in churn.chunks(16) {
                let map = &map;
                s.spawn(move || {
                    for _ in 0..200 {
                        for body in chunk {
                            map.add_physical(body);
                        }
                        for body in chunk {
                            map.remove_physical(body);
                        }
                    }
                });
            }
            let map = &map;
            let watched = &watched;
            s.spawn(move || {
                for round in 0..300 {
                    map.add_physical(watched);
                    let found = map.find_physical_objects(everywhere, None);
                    assert!(
                        found.iter().any(|b| Arc::ptr_eq(b, watched)),
                        "round {round}: attached body missing"
                    );

                    map.remove_physical(watched);
                    let found = map.find_physical_objects(everywhere, None);
                    assert!(
                        !found.iter().any(|b| Arc::ptr_eq(b, watched)),
                        "round {round}: removed body still reported"
                    );
                    assert!(!found.iter().any(|b| b.id() == EntityId(100)));
                }
            });
        });

        assert_eq!(map.live_count(), 0);
        assert!(!watched.is_attached());
    }

    #[test]
    fn test_dig_during_query_sees_whole_layers() {
        let map = flat_map(256, 256, 0);
        let hole = Arc::new(mask::circle(32));

        std::thread::scope(|s| {
            let digger = &map;
            let hole = &hole;
            s.spawn(move || {
                for i in 0..64 {
                    digger.dig(16 + i * 4, 128, Some(hole.as_ref()), None);
                }
            });
            let reader = &map;
            s.spawn(move || {
                for _ in 0..1000 {
                    // (0, 0) is never inside a hole.
                    assert!(!reader.is_empty(0, 0));
                }
            });
        });

        assert!(map.is_empty(16, 128));
        assert!(map.is_empty(250, 128));
    }
}
