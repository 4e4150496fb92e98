pub mod body;
pub mod hooks;
pub mod map;
pub mod projectile;
pub mod registry;

mod stride;

pub use body::{BodyState, PhysicsBody};
pub use hooks::{CollisionHooks, CraterHooks, InertHooks};
pub use map::WorldMap;
pub use projectile::{ForceTerms, Projectile};

#[cfg(test)]
mod test_harness;
