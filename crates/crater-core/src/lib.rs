pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod types;

pub use config::{Environment, ProjectileParams};
pub use error::ConfigError;
pub use geometry::{Point, Rect};
pub use integrator::EulerAxis;
pub use types::EntityId;
