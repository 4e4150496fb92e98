//! Single-axis explicit Euler integrator.
//!
//! Every projectile owns one per axis. The arithmetic is plain `f32` in a
//! fixed operation order so that two machines fed the same mass, forces and
//! `dt` sequence produce bit-identical positions.

/// Position, velocity and acceleration along one axis.
///
/// Acceleration has no setter: it is recomputed by every [`EulerAxis::step`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAxis {
    position: f32,
    velocity: f32,
    acceleration: f32,
}

impl EulerAxis {
    pub const fn new(position: f32, velocity: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: 0.0,
        }
    }

    pub const fn position(&self) -> f32 {
        self.position
    }

    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    pub const fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn set_position(&mut self, position: f32) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// Zero position, velocity and acceleration.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Zero velocity and acceleration, keep the position.
    pub fn clear_motion(&mut self) {
        self.velocity = 0.0;
        self.acceleration = 0.0;
    }

    /// Advance one tick.
    ///
    /// `a = (force - drag * v) / mass`, then `v += a * dt`, then `x += v * dt`.
    /// The drag term reads the velocity from before this step. Nothing is
    /// clamped: a zero mass yields non-finite state.
    pub fn step(&mut self, mass: f32, drag: f32, force: f32, dt: f32) {
        self.acceleration = (force - drag * self.velocity) / mass;
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }
}
