use thiserror::Error;

/// Errors raised while loading or validating physics configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {what} RON: {message}")]
    Parse { what: &'static str, message: String },

    #[error("projectile mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("invalid {what}: {reason}")]
    Invalid { what: &'static str, reason: String },
}
