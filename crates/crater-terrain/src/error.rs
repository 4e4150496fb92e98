/// Errors raised while constructing a terrain layer. Any of these is fatal:
/// a partially built layer would desynchronize server and clients.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("asset header too small ({0} bytes, minimum {1})")]
    HeaderTooSmall(usize, usize),

    #[error("invalid terrain dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("truncated asset: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("bit buffer length mismatch: expected {expected} bytes, got {actual}")]
    BitsLength { expected: usize, actual: usize },
}
