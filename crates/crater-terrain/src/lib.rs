pub mod asset;
pub mod bitmap;
pub mod error;
pub mod mask;

pub use asset::{decode_asset, encode_asset};
pub use bitmap::TerrainBitmap;
pub use error::TerrainError;
