pub mod layer;
pub mod mask;
pub mod sprite;
