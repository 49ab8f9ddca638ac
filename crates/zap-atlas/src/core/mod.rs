pub mod canvas;
pub mod pixels;
