pub mod extrude;
pub mod extract;
pub mod pack;
