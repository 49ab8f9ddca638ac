pub mod manifest;
pub mod sheet;
