pub mod spec;
pub mod tiling;
