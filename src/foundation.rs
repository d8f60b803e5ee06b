pub mod bitmap;
pub mod error;
