pub mod decode;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod upload;
