//! Data models

pub mod crop;
pub mod classification;

pub use crop::*;
pub use classification::*;
