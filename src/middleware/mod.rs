//! Request extractors

pub mod client;
pub mod extract;
