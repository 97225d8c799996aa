//! Scan decision logic: catalog, simulated classifier, validation, rate limit

pub mod catalog;
pub mod classifier;
pub mod rate_limit;
pub mod validate;

pub use rate_limit::RateLimiter;
