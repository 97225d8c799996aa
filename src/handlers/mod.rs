//! HTTP handlers

pub mod health;
pub mod classify;
pub mod history;

#[cfg(test)]
mod tests;
