//! Persistence and application services for the Bazaar engine.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;
