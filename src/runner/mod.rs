//! Repeated execution of one request under bounded concurrency.
mod batch;
mod config;

#[cfg(test)]
mod tests;

pub use batch::{BatchRunner, effective_headers};
pub use config::RunConfig;
