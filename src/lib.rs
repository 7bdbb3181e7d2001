//! Core library for the `apipost` CLI.
//!
//! Building blocks for replaying one HTTP request many times with bounded
//! concurrency: the request model, curl command conversion, the batch
//! runner over a pluggable HTTP capability, report aggregation and response
//! post-processing. The `apipost` binary wires them to the command line.
pub mod args;
pub mod config;
pub mod curl;
pub mod error;
pub mod http;
pub mod import;
pub mod metrics;
pub mod request;
pub mod response;
pub mod runner;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
