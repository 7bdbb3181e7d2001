//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod request;


pub use cli::{ApiPostArgs, Command, DecodeArgs, RequestArgs, RunArgs};
