//! Conversion between curl command text and [`Request`](crate::request::Request).
mod decode;
mod encode;
mod tokens;


pub use decode::decode;
pub use encode::{encode, quote};
