//! Display-side transformations applied to a response body.
mod json_path;
mod process;
mod unicode;


pub use json_path::{PathSegment, extract, parse_path};
pub use process::{MAX_SHOW_LENGTH, ProcessOptions, process};
pub use unicode::decode_unicode_escapes;
