//! Structured description of one HTTP call.
mod headers;
mod model;
mod validate;


pub use headers::{has_header, parse_header, parse_header_text};
pub use model::{
    BodyEncoding, FILE_PARAM_KEYS, HttpMethod, ParamRow, ParamValue, Request, split_file_paths,
};
pub use validate::{MIN_SCHEMELESS_URL_LEN, validate_url};
