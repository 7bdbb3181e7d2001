//! Single-exchange HTTP capability used by the batch runner.
mod call;
mod client;


pub use call::{APPLICATION_URL_ENCODE, HttpCall};
pub use client::{BodyDecoding, ClientSettings, HttpCapability, HttpResponse, ReqwestCapability};
