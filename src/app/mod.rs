mod commands;
mod output;

pub(crate) use commands::{run_decode, run_encode, run_request};
pub(crate) use output::render_run;
