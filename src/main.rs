mod app;
mod args;
mod config;
mod curl;
mod entry;
mod error;
mod http;
mod import;
mod logger;
mod metrics;
mod request;
mod response;
mod runner;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
