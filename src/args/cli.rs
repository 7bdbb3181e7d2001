use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::request::{BodyEncoding, HttpMethod, parse_header};

use super::parsers::{parse_duration_arg, parse_param};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replay an HTTP request with bounded concurrency and convert requests to and from curl commands."
)]
pub struct ApiPostArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML or JSON; defaults to apipost.toml / apipost.json)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to debug unless APIPOST_LOG/RUST_LOG is set)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Send a request repeatedly and print the last response with a report
    Run(RunArgs),
    /// Print the request described by a curl command as JSON
    Decode(DecodeArgs),
    /// Print the curl command for a request
    Encode(RequestArgs),
}

/// Request description shared by `run` and `encode`. Flags given next to
/// `--curl`/`--curl-file` override the decoded values.
#[derive(Debug, Args, Clone, Default)]
pub struct RequestArgs {
    /// Target URL
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// HTTP method (defaults to GET, or the curl command's method)
    #[arg(long, short = 'X', ignore_case = true)]
    pub method: Option<HttpMethod>,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Body params in 'key=value' format (repeatable)
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Upload field in 'key=path[;path...]' format
    #[arg(long = "file-param", value_parser = parse_param)]
    pub file_param: Option<(String, String)>,

    /// Raw request body
    #[arg(long, short = 'd')]
    pub body: Option<String>,

    /// Body encoding (json, form-data, raw)
    #[arg(long = "body-type", ignore_case = true)]
    pub body_type: Option<BodyEncoding>,

    /// Start from a curl command
    #[arg(long, conflicts_with = "curl_file")]
    pub curl: Option<String>,

    /// Start from a file containing a curl command
    #[arg(long = "curl-file")]
    pub curl_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Number of attempts (falls back to 1 when not a positive number)
    #[arg(long = "repeat", short = 'n', default_value = "1")]
    pub repeat: String,

    /// Attempts in flight at once (falls back to 1 when not a positive number)
    #[arg(long = "concurrency", short = 'c', default_value = "1")]
    pub concurrency: String,

    /// Pause in milliseconds each worker takes after an attempt
    #[arg(long = "delay", default_value = "0")]
    pub delay: String,

    /// Indent JSON responses
    #[arg(long)]
    pub pretty: bool,

    /// Show the response body as hex
    #[arg(long)]
    pub hex: bool,

    /// Show only the value at this JSON path (e.g. $.data.items[0])
    #[arg(long = "json-path")]
    pub json_path: Option<String>,

    /// Print response status line and headers
    #[arg(long = "show-headers", short = 'i')]
    pub show_headers: bool,

    /// Request timeout (supports ms/s/m)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Connect timeout (supports ms/s/m)
    #[arg(long = "connect-timeout", value_parser = parse_duration_arg)]
    pub connect_timeout: Option<Duration>,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// User-Agent header value (empty disables it)
    #[arg(long = "user-agent", short = 'A')]
    pub user_agent: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct DecodeArgs {
    /// Curl command text
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    pub curl: Option<String>,

    /// Read the curl command from a file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}
