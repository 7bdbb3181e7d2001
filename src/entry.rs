use clap::Parser;
use tracing::error;

use crate::app::{run_decode, run_encode, run_request};
use crate::args::{ApiPostArgs, Command};
use crate::config::{CliOverrides, Settings, load_config, resolve_settings};
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let args = ApiPostArgs::parse();

    crate::logger::init_logging(args.verbose, args.no_color);

    let settings = resolve(&args)?;
    let outcome = match &args.command {
        Command::Run(run_args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_request(run_args, &settings))
        }
        Command::Decode(decode_args) => run_decode(decode_args, &settings),
        Command::Encode(request_args) => run_encode(request_args, &settings),
    };
    if let Err(err) = &outcome {
        error!("{}", err.diagnostic());
    }
    outcome
}

fn resolve(args: &ApiPostArgs) -> AppResult<Settings> {
    let config = load_config(args.config.as_deref())?;
    let overrides = match &args.command {
        Command::Run(run_args) => CliOverrides {
            timeout: run_args.timeout,
            connect_timeout: run_args.connect_timeout,
            insecure: run_args.insecure,
            user_agent: run_args.user_agent.clone(),
            pretty: run_args.pretty,
            hex: run_args.hex,
        },
        Command::Decode(_) | Command::Encode(_) => CliOverrides::default(),
    };
    resolve_settings(config.as_ref(), &overrides)
}
