use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::args::{DecodeArgs, RequestArgs, RunArgs};
use crate::config::Settings;
use crate::curl;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{BodyDecoding, ReqwestCapability};
use crate::import::read_curl_file;
use crate::response::ProcessOptions;
use crate::runner::{BatchRunner, RunConfig};

use super::render_run;

pub(crate) async fn run_request(args: &RunArgs, settings: &Settings) -> AppResult<()> {
    let request = args.request.build_request(&settings.import)?;
    let config = RunConfig::from_text(&args.repeat, &args.concurrency, &args.delay);
    let options = ProcessOptions {
        pretty: settings.pretty,
        hex: settings.hex,
        json_path: args.json_path.clone(),
    };
    let decoding = if options.hex {
        BodyDecoding::Hex
    } else {
        BodyDecoding::Text
    };

    let capability = Arc::new(ReqwestCapability::new(&settings.client)?);
    let runner = BatchRunner::new(capability).with_decoding(decoding);
    let (response, report) = runner.run(&request, &config, &BTreeMap::new()).await?;
    info!(
        "Last response: {} ({} bytes)",
        response.status_info, response.length
    );
    println!(
        "{}",
        render_run(&response, &report, &options, args.show_headers)
    );
    Ok(())
}

pub(crate) fn run_decode(args: &DecodeArgs, settings: &Settings) -> AppResult<()> {
    let text = match (&args.curl, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_curl_file(path, &settings.import)?.ok_or_else(|| {
            AppError::validation(ValidationError::ImportRejected {
                path: path.display().to_string(),
            })
        })?,
        (None, None) => return Err(AppError::validation(ValidationError::MissingRequest)),
    };
    let request = curl::decode(&text)?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

pub(crate) fn run_encode(args: &RequestArgs, settings: &Settings) -> AppResult<()> {
    let request = args.build_request(&settings.import)?;
    println!("{}", curl::encode(&request));
    Ok(())
}
