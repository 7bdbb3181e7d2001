use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, HttpError};
use crate::http::{APPLICATION_URL_ENCODE, BodyDecoding, HttpCall, HttpCapability, HttpResponse};
use crate::metrics::{ReportAggregator, RunReport};
use crate::request::{BodyEncoding, Request, has_header, validate_url};

use super::RunConfig;

type AttemptResult = (u64, Duration, AppResult<HttpResponse>);

/// Replays one request through an [`HttpCapability`].
#[derive(Clone)]
pub struct BatchRunner {
    capability: Arc<dyn HttpCapability>,
    decoding: BodyDecoding,
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("decoding", &self.decoding)
            .finish_non_exhaustive()
    }
}

/// Request headers with caller overrides applied (override keys replace
/// request keys regardless of case). Form requests get an urlencoded
/// `Content-Type` unless one is already set.
#[must_use]
pub fn effective_headers(
    request: &Request,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut headers = request.headers.clone();
    for (key, value) in overrides {
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
        headers.insert(key.clone(), value.clone());
    }
    if request.body_encoding == BodyEncoding::FormData && !has_header(&headers, "content-type") {
        headers.insert("Content-Type".to_owned(), APPLICATION_URL_ENCODE.to_owned());
    }
    headers
}

impl BatchRunner {
    #[must_use]
    pub fn new(capability: Arc<dyn HttpCapability>) -> Self {
        Self {
            capability,
            decoding: BodyDecoding::Text,
        }
    }

    #[must_use]
    pub fn with_decoding(mut self, decoding: BodyDecoding) -> Self {
        self.decoding = decoding;
        self
    }

    /// Runs `config.repeat_count` attempts with at most `config.concurrency`
    /// in flight. Each worker waits `config.delay_millis` after its attempt
    /// before taking the next one.
    ///
    /// Returns the response of the last submitted attempt with the report.
    /// The first transport error ends the run; attempts already in flight are
    /// detached and left to finish on their own.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an implausible URL (before any network
    /// activity) or the first transport error raised by an attempt.
    pub async fn run(
        &self,
        request: &Request,
        config: &RunConfig,
        header_overrides: &BTreeMap<String, String>,
    ) -> AppResult<(HttpResponse, RunReport)> {
        validate_url(&request.url).map_err(AppError::validation)?;

        let call = Arc::new(HttpCall::from_request(
            request,
            effective_headers(request, header_overrides),
        ));
        let repeat = config.repeat_count.max(1);
        let last_index = repeat.saturating_sub(1);
        let delay = Duration::from_millis(config.delay_millis);
        let permits = Arc::new(Semaphore::new(
            config.concurrency.clamp(1, Semaphore::MAX_PERMITS),
        ));
        let mut aggregator = ReportAggregator::new().map_err(AppError::metrics)?;
        let mut attempts: JoinSet<AttemptResult> = JoinSet::new();
        let mut last_response = None;

        info!(
            "Running {} {} x{} (concurrency {}, delay {} ms, {})",
            request.method,
            request.url,
            repeat,
            config.concurrency,
            config.delay_millis,
            call.label()
        );

        let started = Instant::now();
        let mut submitted: u64 = 0;
        while submitted < repeat {
            let step = tokio::select! {
                biased;
                Some(joined) = attempts.join_next() => {
                    settle(joined, last_index, &mut aggregator, &mut last_response)
                }
                permit = Arc::clone(&permits).acquire_owned() => {
                    match permit {
                        Ok(permit) => {
                            self.submit(&mut attempts, submitted, &call, delay, permit);
                            submitted = submitted.saturating_add(1);
                            Ok(())
                        }
                        Err(err) => {
                            debug!("Semaphore closed: {}", err);
                            Err(AppError::http(HttpError::LimiterClosed))
                        }
                    }
                }
            };
            if let Err(err) = step {
                attempts.detach_all();
                return Err(err);
            }
        }

        while let Some(joined) = attempts.join_next().await {
            if let Err(err) = settle(joined, last_index, &mut aggregator, &mut last_response) {
                attempts.detach_all();
                return Err(err);
            }
        }

        debug!(
            "Settled {}/{} attempts",
            aggregator.total_count(),
            repeat
        );
        let report = aggregator.finish(started.elapsed());
        info!(
            "Run finished in {} ms: {}/{} succeeded, {} distinct responses",
            report.elapsed_millis,
            report.success_count,
            report.total_count,
            report.response_histogram.len()
        );
        let response = last_response.ok_or_else(|| AppError::http(HttpError::NoResponse))?;
        Ok((response, report))
    }

    fn submit(
        &self,
        attempts: &mut JoinSet<AttemptResult>,
        index: u64,
        call: &Arc<HttpCall>,
        delay: Duration,
        permit: OwnedSemaphorePermit,
    ) {
        let capability = Arc::clone(&self.capability);
        let call = Arc::clone(call);
        let decoding = self.decoding;
        attempts.spawn(async move {
            let begun = Instant::now();
            let outcome = capability.execute(&call, decoding).await;
            let latency = begun.elapsed();
            if !delay.is_zero() {
                sleep(delay).await;
            }
            drop(permit);
            (index, latency, outcome)
        });
    }
}

fn settle(
    joined: Result<AttemptResult, JoinError>,
    last_index: u64,
    aggregator: &mut ReportAggregator,
    last_response: &mut Option<HttpResponse>,
) -> AppResult<()> {
    let (index, latency, outcome) =
        joined.map_err(|err| AppError::http(HttpError::AttemptAborted { source: err }))?;
    let response = outcome.inspect_err(|err| warn!("Attempt {} failed: {}", index, err))?;
    debug!(
        "Attempt {} -> {} in {} ms",
        index,
        response.status,
        latency.as_millis()
    );
    aggregator.record(&response, latency);
    if index == last_index {
        *last_response = Some(response);
    }
    Ok(())
}
