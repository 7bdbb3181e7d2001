use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::http::{
    APPLICATION_URL_ENCODE, BodyDecoding, HttpCall, HttpCapability, HttpResponse,
};
use crate::request::{BodyEncoding, HttpMethod, Request};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

#[derive(Clone, Copy)]
enum Script {
    /// Always 200 with a fixed body.
    Constant,
    /// Alternates between two bodies.
    Alternate,
    /// Fails on the given (0-based) call.
    FailOn(u64),
    /// Earlier calls take longer; body is the call sequence number.
    SlowFirst(u64),
}

struct ScriptedCapability {
    script: Script,
    latency: Duration,
    calls: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<HttpCall>>,
}

impl ScriptedCapability {
    fn new(script: Script, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            script,
            latency,
            calls: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

fn ok(data: String) -> HttpResponse {
    HttpResponse {
        status: 200,
        status_info: "HTTP/1.1 200 OK".to_owned(),
        header_info: String::new(),
        length: data.len(),
        data,
    }
}

#[async_trait]
impl HttpCapability for ScriptedCapability {
    async fn execute(&self, call: &HttpCall, _decoding: BodyDecoding) -> AppResult<HttpResponse> {
        let seq = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(call.clone());
        }
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let wait = match self.script {
            Script::SlowFirst(total) => self
                .latency
                .saturating_mul(u32::try_from(total.saturating_sub(seq)).unwrap_or(1)),
            Script::Constant | Script::Alternate | Script::FailOn(_) => self.latency,
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.script {
            Script::Constant => Ok(ok("same".to_owned())),
            Script::Alternate => Ok(ok(if seq % 2 == 0 { "even" } else { "odd" }.to_owned())),
            Script::FailOn(target) if target == seq => Err(AppError::http(HttpError::NoResponse)),
            Script::FailOn(_) => Ok(ok("fine".to_owned())),
            Script::SlowFirst(_) => Ok(ok(seq.to_string())),
        }
    }
}

fn get_request() -> Request {
    Request::new(HttpMethod::Get, "https://example.com/ping")
}

#[test]
fn all_successful_attempts_are_counted() -> Result<(), String> {
    run_async_test(async {
        for (repeat, concurrency) in [(1, 1), (5, 1), (7, 3), (4, 10)] {
            let capability = ScriptedCapability::new(Script::Constant, Duration::ZERO);
            let runner = BatchRunner::new(capability.clone());
            let config = RunConfig::new(repeat, concurrency, 0);
            let (response, report) = runner
                .run(&get_request(), &config, &BTreeMap::new())
                .await
                .map_err(|err| err.to_string())?;
            if report.total_count != repeat || report.success_count != repeat {
                return Err(format!("{}x{}: unexpected report {:?}", repeat, concurrency, report));
            }
            if capability.calls() != repeat || response.data != "same" {
                return Err(format!("{}x{}: {} calls", repeat, concurrency, capability.calls()));
            }
        }
        Ok(())
    })
}

#[test]
fn alternating_bodies_produce_two_buckets() -> Result<(), String> {
    run_async_test(async {
        let capability = ScriptedCapability::new(Script::Alternate, Duration::from_millis(1));
        let runner = BatchRunner::new(capability);
        let (_, report) = runner
            .run(&get_request(), &RunConfig::new(9, 4, 0), &BTreeMap::new())
            .await
            .map_err(|err| err.to_string())?;
        let total: u64 = report.response_histogram.values().sum();
        if report.response_histogram.len() != 2 || total != 9 {
            return Err(format!("Unexpected histogram {:?}", report.response_histogram));
        }
        Ok(())
    })
}

#[test]
fn concurrency_is_bounded() -> Result<(), String> {
    run_async_test(async {
        let capability = ScriptedCapability::new(Script::Constant, Duration::from_millis(5));
        let runner = BatchRunner::new(capability.clone());
        runner
            .run(&get_request(), &RunConfig::new(20, 3, 0), &BTreeMap::new())
            .await
            .map_err(|err| err.to_string())?;
        let max = capability.max_in_flight.load(Ordering::SeqCst);
        if max != 3 {
            return Err(format!("Expected 3 attempts in flight at peak, saw {}", max));
        }
        Ok(())
    })
}

#[test]
fn delay_throttles_a_single_worker() -> Result<(), String> {
    run_async_test(async {
        let capability = ScriptedCapability::new(Script::Constant, Duration::ZERO);
        let runner = BatchRunner::new(capability);
        let (_, report) = runner
            .run(&get_request(), &RunConfig::new(4, 1, 20), &BTreeMap::new())
            .await
            .map_err(|err| err.to_string())?;
        if report.elapsed_millis < 60 {
            return Err(format!("Expected >= 60 ms, got {}", report.elapsed_millis));
        }
        Ok(())
    })
}

#[test]
fn last_response_follows_submission_order() -> Result<(), String> {
    run_async_test(async {
        let capability = ScriptedCapability::new(Script::SlowFirst(4), Duration::from_millis(5));
        let runner = BatchRunner::new(capability);
        let (response, report) = runner
            .run(&get_request(), &RunConfig::new(4, 4, 0), &BTreeMap::new())
            .await
            .map_err(|err| err.to_string())?;
        if response.data != "3" {
            return Err(format!("Expected the last submitted attempt, got {}", response.data));
        }
        if report.total_count != 4 {
            return Err(format!("Unexpected report {:?}", report));
        }
        Ok(())
    })
}

#[test]
fn first_transport_error_fails_the_run() -> Result<(), String> {
    run_async_test(async {
        let capability = ScriptedCapability::new(Script::FailOn(2), Duration::from_millis(1));
        let runner = BatchRunner::new(capability.clone());
        match runner
            .run(&get_request(), &RunConfig::new(10, 1, 0), &BTreeMap::new())
            .await
        {
            Err(AppError::Http(HttpError::NoResponse)) => {}
            other => return Err(format!("Expected transport error, got {:?}", other)),
        }
        if capability.calls() >= 10 {
            return Err(format!("Run kept dispatching: {} calls", capability.calls()));
        }
        Ok(())
    })
}

#[test]
fn implausible_urls_never_dispatch() -> Result<(), String> {
    run_async_test(async {
        for url in ["", "abc"] {
            let capability = ScriptedCapability::new(Script::Constant, Duration::ZERO);
            let runner = BatchRunner::new(capability.clone());
            let request = Request::new(HttpMethod::Get, url);
            match runner
                .run(&request, &RunConfig::default(), &BTreeMap::new())
                .await
            {
                Err(AppError::Validation(
                    ValidationError::EmptyUrl | ValidationError::ImplausibleUrl { .. },
                )) => {}
                other => return Err(format!("Expected validation error, got {:?}", other)),
            }
            if capability.calls() != 0 {
                return Err(format!("'{}' dispatched {} calls", url, capability.calls()));
            }
        }
        Ok(())
    })
}

#[test]
fn form_requests_get_urlencoded_type_and_overrides() -> Result<(), String> {
    run_async_test(async {
        let capability = ScriptedCapability::new(Script::Constant, Duration::ZERO);
        let runner = BatchRunner::new(capability.clone());
        let mut request = Request::new(HttpMethod::Post, "https://example.com/form");
        request.body_encoding = BodyEncoding::FormData;
        request.set_text_param("a", "1");
        request
            .headers
            .insert("x-token".to_owned(), "old".to_owned());
        let overrides: BTreeMap<String, String> =
            [("X-Token".to_owned(), "new".to_owned())].into_iter().collect();
        runner
            .run(&request, &RunConfig::default(), &overrides)
            .await
            .map_err(|err| err.to_string())?;

        let seen = capability
            .seen
            .lock()
            .map_err(|err| format!("lock poisoned: {}", err))?;
        let Some(HttpCall::Post {
            headers,
            json: false,
            ..
        }) = seen.first()
        else {
            return Err(format!("Unexpected calls {:?}", *seen));
        };
        let expected: BTreeMap<String, String> = [
            ("Content-Type".to_owned(), APPLICATION_URL_ENCODE.to_owned()),
            ("X-Token".to_owned(), "new".to_owned()),
        ]
        .into_iter()
        .collect();
        if *headers != expected {
            return Err(format!("Unexpected headers {:?}", headers));
        }
        Ok(())
    })
}

#[test]
fn run_config_text_falls_back_per_field() -> Result<(), String> {
    let cases = [
        (("abc", "0", "-5"), RunConfig::new(1, 1, 0)),
        (("12", " 4 ", "250"), RunConfig::new(12, 4, 250)),
        (("", "", ""), RunConfig::default()),
        (("-3", "x", "1.5"), RunConfig::new(1, 1, 0)),
    ];
    for ((repeat, concurrency, delay), expected) in cases {
        let parsed = RunConfig::from_text(repeat, concurrency, delay);
        if parsed != expected {
            return Err(format!(
                "from_text({:?}, {:?}, {:?}) = {:?}, expected {:?}",
                repeat, concurrency, delay, parsed, expected
            ));
        }
    }
    Ok(())
}
