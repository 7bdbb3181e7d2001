use std::time::Duration;

use super::*;
use crate::http::HttpResponse;

fn response(status: u16, data: &str) -> HttpResponse {
    HttpResponse {
        status,
        status_info: format!("HTTP/1.1 {}", status),
        header_info: String::new(),
        data: data.to_owned(),
        length: data.len(),
    }
}

#[test]
fn histogram_keeps_first_seen_order() -> Result<(), String> {
    let mut aggregator = ReportAggregator::new().map_err(|err| err.to_string())?;
    for body in ["b", "a", "b", "c", "a", "b"] {
        aggregator.record(&response(200, body), Duration::from_millis(5));
    }
    let report = aggregator.finish(Duration::from_millis(40));
    let order: Vec<(&str, u64)> = report
        .response_histogram
        .iter()
        .map(|(body, count)| (body.as_str(), *count))
        .collect();
    if order != [("b", 3), ("a", 2), ("c", 1)] {
        return Err(format!("Unexpected histogram {:?}", order));
    }
    if report.success_count != 6 || report.total_count != 6 || report.elapsed_millis != 40 {
        return Err(format!("Unexpected counts {:?}", report));
    }
    Ok(())
}

#[test]
fn non_200_responses_are_counted_but_not_successful() -> Result<(), String> {
    let mut aggregator = ReportAggregator::new().map_err(|err| err.to_string())?;
    aggregator.record(&response(200, "ok"), Duration::from_millis(1));
    aggregator.record(&response(201, "created"), Duration::from_millis(1));
    aggregator.record(&response(500, "boom"), Duration::from_millis(1));
    if aggregator.total_count() != 3 {
        return Err(format!("Expected 3 attempts, got {}", aggregator.total_count()));
    }
    let report = aggregator.finish(Duration::ZERO);
    if report.success_count != 1 || report.response_histogram.len() != 1 {
        return Err(format!("Unexpected report {:?}", report));
    }
    Ok(())
}

#[test]
fn latency_summary_tracks_bounds_and_average() -> Result<(), String> {
    let mut aggregator = ReportAggregator::new().map_err(|err| err.to_string())?;
    for ms in [10, 20, 30] {
        aggregator.record(&response(200, "x"), Duration::from_millis(ms));
    }
    let latency = aggregator.finish(Duration::from_millis(60)).latency;
    if latency.min_ms != 10 || latency.max_ms != 30 || latency.avg_ms != 20 {
        return Err(format!("Unexpected latency {:?}", latency));
    }
    if latency.p50_ms != 20 {
        return Err(format!("Unexpected p50 {}", latency.p50_ms));
    }
    Ok(())
}

#[test]
fn empty_report_is_all_zero() -> Result<(), String> {
    let report = ReportAggregator::new()
        .map_err(|err| err.to_string())?
        .finish(Duration::ZERO);
    if report != RunReport::default() {
        return Err(format!("Unexpected report {:?}", report));
    }
    Ok(())
}

#[test]
fn summary_lines_list_each_bucket_by_length() -> Result<(), String> {
    let mut aggregator = ReportAggregator::new().map_err(|err| err.to_string())?;
    aggregator.record(&response(200, "héllo"), Duration::from_millis(1));
    aggregator.record(&response(200, "hi"), Duration::from_millis(1));
    let lines = aggregator.finish(Duration::from_millis(3)).summary_lines();
    if lines.get(1).map(String::as_str) != Some("success/total: 2/2") {
        return Err(format!("Unexpected lines {:?}", lines));
    }
    let details: Vec<&String> = lines.iter().filter(|line| line.contains("resp len")).collect();
    if details.len() != 2 || !details.first().is_some_and(|line| line.contains("resp len: 5 ")) {
        return Err(format!("Unexpected details {:?}", details));
    }
    Ok(())
}
