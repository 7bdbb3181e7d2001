use crate::http::HttpResponse;
use crate::metrics::RunReport;
use crate::response::{ProcessOptions, process};

/// Formats the last response followed by the run report.
pub(crate) fn render_run(
    response: &HttpResponse,
    report: &RunReport,
    options: &ProcessOptions,
    show_headers: bool,
) -> String {
    let mut sections = Vec::with_capacity(3);
    if show_headers {
        sections.push(format!("{}\n{}", response.status_info, response.header_info.trim_end()));
    }
    sections.push(process(response, options));
    sections.push(report.summary_lines().join("\n"));
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn response() -> HttpResponse {
        HttpResponse {
            status: 200,
            status_info: "HTTP/1.1 200 OK  cost: 3 ms".to_owned(),
            header_info: "content-type: application/json\n".to_owned(),
            data: r#"{"ok":true}"#.to_owned(),
            length: 11,
        }
    }

    fn report() -> RunReport {
        let mut histogram = IndexMap::new();
        histogram.insert(r#"{"ok":true}"#.to_owned(), 2);
        RunReport {
            elapsed_millis: 12,
            success_count: 2,
            total_count: 2,
            response_histogram: histogram,
            ..RunReport::default()
        }
    }

    #[test]
    fn render_includes_body_and_report() -> Result<(), String> {
        let text = render_run(&response(), &report(), &ProcessOptions::default(), false);
        if !text.starts_with(r#"{"ok":true}"#) {
            return Err(format!("Body should come first: {}", text));
        }
        for needle in ["success/total: 2/2", "resp len: 11  num: 2"] {
            if !text.contains(needle) {
                return Err(format!("Missing {:?} in {}", needle, text));
            }
        }
        if text.contains("content-type") {
            return Err("Headers should be hidden by default".to_owned());
        }
        Ok(())
    }

    #[test]
    fn render_with_headers_leads_with_status() -> Result<(), String> {
        let text = render_run(&response(), &report(), &ProcessOptions::default(), true);
        if !text.starts_with("HTTP/1.1 200 OK  cost: 3 ms\ncontent-type: application/json\n\n") {
            return Err(format!("Unexpected header section: {}", text));
        }
        Ok(())
    }
}
