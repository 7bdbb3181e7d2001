mod support_single;

use std::process::Output;

use support_single::{run_apipost, spawn_echo_server};

fn stdout_of(output: &Output) -> Result<String, String> {
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[test]
fn e2e_run_repeats_and_reports() -> Result<(), String> {
    let (url, _server) = spawn_echo_server()?;
    let output = run_apipost([
        "run",
        "-u",
        &format!("{}/ping", url),
        "-n",
        "6",
        "-c",
        "3",
        "--json-path",
        "$.path",
    ])?;
    let stdout = stdout_of(&output)?;
    if !stdout.starts_with("/ping") {
        return Err(format!("Expected extracted path first: {}", stdout));
    }
    for needle in ["success/total: 6/6", "num: 6"] {
        if !stdout.contains(needle) {
            return Err(format!("Missing {:?} in {}", needle, stdout));
        }
    }
    Ok(())
}

#[test]
fn e2e_run_from_curl_text() -> Result<(), String> {
    let (url, _server) = spawn_echo_server()?;
    let curl = format!("curl -X POST '{}/form' -d 'a=1&b=2'", url);
    let output = run_apipost(["run", "--curl", curl.as_str(), "--pretty", "-i"])?;
    let stdout = stdout_of(&output)?;
    if !stdout.starts_with("HTTP/1.1 200 OK") {
        return Err(format!("Expected status line first: {}", stdout));
    }
    if !stdout.contains("\"method\": \"POST\"") {
        return Err(format!("Expected pretty POST echo: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_run_rejects_implausible_url() -> Result<(), String> {
    let output = run_apipost(["run", "-u", "abc"])?;
    if output.status.success() {
        return Err("Run against 'abc' should fail".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_encode_prints_curl() -> Result<(), String> {
    let output = run_apipost([
        "encode",
        "-u",
        "https://example.com/items",
        "-X",
        "put",
        "-H",
        "Accept: */*",
    ])?;
    let stdout = stdout_of(&output)?;
    if stdout.trim_end() != "curl -X PUT 'https://example.com/items' -H 'Accept: */*'" {
        return Err(format!("Unexpected curl: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_decode_prints_json() -> Result<(), String> {
    let output = run_apipost([
        "decode",
        "curl 'https://example.com/api' -H 'X-Id: 7' --data-raw '{\"a\":1}'",
    ])?;
    let stdout = stdout_of(&output)?;
    let value: serde_json::Value =
        serde_json::from_str(&stdout).map_err(|err| format!("Invalid JSON {}: {}", stdout, err))?;
    if value.get("url").and_then(serde_json::Value::as_str) != Some("https://example.com/api") {
        return Err(format!("Unexpected url in {}", stdout));
    }
    if value.get("method").and_then(serde_json::Value::as_str) != Some("POST") {
        return Err(format!("Unexpected method in {}", stdout));
    }
    if value.get("body_encoding").and_then(serde_json::Value::as_str) != Some("json") {
        return Err(format!("Unexpected encoding in {}", stdout));
    }
    Ok(())
}
