use std::io::{BufRead, BufReader, Write};
use std::process::{ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

const SERVER_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(200);

#[test]
fn initialize_smoke() {
    let mut server = spawn_server(&[], true);

    send_lsp_message(&mut server, &create_initialize_request());

    let mut reader = BufReader::new(server.stdout.take().expect("stdout"));
    let response = read_response(&mut reader, 1);
    validate_initialize_response(&response);

    shutdown_server(server);
}

#[test]
fn code_lens_and_new_tab_round_trip() {
    let grammar_root = tempfile::tempdir().expect("tempdir");
    let python_dir = grammar_root.path().join("Python");
    std::fs::create_dir_all(&python_dir).expect("create package dir");
    std::fs::write(python_dir.join("Python.sublime-syntax"), "%YAML 1.2\n").expect("write");

    let root_arg = grammar_root.path().to_string_lossy().into_owned();
    let mut server = spawn_server(&["--grammar-dir", &root_arg], false);
    let mut reader = BufReader::new(server.stdout.take().expect("stdout"));

    send_lsp_message(&mut server, &create_initialize_request());
    read_response(&mut reader, 1);
    send_lsp_message(
        &mut server,
        &serde_json::json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} }),
    );
    let ready = read_log_message(&mut reader, "grammar roots:");
    assert!(ready.contains(&root_arg), "roots not reported: {}", ready);
    let found = read_log_message(&mut reader, "grammar resources");
    assert!(found.starts_with("Found"), "unexpected catalog message: {}", found);

    let uri = "file:///tmp/notes.md";
    send_lsp_message(
        &mut server,
        &serde_json::json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": {
                    "uri": uri,
                    "languageId": "markdown",
                    "version": 1,
                    "text": "# Notes\n```python\nprint(1)\n```\n"
                }
            }
        }),
    );
    std::thread::sleep(Duration::from_millis(200));

    send_lsp_message(
        &mut server,
        &serde_json::json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "textDocument/codeLens",
            "params": { "textDocument": { "uri": uri } }
        }),
    );
    let lenses = read_response(&mut reader, 2);
    let lenses = lenses["result"].as_array().expect("code lens array");
    assert_eq!(lenses.len(), 2, "one lens per action: {:?}", lenses);
    assert_eq!(lenses[0]["command"]["title"], "copy");
    assert_eq!(lenses[1]["command"]["title"], "open in tab");
    assert_eq!(lenses[1]["command"]["command"], "codefence.new_tab");
    assert_eq!(lenses[0]["range"]["start"]["line"], 0);

    send_lsp_message(
        &mut server,
        &serde_json::json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "workspace/executeCommand",
            "params": {
                "command": "codefence.new_tab",
                "arguments": lenses[1]["command"]["arguments"].clone()
            }
        }),
    );
    let report = read_response(&mut reader, 3);
    let views = report["result"]["views"].as_array().expect("views");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["content"], "print(1)\n");
    assert_eq!(views[0]["grammar"], "Packages/Python/Python.sublime-syntax");

    send_lsp_message(
        &mut server,
        &serde_json::json!({ "jsonrpc": "2.0", "id": 4, "method": "shutdown" }),
    );
    read_response(&mut reader, 4);
    send_lsp_message(
        &mut server,
        &serde_json::json!({ "jsonrpc": "2.0", "method": "exit" }),
    );

    shutdown_server(server);
}

fn spawn_server(args: &[&str], exit_early: bool) -> std::process::Child {
    let bin_path = std::env::var("CARGO_BIN_EXE_codefence-ls")
        .unwrap_or_else(|_| "target/debug/codefence-ls".to_string());

    let mut command = Command::new(bin_path);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if exit_early {
        command.env("CODEFENCE_LS_TEST_EXIT", "1");
    }

    command.spawn().expect("Failed to spawn language server")
}

fn create_initialize_request() -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "processId": null,
            "rootUri": null,
            "capabilities": {
                "textDocument": {
                    "codeLens": { "dynamicRegistration": false }
                }
            },
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }
    })
}

fn send_lsp_message(child: &mut std::process::Child, message: &Value) {
    let body = message.to_string();
    let request = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);

    let stdin = child
        .stdin
        .as_mut()
        .expect("Child stdin should be available");
    stdin
        .write_all(request.as_bytes())
        .expect("Failed to write request");
    stdin.flush().expect("Failed to flush stdin");
}

/// Read messages until the response with `id`, skipping server notifications
fn read_response(reader: &mut BufReader<ChildStdout>, id: i64) -> Value {
    let start_time = Instant::now();

    loop {
        if start_time.elapsed() > SERVER_TIMEOUT {
            panic!("Timeout waiting for response {}", id);
        }

        let content_length = read_content_length_header(reader);
        let body = read_message_body(reader, content_length);
        let message: Value = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("Invalid JSON response: {}\nBody: {}", e, body));

        if message.get("method").is_none() && message.get("id").and_then(|v| v.as_i64()) == Some(id)
        {
            return message;
        }
    }
}

/// Read messages until a `window/logMessage` containing `needle`
fn read_log_message(reader: &mut BufReader<ChildStdout>, needle: &str) -> String {
    let start_time = Instant::now();

    loop {
        if start_time.elapsed() > SERVER_TIMEOUT {
            panic!("Timeout waiting for log message containing {:?}", needle);
        }

        let content_length = read_content_length_header(reader);
        let body = read_message_body(reader, content_length);
        let message: Value = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("Invalid JSON message: {}\nBody: {}", e, body));

        if message["method"] == "window/logMessage" {
            let text = message["params"]["message"].as_str().unwrap_or_default();
            if text.contains(needle) {
                return text.to_string();
            }
        }
    }
}

fn read_content_length_header(reader: &mut BufReader<ChildStdout>) -> usize {
    let start_time = Instant::now();
    let mut content_length = None;

    loop {
        if start_time.elapsed() > SERVER_TIMEOUT {
            panic!("Timeout waiting for response headers");
        }

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => panic!("Unexpected EOF while reading headers"),
            Ok(_) => {
                if line.trim().is_empty() {
                    if content_length.is_some() {
                        break;
                    }
                    continue;
                }

                if let Some(length_str) = line.strip_prefix("Content-Length:") {
                    content_length = Some(
                        length_str
                            .trim()
                            .parse::<usize>()
                            .expect("Invalid Content-Length header"),
                    );
                }
            }
            Err(e) => panic!("Error reading headers: {}", e),
        }
    }

    content_length.expect("Missing Content-Length header")
}

fn read_message_body(reader: &mut BufReader<ChildStdout>, content_length: usize) -> String {
    let mut body_bytes = vec![0u8; content_length];
    std::io::Read::read_exact(reader, &mut body_bytes).expect("Failed to read response body");

    String::from_utf8(body_bytes).expect("Response body should be valid UTF-8")
}

fn validate_initialize_response(response: &Value) {
    assert_eq!(
        response.get("jsonrpc").and_then(|v| v.as_str()),
        Some("2.0"),
        "Response should have jsonrpc: '2.0'"
    );

    let capabilities = response
        .get("result")
        .and_then(|r| r.get("capabilities"))
        .expect("Result should contain server capabilities");

    assert!(
        capabilities.get("codeLensProvider").is_some(),
        "Should provide code lenses"
    );

    let commands = capabilities["executeCommandProvider"]["commands"]
        .as_array()
        .expect("Should list executable commands");
    assert!(commands.contains(&Value::from("codefence.copy")));
    assert!(commands.contains(&Value::from("codefence.new_tab")));
}

fn shutdown_server(mut child: std::process::Child) {
    drop(child.stdin.take());

    std::thread::sleep(SHUTDOWN_GRACE_PERIOD);

    match child.try_wait() {
        Ok(Some(status)) => {
            if !status.success() {
                eprintln!("Server exited with non-zero status: {:?}", status);
            }
        }
        Ok(None) => {
            eprintln!("Server didn't exit gracefully, forcing termination");
            let _ = child.kill();
            let _ = child.wait();
        }
        Err(e) => panic!("Error checking server status: {}", e),
    }
}
