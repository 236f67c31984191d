// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// API address nothing listens on; connections are refused immediately.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:1/api";

/// Isolated config file and state directory.
pub struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    /// Sandbox whose API is unreachable and never retried.
    pub fn offline() -> Self {
        Self::with_config(&format!(
            "api_base_url = \"{}\"\nmax_attempts = 0\nrequest_timeout_ms = 2000\n",
            UNREACHABLE_API
        ))
    }

    pub fn with_config(content: &str) -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), content).unwrap();
        Sandbox { temp }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.temp.path().join("state")
    }

    /// `tether` pointed at this sandbox.
    pub fn tether(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("tether");
        cmd.env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path())
            .arg("--state-dir")
            .arg(self.state_dir());
        cmd
    }

    /// Run `tether` and return stdout; the command must succeed.
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.tether().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "tether {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Create a channel and return its JSON outcome.
    pub fn create(&self, fields: &[&str]) -> serde_json::Value {
        let mut args = vec!["channels", "create", "-o", "json"];
        for field in fields {
            args.push("-f");
            args.push(field);
        }
        serde_json::from_str(&self.stdout(&args)).unwrap()
    }
}

/// Serve `responses` to successive HTTP connections on an ephemeral port.
///
/// Returns the base URL (`http://127.0.0.1:<port>/api`) and the captured
/// request lines.
pub fn canned_api(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            seen.push(request_line.trim_end().to_string());

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        }
        seen
    });

    (format!("http://127.0.0.1:{}/api", port), handle)
}
