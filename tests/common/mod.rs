//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// Temporary import workspace plus a scratch area for spreadsheets and images.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("workspace")
    }

    pub fn scratch(&self, rel: &str) -> PathBuf {
        self.dir.path().join("inputs").join(rel)
    }

    pub fn write_records(&self, json: &str) -> PathBuf {
        self.write_input("records.json", json.as_bytes())
    }

    pub fn write_input(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.scratch(rel);
        fs::create_dir_all(path.parent().expect("input parent")).expect("create input dir");
        fs::write(&path, bytes).expect("write input");
        path
    }

    /// Run `cimport <command> --workspace <root> <args...>`.
    pub fn run(&self, command: &str, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cimport"))
            .arg(command)
            .arg("--workspace")
            .arg(self.root())
            .args(args)
            .env_remove("CATALOG_IMPORT_TOKEN")
            .env_remove("RUST_LOG")
            .output()
            .expect("run cimport")
    }

    pub fn run_ok(&self, command: &str, args: &[&str]) -> String {
        let output = self.run(command, args);
        assert!(
            output.status.success(),
            "cimport {command} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_err(&self, command: &str, args: &[&str]) -> String {
        let output = self.run(command, args);
        assert!(
            !output.status.success(),
            "cimport {command} unexpectedly succeeded: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn status_json(&self) -> Value {
        let stdout = self.run_ok("status", &["--json"]);
        serde_json::from_str(&stdout).expect("parse status JSON")
    }
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

/// Entry for `row_index` in `status --json` output.
pub fn entry(status: &Value, row_index: u64) -> Value {
    status["entries"]
        .as_array()
        .expect("entries array")
        .iter()
        .find(|entry| entry["row_index"] == row_index)
        .cloned()
        .unwrap_or_else(|| panic!("no entry for row {row_index}"))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let read = stream.read(&mut chunk).expect("read request");
        if read == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..read]);
        if let Some(header_end) = find(&request, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= header_end + 4 + length {
                break;
            }
        }
    }
    request
}

/// Loopback backend answering one request with a JSON body.
pub struct MockBackend {
    pub api_base: String,
    handle: JoinHandle<Vec<u8>>,
}

impl MockBackend {
    pub fn serve_once(status_line: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).expect("write head");
            stream.write_all(body.as_bytes()).expect("write body");
            request
        });
        Self {
            api_base: format!("http://{addr}"),
            handle,
        }
    }

    /// Wait for the single request and return it as lossy text.
    pub fn request(self) -> String {
        let bytes = self.handle.join().expect("backend thread");
        String::from_utf8_lossy(&bytes).to_string()
    }
}
