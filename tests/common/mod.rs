#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

pub const PHRASE: &str = "Komunikat dot. pobierania krwi w grupie AB +";

const CONFIG_VARS: [&str; 18] = [
    "TARGET_URL",
    "TEXT_TO_CHECK",
    "PREV_STATUS_PATH",
    "FLAG_PATH",
    "CHECK_PROFILE",
    "CHECK_CANONICAL",
    "CHECK_CONTENT",
    "FOLLOW_REDIRECTS",
    "MAX_HOPS",
    "REQUEST_TIMEOUT_SECS",
    "RETRY_ATTEMPTS",
    "RETRY_DELAY_MS",
    "FALLBACK_URLS",
    "TRACK_STATE",
    "TEXT_SIGN",
    "TEXT_ABBREVIATION",
    "VIGIL_CONFIG",
    "RUST_LOG",
];

#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![],
            body: body.into(),
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self {
            status,
            headers: vec![("Location".to_string(), location.to_string())],
            body: String::new(),
        }
    }

    pub fn json(body: &Value) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }
}

/// Minimal HTTP/1.1 fixture server; routes can be swapped between runs.
pub struct FixtureServer {
    pub base: String,
    routes: Arc<Mutex<HashMap<String, Reply>>>,
}

impl FixtureServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        let port = listener.local_addr().expect("local addr").port();
        let routes: Arc<Mutex<HashMap<String, Reply>>> = Arc::default();
        let shared = routes.clone();

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &shared);
            }
        });

        Self {
            base: format!("http://127.0.0.1:{}", port),
            routes,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn route(&self, path: &str, reply: Reply) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(path.to_string(), reply);
    }
}

fn serve(stream: TcpStream, routes: &Mutex<HashMap<String, Reply>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {}
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    let reply = routes
        .lock()
        .expect("routes lock")
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Reply::new(404, "not found"));

    let mut head = format!(
        "HTTP/1.1 {} Fixture\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.body.len()
    );
    if !reply
        .headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
    {
        head.push_str("Content-Type: text/html; charset=utf-8\r\n");
    }
    for (k, v) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", k, v));
    }
    head.push_str("\r\n");

    let mut stream = stream;
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(reply.body.as_bytes());
    let _ = stream.flush();
}

/// An address nobody listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let port = listener.local_addr().expect("free port addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone", port)
}

pub fn html_page(canonical: Option<&str>, body: &str) -> String {
    let link = canonical
        .map(|c| format!(r#"<link rel="canonical" href="{}">"#, c))
        .unwrap_or_default();
    format!(
        "<!doctype html><html><head><title>Komunikat</title>{}</head><body>{}</body></html>",
        link, body
    )
}

pub struct TestEnv {
    _tmp: TempDir,
    pub dir: PathBuf,
    pub state_path: PathBuf,
    pub flag_path: PathBuf,
    pub server: FixtureServer,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().to_path_buf();
        Self {
            state_path: dir.join("state/prev_status.json"),
            flag_path: dir.join("status_changed.flag"),
            dir,
            _tmp: tmp,
            server: FixtureServer::start(),
        }
    }

    /// Binary with a scrubbed environment pointing state/flag into the temp dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("vigil");
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.dir)
            .env("PREV_STATUS_PATH", &self.state_path)
            .env("FLAG_PATH", &self.flag_path)
            .env("RETRY_DELAY_MS", "0")
            .env("REQUEST_TIMEOUT_SECS", "5");
        cmd
    }

    pub fn check(&self, target: &str, extra_env: &[(&str, &str)]) -> Command {
        let mut cmd = self.cmd();
        cmd.env("TARGET_URL", target);
        for (k, v) in extra_env {
            cmd.env(k, v);
        }
        cmd
    }

    /// Run a JSON check and return (exit code, parsed stdout).
    pub fn check_json(&self, target: &str, extra_env: &[(&str, &str)]) -> (i32, Value) {
        let out = self
            .check(target, extra_env)
            .arg("--json")
            .output()
            .expect("run vigil");
        let code = out.status.code().expect("exit code");
        let json = serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
            panic!(
                "invalid json output ({}): stdout={} stderr={}",
                e,
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            )
        });
        (code, json)
    }

    pub fn seed_state(&self, found: bool) {
        fs::create_dir_all(self.state_path.parent().expect("state dir")).expect("create state dir");
        fs::write(
            &self.state_path,
            serde_json::json!({
                "found": found,
                "evidence": null,
                "checked_at": "2025-01-01T00:00:00Z"
            })
            .to_string(),
        )
        .expect("seed state");
    }

    pub fn state(&self) -> Value {
        let raw = fs::read_to_string(&self.state_path).expect("read state");
        serde_json::from_str(&raw).expect("state is json")
    }
}
