//! Shared test infrastructure for integration tests.
//!
//! `FixtureServer` is a loopback HTTP/1.1 responder with canned routes that
//! records every request it sees; `run_cbrief` runs the built binary against
//! it with an isolated config directory.
#![allow(dead_code)]

use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

pub const EXECUTION_ID: &str = "exec-it-1";

pub const STAGE_IDS: [&str; 6] = [
    "node_a",
    "node_a_plus",
    "node_b",
    "node_e",
    "node_c",
    "node_d",
];

/// Canned response for one method + path.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn json(method: &'static str, path: &str, status: u16, body: Value) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct FixtureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FixtureServer {
    /// Serve `routes` until the test process exits. Unknown routes get 404.
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture server addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    break;
                };
                // A malformed exchange only affects that one request.
                let _ = handle_connection(stream, &routes, &recorded);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// `METHOD path` for every request, in arrival order.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }
}

fn handle_connection(
    stream: TcpStream,
    routes: &[Route],
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    recorded.lock().expect("requests lock").push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let (status, payload) = routes
        .iter()
        .find(|route| route.method == method && route.path == path)
        .map(|route| (route.status, route.body.clone()))
        .unwrap_or((404, r#"{"detail":"Not Found"}"#.to_string()));

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        reason(status),
        payload.len()
    )?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Run the `cbrief` binary with a scratch config dir and no env overrides.
pub fn run_cbrief(args: &[&str]) -> Output {
    let config_home = TempDir::new().expect("config home");
    Command::new(env!("CARGO_BIN_EXE_cbrief"))
        .args(args)
        .env_remove("CBRIEF_BASE_URL")
        .env_remove("CBRIEF_LOG")
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .output()
        .expect("run cbrief")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).expect("write fixture json");
    path.display().to_string()
}

fn ok(message: &str, data: Value) -> Value {
    serde_json::json!({ "success": true, "message": message, "data": data })
}

/// Results envelope, including a top-level field the client does not model.
pub fn results_body() -> Value {
    let mut body = ok(
        "Results ready",
        serde_json::json!({
            "execution_id": EXECUTION_ID,
            "status": "completed",
            "research_insights": {
                "key_insights": ["Lead with durability"],
                "positioning_statement": "The boot that outlasts the trail."
            }
        }),
    );
    body["timestamp"] = Value::from("2025-01-01T00:00:00Z");
    body
}

pub fn results_path() -> String {
    format!("/api/v1/workflow/{EXECUTION_ID}/results")
}

/// Routes for a healthy service where every stage and the results fetch
/// succeed.
pub fn happy_routes() -> Vec<Route> {
    let mut routes = vec![
        Route::json("GET", "/health", 200, serde_json::json!({ "status": "ok" })),
        Route::json(
            "POST",
            "/api/v1/workflow/start",
            200,
            ok(
                "Workflow started",
                serde_json::json!({ "execution_id": EXECUTION_ID }),
            ),
        ),
        Route::json("GET", &results_path(), 200, results_body()),
    ];
    for stage in STAGE_IDS {
        let data = if stage == "node_a" {
            serde_json::json!({ "pages_scraped": 3, "total_pages": 5 })
        } else {
            serde_json::json!({ "node": stage })
        };
        routes.push(Route::json(
            "POST",
            &stage_path(stage),
            200,
            ok(&format!("{stage} done"), data),
        ));
    }
    routes
}

pub fn stage_path(stage: &str) -> String {
    format!("/api/v1/workflow/{EXECUTION_ID}/node/{stage}")
}

/// Replace the route for `method path`, keeping the others.
pub fn with_route(mut routes: Vec<Route>, route: Route) -> Vec<Route> {
    routes.retain(|existing| !(existing.method == route.method && existing.path == route.path));
    routes.push(route);
    routes
}

pub fn without_route(mut routes: Vec<Route>, method: &str, path: &str) -> Vec<Route> {
    routes.retain(|existing| !(existing.method == method && existing.path == path));
    routes
}
