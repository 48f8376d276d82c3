//! Integration tests for Mercato.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mercato-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `codes` - Generated code formats and validators
//! - `checkout` - Cart totals and promo application
//! - `wishlist` - Wishlist persistence across restarts
//! - `api` - REST client and session against [`MockBackend`]
//!
//! [`MockBackend`] is a minimal HTTP/1.1 server on a loopback port that
//! replies with canned responses and records every request it sees.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mercato_storefront::StorefrontConfig;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as the mock backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON; `Null` if it is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Canned reply for one route.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    response: MockResponse,
}

/// Loopback HTTP server standing in for the Mercato backend.
///
/// Paths are matched exactly, including the `/api` prefix. Unmatched
/// requests get a 404.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Bind a loopback port and start serving `routes`.
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    pub async fn start(routes: Vec<(&str, &str, MockResponse)>) -> Self {
        let routes: Arc<Vec<Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(method, path, response)| Route {
                    method: method.to_string(),
                    path: path.to_string(),
                    response,
                })
                .collect(),
        );
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("bind loopback: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("local addr: {e}"));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let _ = serve(stream, &routes, &recorded).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// API base URL, e.g. `http://127.0.0.1:49152/api`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client config pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the generated config is rejected.
    #[must_use]
    pub fn config(&self, data_dir: &Path, access_token: Option<&str>) -> StorefrontConfig {
        let base_url = self.base_url();
        let data_dir = data_dir.to_string_lossy().into_owned();
        let token = access_token.map(str::to_string);
        StorefrontConfig::from_lookup(move |key| match key {
            "MERCATO_API_URL" => Some(base_url.clone()),
            "MERCATO_DATA_DIR" => Some(data_dir.clone()),
            "MERCATO_ACCESS_TOKEN" => token.clone(),
            _ => None,
        })
        .unwrap_or_else(|e| panic!("mock config: {e}"))
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received for `method` and `path`.
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    stream: TcpStream,
    routes: &[Route],
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body).await?;

    let response = routes
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map_or_else(
            || MockResponse::json(404, &serde_json::json!({ "error": "not found" })),
            |r| r.response.clone(),
        );

    recorded
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method,
            path,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

    let mut out = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(&response.body);

    let mut stream = reader.into_inner();
    stream.write_all(out.as_bytes()).await?;
    stream.shutdown().await
}

/// Fresh, not yet created directory under the system temp dir.
#[must_use]
pub fn temp_data_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mercato-{label}-{}", uuid::Uuid::new_v4()))
}

/// Delete a directory from [`temp_data_dir`], whether or not anything was
/// written to it.
///
/// # Panics
///
/// Panics if the directory exists but cannot be removed.
pub fn remove_data_dir(dir: &Path) {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => panic!("failed to remove {}: {e}", dir.display()),
    }
}
