//! In-process venue speaking just enough HTTP/1.1 for the REST client.

#![allow(dead_code)]

use btctrader::core::config::ExchangeConfig;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const SECRET_B64: &str = "c2VjcmV0LWtleS1ieXRlcw==";
pub const SECRET_BYTES: &[u8] = b"secret-key-bytes";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Form fields in transmitted order
    pub fn form(&self) -> Vec<(String, String)> {
        self.body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (
                    urlencoding::decode(k).unwrap().into_owned(),
                    urlencoding::decode(v).unwrap().into_owned(),
                )
            })
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.form().into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn nonce(&self) -> u64 {
        self.field("nonce").expect("request has no nonce").parse().unwrap()
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, String),
    Text(u16, String),
    /// Hold the connection open without answering
    Stall,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Self::Json(200, body.to_string())
    }
}

/// Answers requests with scripted replies; the last reply repeats
pub struct MockVenue {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl MockVenue {
    pub async fn start(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let replies = Arc::new(replies);
        let served = Arc::new(AtomicUsize::new(0));

        let captured = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let captured = Arc::clone(&captured);
                let replies = Arc::clone(&replies);
                let served = Arc::clone(&served);
                tokio::spawn(async move {
                    serve(socket, captured, replies, served).await;
                });
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Plain-HTTP config pointing at this venue
    pub fn config(&self, api_key: &str) -> ExchangeConfig {
        ExchangeConfig::new(api_key.to_string(), SECRET_B64.to_string())
            .host("127.0.0.1")
            .port(self.port())
    }

    pub fn read_only_config(&self) -> ExchangeConfig {
        ExchangeConfig::read_only().host("127.0.0.1").port(self.port())
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests().pop().expect("no request captured")
    }
}

impl Drop for MockVenue {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut socket: TcpStream,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    replies: Arc<Vec<Reply>>,
    served: Arc<AtomicUsize>,
) {
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    captured.lock().unwrap().push(request);

    let index = served.fetch_add(1, Ordering::SeqCst).min(replies.len() - 1);
    let (status, content_type, body) = match &replies[index] {
        Reply::Json(status, body) => (*status, "application/json", body.clone()),
        Reply::Text(status, body) => (*status, "text/html", body.clone()),
        Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            return;
        }
    };

    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&buf[body_start..body_end]).into_owned(),
    })
}

/// base64(HMAC-SHA512(secret, body)) computed independently of the crate
pub fn expected_signature(body: &str) -> String {
    use base64::Engine;
    use hmac::{Hmac, Mac};

    let mut mac = Hmac::<sha2::Sha512>::new_from_slice(SECRET_BYTES).unwrap();
    mac.update(body.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}
