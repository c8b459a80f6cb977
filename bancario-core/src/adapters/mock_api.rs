//! Mock banking API server for testing
//!
//! A small scripted HTTP server on a random local port. Tests register a
//! canned response per `(method, path)`; every request is recorded so the
//! test can assert on what was sent. Unscripted routes answer 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A request as received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<JsonValue>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json { status: u16, body: JsonValue },
    Empty { status: u16 },
    /// Echo the request body back with a fresh id under `id_field`
    Created { id_field: String },
}

#[derive(Default)]
struct Shared {
    routes: HashMap<(String, String), Reply>,
    requests: Vec<RecordedRequest>,
}

pub struct MockApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    shared: Arc<Mutex<Shared>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockApiServer {
    /// Start on a random available port
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("mock server address").port();
        listener.set_nonblocking(true).expect("non-blocking listener");

        let running = Arc::new(AtomicBool::new(true));
        let shared = Arc::new(Mutex::new(Shared::default()));
        let running_clone = running.clone();
        let shared_clone = shared.clone();

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let shared = shared_clone.clone();
                        thread::spawn(move || handle_connection(stream, &shared));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            running,
            shared,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: JsonValue) {
        self.route(method, path, Reply::Json { status, body });
    }

    pub fn respond_empty(&self, method: &str, path: &str, status: u16) {
        self.route(method, path, Reply::Empty { status });
    }

    /// Answer 201 with the posted body plus a generated id
    pub fn echo_created(&self, method: &str, path: &str, id_field: &str) {
        self.route(
            method,
            path,
            Reply::Created {
                id_field: id_field.to_string(),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.lock().unwrap().requests.clone()
    }

    fn route(&self, method: &str, path: &str, reply: Reply) {
        self.shared
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), reply);
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    stream.set_nonblocking(false).ok()?;
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    Some((head, data[header_end..].to_vec()))
}

fn handle_connection(mut stream: TcpStream, shared: &Mutex<Shared>) {
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };

    let first_line = head.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, r#"{"detail": "Invalid request"}"#);
        return;
    }

    let method = parts[0].to_string();
    let (path, query) = match parts[1].split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (parts[1].to_string(), None),
    };
    let authorization = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());
    let body_json = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<JsonValue>(&body).ok()
    };

    let reply = {
        let mut shared = shared.lock().unwrap();
        shared.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query,
            authorization,
            body: body_json.clone(),
        });
        shared.routes.get(&(method, path)).cloned()
    };

    match reply {
        Some(Reply::Json { status, body }) => send_response(&mut stream, status, &body.to_string()),
        Some(Reply::Empty { status }) => send_response(&mut stream, status, ""),
        Some(Reply::Created { id_field }) => {
            let mut created = body_json.unwrap_or_else(|| JsonValue::Object(Default::default()));
            if let Some(obj) = created.as_object_mut() {
                obj.insert(id_field, JsonValue::String(Uuid::new_v4().to_string()));
            }
            send_response(&mut stream, 201, &created.to_string());
        }
        None => send_response(&mut stream, 404, r#"{"detail": "Not Found"}"#),
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_starts() {
        let server = MockApiServer::start();
        assert!(server.url().starts_with("http://127.0.0.1:"));
        assert!(server.requests().is_empty());
    }
}
