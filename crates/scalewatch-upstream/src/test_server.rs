//! Canned-response HTTP listener for the transport tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Response served for every request whose path starts with `prefix`.
#[derive(Clone)]
pub struct Route {
    prefix: &'static str,
    status: u16,
    body: String,
}

pub fn route(prefix: &'static str, status: u16, body: impl Into<String>) -> Route {
    Route {
        prefix,
        status,
        body: body.into(),
    }
}

pub struct TestServer {
    listener: Option<TcpListener>,
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Bind on an ephemeral loopback port. Nothing is answered until
    /// [`TestServer::serve`] is called.
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Self {
            listener: Some(listener),
            addr,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The Mesos PID form of this server's address.
    pub fn pid(&self) -> String {
        format!("master@{}", self.addr)
    }

    pub fn serve(&mut self, routes: Vec<Route>) {
        let listener = self.listener.take().expect("serve called twice");
        let requests = self.requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let requests = requests.clone();
                tokio::spawn(async move { answer(stream, &routes, &requests).await });
            }
        });
    }

    /// Lowercased request heads in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose path starts with `prefix`.
    pub fn hits(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|head| request_path(head).starts_with(prefix))
            .count()
    }
}

async fn answer(mut stream: TcpStream, routes: &[Route], requests: &Mutex<Vec<String>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head).to_lowercase();
    let path = request_path(&head).to_string();
    requests.lock().unwrap().push(head);

    let (status, body) = routes
        .iter()
        .find(|r| path.starts_with(r.prefix))
        .map(|r| (r.status, r.body.as_str()))
        .unwrap_or((404, "{}"));
    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn request_path(head: &str) -> &str {
    head.split_whitespace().nth(1).unwrap_or("")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
