//! In-process HTTP stub standing in for the Open-Meteo endpoints.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use meteo_tools::open_meteo::OpenMeteoClient;
use meteo_tools::tools::{self, ToolRegistry};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const FORECAST_PATH: &str = "/v1/forecast";
pub const GEOCODING_PATH: &str = "/v1/search";

/// How the stub answers a given path.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, String),
    /// Close the connection without writing a response.
    HangUp,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Self::Json(200, body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self::Json(status, body.to_string())
    }
}

/// A stub server bound to an ephemeral localhost port.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, &routes, &log).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Registry whose client points at this stub.
    pub fn registry(&self) -> ToolRegistry {
        tools::weather_registry(self.client())
    }

    pub fn client(&self) -> OpenMeteoClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        OpenMeteoClient::with_http(
            &format!("http://{}{}", self.addr, FORECAST_PATH),
            &format!("http://{}{}", self.addr, GEOCODING_PATH),
            http,
        )
    }

    /// Request targets (path and query) seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: &HashMap<String, Reply>,
    log: &Mutex<Vec<String>>,
) -> io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let path = target.split('?').next().unwrap_or("/").to_string();
    log.lock().unwrap().push(target);

    let (status, body) = match routes.get(&path) {
        Some(Reply::Json(status, body)) => (*status, body.clone()),
        Some(Reply::HangUp) => return stream.shutdown().await,
        None => (404, String::new()),
    };

    let reason = if status < 400 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Shared buffer that a `tracing` fmt subscriber can write into.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Install a subscriber for the current thread that records into this buffer.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
