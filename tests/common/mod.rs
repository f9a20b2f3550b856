//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use httplog::config::HttpLogConfig;
use httplog::http::HttpServer;
use httplog::observability::LogFn;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Lines the JSON strategy writes start with this.
#[allow(dead_code)]
pub const JSON_LINE_PREFIX: &str = "{\"type\": \"HTTP_REQUEST\"";

/// In-process server on an ephemeral port. Dropping the sender stops it.
#[allow(dead_code)]
pub async fn start_server(log_fns: Vec<LogFn>) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = HttpServer::new(HttpLogConfig::default(), log_fns);
    tokio::spawn(async move {
        let _ = server
            .run_until(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    (addr, tx)
}

/// Poll until something accepts connections on `addr`.
#[allow(dead_code)]
pub async fn wait_for_listener(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("nothing listening on {}", addr);
}

/// Client that ignores proxy settings from the environment.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
