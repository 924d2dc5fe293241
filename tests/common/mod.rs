//! Shared utilities for integration tests.

use std::net::SocketAddr;

use giga::{Engine, EngineError, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// An engine serving on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), EngineError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Bind 127.0.0.1:0 and serve `engine` until `shutdown` is triggered.
pub async fn spawn(engine: Engine) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.wait();

    let handle = tokio::spawn(async move { engine.serve("test", listener, signal).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
