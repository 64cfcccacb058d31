//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;

use chat_proxy::config::ProxyConfig;
use chat_proxy::lifecycle::{shutdown, Shutdown};
use chat_proxy::upstream::Credential;
use chat_proxy::HttpServer;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// API key used by every test that configures one.
#[allow(dead_code)]
pub const TEST_KEY: &str = "AIza-integration-secret";

/// Path the proxy calls for the default model.
#[allow(dead_code)]
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// A proxy running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn chat_url(&self) -> String {
        self.url("/api/chat")
    }

    /// Trigger graceful shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Config pointing at `upstream_base`, with an optional key and static root.
#[allow(dead_code)]
pub fn config_for(upstream_base: &str, key: Option<&str>, static_root: Option<&Path>) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.base_url = upstream_base.to_string();
    config.upstream.api_key = key.map(Credential::new);
    if let Some(root) = static_root {
        config.static_files.root = root.display().to_string();
    }
    config
}

/// Boot the real server (reqwest upstream client included).
pub async fn spawn_server(config: ProxyConfig) -> TestServer {
    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("server should build");
    let shutdown = Shutdown::new();
    let stop = shutdown::wait_for(shutdown.subscribe());

    let handle = tokio::spawn(async move {
        server.run(listener, stop).await.expect("server error");
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
