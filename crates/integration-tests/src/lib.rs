//! End-to-end tests for the Pet Store server.
//!
//! Each test starts its own [`TestServer`] on an ephemeral port with fresh
//! seed data, so tests never observe each other's writes and can run in
//! parallel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pet-store-integration-tests
//! ```

use std::net::SocketAddr;

use pet_store_server::{AppState, app};
use reqwest::Client;
use tokio::{net::TcpListener, task::JoinHandle};

/// A pet store served over real HTTP on `127.0.0.1:<ephemeral>`.
pub struct TestServer {
    addr: SocketAddr,
    client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the app with the launch seed records.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::with_state(AppState::seeded()).await
    }

    /// Serve the app over the given state.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn with_state(state: AppState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("Test server error");
        });

        Self {
            addr,
            client: Client::new(),
            handle,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// HTTP client for talking to this server.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
