//! End-to-end test harness for the Bazaar storefront.
//!
//! [`TestServer::spawn`] starts the real router on an ephemeral port with an
//! in-memory session store, no simulated latency and rate limiting off. The
//! client keeps cookies (one browser session per server) and does not follow
//! redirects so tests can assert on `Location`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use bazaar_storefront::{build_router, config::StorefrontConfig, state::AppState};
use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect::Policy};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

pub use bazaar_storefront::services::fixtures::{DEMO_EMAIL, DEMO_PASSWORD};

/// Error starting the test server.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A running storefront plus a cookie-keeping client.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub config: StorefrontConfig,
}

impl TestServer {
    /// Start a storefront on `127.0.0.1:0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state, listener or client cannot be created.
    pub async fn spawn() -> Result<Self, BoxError> {
        let config = StorefrontConfig {
            port: 0,
            mock_latency: Duration::ZERO,
            rate_limit_enabled: false,
            ..StorefrontConfig::default()
        };

        let state = AppState::new(config.clone(), None)?;
        let app = build_router(state, MemoryStore::default());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let service = app.into_make_service_with_connect_info::<SocketAddr>();
            axum::serve(listener, service).await.ok();
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            client: browser()?,
            config,
        })
    }

    /// Another visitor on the same server (separate cookie jar).
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new_visitor(&self) -> reqwest::Result<Self> {
        Ok(Self {
            base_url: self.base_url.clone(),
            client: browser()?,
            config: self.config.clone(),
        })
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    ///
    /// # Errors
    ///
    /// Returns the transport error, if any.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(path)).send().await
    }

    /// POST a form to a path.
    ///
    /// # Errors
    ///
    /// Returns the transport error, if any.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Result<Response> {
        self.client.post(self.url(path)).form(form).send().await
    }

    /// Sign in as the demo account.
    ///
    /// # Errors
    ///
    /// Returns the transport error, if any.
    pub async fn login_demo(&self) -> reqwest::Result<Response> {
        self.post("/login", &[("email", DEMO_EMAIL), ("password", DEMO_PASSWORD)])
            .await
    }

    /// The literal verification code the server accepts.
    #[must_use]
    pub fn verification_code(&self) -> &str {
        self.config.verification_code.as_str()
    }
}

/// A cookie-keeping client that does not follow redirects.
fn browser() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION)?.to_str().ok()
}

/// Whether a response is a redirect to exactly `path`.
#[must_use]
pub fn redirects_to(response: &Response, path: &str) -> bool {
    response.status().is_redirection() && location(response) == Some(path)
}

/// Assert the status and return the body.
///
/// # Panics
///
/// Panics when the status differs or the body cannot be read.
pub async fn body(response: Response, expected: StatusCode) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    assert_eq!(status, expected, "unexpected status; body:\n{text}");
    text
}
