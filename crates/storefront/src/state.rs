//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::search::{SearchError, SearchIndex};
use crate::services::{AuthError, AuthService, Catalog, MockBackend};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("search index: {0}")]
    Search(#[from] SearchError),
    #[error("auth service: {0}")]
    Auth(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, mock services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    catalog: Catalog,
    search: SearchIndex,
    backend: MockBackend,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state with the demo catalog and account.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` pool when sessions are persisted to a database
    ///
    /// # Errors
    ///
    /// Returns an error if the search index or demo account cannot be built.
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Result<Self, StateError> {
        let catalog = Catalog::demo();
        let search = SearchIndex::build(&catalog)?;
        let backend = MockBackend::seeded(config.mock_latency, today());
        let auth =
            AuthService::with_demo_account(config.verification_code.clone(), config.mock_latency)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                search,
                backend,
                auth,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the database pool, if sessions are stored in `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the product search index.
    #[must_use]
    pub fn search(&self) -> &SearchIndex {
        &self.inner.search
    }

    /// Get a reference to the mock backend.
    #[must_use]
    pub fn backend(&self) -> &MockBackend {
        &self.inner.backend
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}

/// Today's date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
