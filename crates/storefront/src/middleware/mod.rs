//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (records the ID on the span, echoes it in the response)
//! 4. CSP nonce (per-request nonce for inline scripts)
//! 5. Security headers (CSP with nonce, framing, referrer, permissions)
//! 6. Session layer (tower-sessions, memory or `PostgreSQL` store)
//! 7. Rate limiting on auth routes (governor)

pub mod auth;
pub mod csp;
pub mod page;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalUser, RequireUser, safe_redirect_target};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use page::PageContext;
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
