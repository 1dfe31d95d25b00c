//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password accounts, email verification and password reset
//! - `backend` - Mock order, address and coupon API with simulated latency
//! - `catalog` - The in-memory product catalog
//! - `fixtures` - Seed data for the demo account and coupons
//! - `pricing` - Cart and checkout totals

pub mod auth;
pub mod backend;
pub mod catalog;
pub mod fixtures;
pub mod pricing;

pub use auth::{AuthError, AuthService, Registration};
pub use backend::{BackendError, MockBackend, OrderRequest};
pub use catalog::{Catalog, StockSummary};
pub use pricing::OrderTotals;
