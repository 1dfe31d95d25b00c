//! Bazaar Core - Domain types and pure storefront logic.
//!
//! This crate provides the types shared by the storefront binary and its
//! tests: users, products, carts, orders, addresses, coupons, shipping
//! estimates and email verification codes.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! access, no HTTP. Anything that needs the current date takes it as an
//! argument so behavior stays deterministic under test.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, statuses and the domain records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
