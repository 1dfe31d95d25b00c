//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers and records for the storefront
//! domain.

pub mod address;
pub mod cart;
pub mod coupon;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod shipping;
pub mod status;
pub mod theme;
pub mod user;
pub mod verification;

pub use address::{Address, AddressType, NewAddress};
pub use cart::{Cart, CartItem, MAX_LINE_QUANTITY, Wishlist, WishlistItem};
pub use coupon::{Coupon, CouponCategory, CouponError, CouponFilter, CouponSort, DiscountKind};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderLine, ShippingAddress};
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductCategory, ProductSort, StockStatus};
pub use shipping::{DeliveryEstimate, ShippingError, ShippingMethod, ShippingZone};
pub use status::{OrderStatus, TransitionError};
pub use theme::Theme;
pub use user::{User, UserPatch};
pub use verification::{ResendCountdown, VerificationCode, VerificationError};
