//! Reshaping of Ecwid responses into storefront types.
//!
//! All functions here are pure: they take provider entities plus the store
//! currency and never perform I/O.

pub mod cart;
pub mod collections;
pub mod products;

pub use cart::{empty_cart, reshape_order, reshape_order_line};
pub use collections::{all_collection, reshape_collection, reshape_collections, reshape_menu};
pub use products::{default_image, reshape_image, reshape_product, reshape_products};
