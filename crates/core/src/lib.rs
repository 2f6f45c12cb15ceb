//! Ecwid Headless Core - Shared types library.
//!
//! This crate provides the storefront primitives shared by the adaptation
//! layer and its HTTP surface:
//! - [`Money`] and [`CurrencyCode`] for decimal prices
//! - [`VariantId`] and [`SelectedOption`] for the composite variant key
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows the variant-key encoding to be tested in
//! isolation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
