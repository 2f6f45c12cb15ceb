//! Ecwid headless storefront library.
//!
//! Adapts the Ecwid REST and storefront APIs to a headless-commerce data
//! model: catalog reads with tagged response caching, session-backed cart
//! actions, and a webhook that revalidates cached data.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod config;
pub mod ecwid;
pub mod error;
pub mod middleware;
pub mod revalidate;
pub mod routes;
pub mod state;
