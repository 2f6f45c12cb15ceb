//! Core types for the Ecwid headless storefront.

pub mod money;
pub mod variant;

pub use money::{CurrencyCode, Money};
pub use variant::{SelectedOption, VariantId, VariantIdError};
