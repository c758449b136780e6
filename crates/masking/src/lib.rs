#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Wrapper types and traits that keep payment credentials out of `Debug` output.
//!

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

mod abs;
mod secret;
mod strategy;

pub use abs::{ExposeInterface, PeekInterface};
pub use secret::Secret;
pub use strategy::{ClientSecret, Strategy, WithType};

#[cfg(feature = "serde")]
mod serde;
#[cfg(feature = "serde")]
pub use crate::serde::SerializableSecret;

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
///
pub mod prelude {
    pub use super::{ExposeInterface, PeekInterface};
}
