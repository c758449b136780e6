#![forbid(unsafe_code)]

//! Enums shared across the capture workspace.

pub mod enums;

pub use enums::*;
