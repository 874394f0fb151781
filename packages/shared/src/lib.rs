//! Utilities shared between the Sportify client crates.

pub mod logger;
