//! Apartment rental listings: loading, filtering, aggregation, and export.
//!
//! The `rent-panda` binary wraps this library in an egui dashboard.

pub mod config;
pub mod data;
pub mod format;
