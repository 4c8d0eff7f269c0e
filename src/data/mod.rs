//! Data layer: core types, loading, filtering, and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Dataset   (held once by `store`)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  FilterCriteria → filtered listings
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   view   │  aggregate KPIs / buckets → ViewModel
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export  │  filtered listings → ';' CSV with ',' decimals
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
pub mod view;
