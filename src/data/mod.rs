/// Data layer: core types, loading, filtering, statistics and export.
///
/// Architecture:
/// ```text
///        .csv
///         │
///         ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw cells → infer kinds
///   └──────────┘
///         │
///         ▼
///   ┌──────────┐
///   │  Dataset  │  immutable named columns, kind cached per column
///   └──────────┘
///         │
///         ▼
///   ┌──────────┐
///   │  filter   │  allowed-sets / ranges → new filtered Dataset
///   └──────────┘
///         │
///         ├──▶ stats   overview, describe
///         └──▶ export  filtered Dataset → CSV bytes
/// ```

pub mod export;
pub mod filter;
pub mod infer;
pub mod loader;
pub mod model;
pub mod stats;
