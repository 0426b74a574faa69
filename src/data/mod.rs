/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  classify columns (key / numeric / nominal), Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply a query string → matching record indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
