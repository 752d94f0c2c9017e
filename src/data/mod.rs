/// Data layer: table model, loading, column resolution and the view pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  country / year / metrics, year range
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  view     │  year filter → numeric coercion → transform
///   └──────────┘
///        │
///        ▼
///   distribution → histogram,  entity map → choropleth
/// ```

pub mod columns;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod view;
