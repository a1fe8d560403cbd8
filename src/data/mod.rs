/// Data layer: loading, derivation, windowing and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .csv.zip / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<SensorRow>, synthesize timestamps
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  temp_delta, efficiency → PlantDataset
///   └──────────┘
///        │            (cache: once per canonical path)
///        ├───────────────────────┐
///        ▼                       ▼
///   ┌──────────┐           ┌──────────┐
///   │  window   │ [s, e)    │ summary   │  full-table statistics
///   └──────────┘           └──────────┘
///        │
///        ▼
///   heatmap / export / plots
/// ```

pub mod cache;
pub mod derive;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod loader;
pub mod model;
pub mod summary;
pub mod window;

pub use error::DataError;
