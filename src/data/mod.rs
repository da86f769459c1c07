/// Data layer: discovery, cleaning, derived metrics and aggregation.
///
/// Architecture:
/// ```text
///   experiment dir
///        │
///        ▼
///   ┌───────────┐
///   │ discovery  │  filter + sort file names
///   └───────────┘
///        │  per file
///        ▼
///   ┌──────────┐
///   │  loader   │  identity line + cleaned MeasurementTable (layout)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  NPQown, PSII', qP, rETR + SampleMaxima
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  mainData + maxValues
///   └───────────┘
/// ```

pub mod aggregate;
pub mod discovery;
pub mod filter;
pub mod layout;
pub mod loader;
pub mod metrics;
pub mod model;
