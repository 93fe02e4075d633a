/// Data layer: core types, loading, reshaping, and artifact writing.
///
/// Architecture:
/// ```text
///  grand_averages_<subject>.csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → WideTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   melt    │  wide → long, ms conversion, artifact filter
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ LongTable │  Vec<Observation>, emotion/condition indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  long CSV, t-test TSV, significant-times CSV
///   └──────────┘
/// ```

pub mod loader;
pub mod melt;
pub mod model;
pub mod writer;
