//! Data layer: schema, loading, lookup and extraction.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .json / .parquet        univ_info.csv
//!        │                                     │
//!        ▼                                     ▼
//!   ┌──────────┐                          ┌──────────┐
//!   │  loader   │  parse → AdmissionsTable │   meta   │  → UniversityIndex
//!   └──────────┘                          └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  SelectionPath → choices / Resolution
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  series   │  ProgramRecord → ProgramSeries
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod meta;
pub mod model;
pub mod schema;
pub mod series;

pub use error::LoadError;
pub use filter::{choices_for, lookup, next_choices, resolve, settle, Resolution, SelectionPath};
pub use loader::load;
pub use meta::{build_index, UniversityIndex, UniversityMeta};
pub use model::{AdmissionsTable, CellValue, Level, ProgramRecord};
pub use schema::{MetaSchema, TableSchema};
pub use series::{extract_series, InfoRow, ProgramSeries};
