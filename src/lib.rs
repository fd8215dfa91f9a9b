// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod collect;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod table;
pub mod telemetry;

// Stage two: batched sentiment labelling
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::collect::{collect, Collector};
pub use crate::config::Credentials;
pub use crate::error::CollectError;
pub use crate::normalize::{normalize, NormalizedRow};
pub use crate::table::{read_table, write_table, ResultTable};
