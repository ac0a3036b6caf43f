//! Marco Domain Layer
//!
//! Core value types and trait boundaries for the Marco document analysis
//! pipeline. Infrastructure (language-model backends, file readers, the CLI)
//! lives in other crates and depends on this one.
//!
//! ## Key Concepts
//!
//! - **RawDocument**: an uploaded byte payload plus its declared extension
//! - **StructuredResult**: normalized sections and fields extracted by the model
//! - **DebugTrace**: how each line of the model response was classified
//! - **ModelId**: the closed set of language models an analysis may use
//!
//! ## Architecture
//!
//! - Pure value types only, no I/O
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod model;
pub mod run_id;
pub mod structured;
pub mod trace;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentFormat, RawDocument};
pub use model::ModelId;
pub use run_id::RunId;
pub use structured::{normalize_key, Section, StructuredResult};
pub use trace::{DebugTrace, LineCounts};
