//! Engine Logic - Extraction & Classification
//!
//! Leaves first: `envelope` inflates the compressed container, `parser`
//! decodes the binary record, `volume` resolves device paths, `trust` and
//! `scanner` annotate targets, `pipeline` orchestrates the lot into
//! `ArtifactRecord`s.

pub mod envelope;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod scanner;
pub mod session;
pub mod trust;
pub mod types;
pub mod volume;


pub use pipeline::Engine;
pub use rules::GenericRule;
pub use types::{ArtifactRecord, ScanOutcome};
