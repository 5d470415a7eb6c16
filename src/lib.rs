//! Prefetch Intel - Artifact Extraction & Classification Engine
//!
//! Decodes Windows execution-prefetch artifacts (including the MAM
//! compression envelope), resolves volume-GUID device paths to drive
//! letters, and classifies each referenced executable through layered trust
//! checks plus a heuristic pattern scan. The output is one
//! [`ArtifactRecord`] per decodable artifact, ready for any presentation
//! layer.
//!
//! The engine talks to the operating system only through
//! [`host::HostCapabilities`], so the whole pipeline is testable offline.

pub mod constants;
pub mod error;
pub mod host;
pub mod logic;

pub use error::{DecodeError, HostError};
pub use host::{HostCapabilities, SystemHost};
pub use logic::{ArtifactRecord, Engine, GenericRule, ScanOutcome};
