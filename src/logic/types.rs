//! Engine Output Types
//!
//! One `ArtifactRecord` per successfully decoded prefetch file. The record
//! is the whole interface to the presentation layer, so everything here is
//! serde-serializable.

use serde::{Deserialize, Serialize};

use crate::constants::CLEAN_RULE_LABEL;

// ============================================================================
// SCAN OUTCOME
// ============================================================================

/// Three-way result of the heuristic scan pass.
///
/// `NotScanned` and `Clean` are distinct on purpose: a file that was never
/// scanned (trusted, absent target skipped early, or the self-exclusion
/// guard fired) must not look like a file that was scanned and came back
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "rules")]
pub enum ScanOutcome {
    /// No scan pass ran for this record.
    NotScanned,
    /// Scan ran, nothing matched.
    Clean,
    /// Scan ran; these rule names matched, in match order.
    Flagged(Vec<String>),
}

impl ScanOutcome {
    pub fn is_flagged(&self) -> bool {
        matches!(self, ScanOutcome::Flagged(_))
    }

    pub fn was_scanned(&self) -> bool {
        !matches!(self, ScanOutcome::NotScanned)
    }

    /// Legacy presentation list: `["none"]` for a clean check, the matched
    /// names when flagged, empty when no check ran.
    pub fn rule_labels(&self) -> Vec<String> {
        match self {
            ScanOutcome::NotScanned => Vec::new(),
            ScanOutcome::Clean => vec![CLEAN_RULE_LABEL.to_string()],
            ScanOutcome::Flagged(names) => names.clone(),
        }
    }
}

impl Default for ScanOutcome {
    fn default() -> Self {
        ScanOutcome::NotScanned
    }
}

// ============================================================================
// ARTIFACT RECORD
// ============================================================================

/// Fully classified view of one prefetch artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact filename, e.g. `NOTEPAD.EXE-A1B2C3D4.pf`.
    pub filename: String,
    /// Primary execution timestamp, unix epoch seconds.
    pub executed_time: i64,
    /// Up to 8 historical run timestamps; 0 = unused slot. Always 8 wide.
    pub last_eight_execution_times: [i64; 8],
    /// Primary timestamp rendered as local `%Y-%m-%d %H:%M:%S`.
    pub readable_time: String,
    /// Every path referenced by the artifact, resolved to drive letters
    /// where possible. Table order and duplicates preserved.
    pub related_paths: Vec<String>,
    /// Resolved path of the executable this artifact belongs to; empty
    /// until resolution succeeds.
    pub proper_path: String,
    pub is_signed: bool,
    /// Does the resolved executable currently exist on disk?
    pub is_present: bool,
    pub scan: ScanOutcome,
    /// Classification pipeline completed for this record.
    pub classified: bool,
    /// Primary run falls inside the current interactive logon window.
    pub in_session: bool,
    /// Run counter as recorded by the artifact itself.
    pub run_count: u32,
}
