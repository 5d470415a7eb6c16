//! Host Capability Seam
//!
//! Everything the engine needs from the operating system, behind one
//! object-safe trait: artifact enumeration, raw reads, the kernel
//! decompression API, Authenticode/catalog verification, volume inventory
//! and logon-session enumeration.
//!
//! The engine only ever talks to `dyn HostCapabilities`, so the whole
//! pipeline runs against [`mock::MockHost`] in tests.

pub mod ntdll;
pub mod system;

#[cfg(test)]
pub mod mock;

pub use system::SystemHost;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HostError;

// ============================================================================
// CAPABILITY RESULT TYPES
// ============================================================================

/// Outcome of embedded (Authenticode-style) signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddedSignature {
    /// Signature chain verified; carries the signer certificate subject.
    Valid { signer_subject: String },
    /// Not signed, tampered, or verification unavailable.
    Invalid,
}

impl EmbeddedSignature {
    pub fn is_valid(&self) -> bool {
        matches!(self, EmbeddedSignature::Valid { .. })
    }
}

/// One interactive logon session on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogonSession {
    /// Logon start, unix epoch seconds.
    pub start_time: i64,
    pub session_id: u32,
}

// ============================================================================
// HOST CAPABILITIES TRAIT
// ============================================================================

/// Abstract host surface consumed by the engine. All calls are blocking and
/// made on the pipeline's own thread.
pub trait HostCapabilities: Send + Sync {
    /// Enumerate artifact files (`*.pf`) in `dir`, in directory order.
    fn list_artifact_files(&self, dir: &Path) -> Vec<PathBuf>;

    /// Read a whole file into memory.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Does `path` currently exist on disk?
    fn file_exists(&self, path: &str) -> bool;

    /// Workspace sizing for the kernel decompression API.
    /// Returns (buffer workspace size, fragment workspace size).
    fn decompress_workspace_size(&self, format: u16) -> Result<(u32, u32), HostError>;

    /// Decompress `input` with the given format code into a buffer of
    /// `expected_len` bytes. The implementation owns any scratch workspace
    /// and releases it on every path.
    fn decompress(&self, format: u16, input: &[u8], expected_len: usize)
        -> Result<Vec<u8>, HostError>;

    /// Verify an embedded signature against the OS trust store.
    fn verify_embedded_signature(&self, path: &str) -> EmbeddedSignature;

    /// Hash-based lookup against the system signing catalogs.
    fn verify_catalog_signature(&self, path: &str) -> bool;

    /// Current interactive logon sessions, earliest first.
    fn interactive_logon_sessions(&self) -> Vec<LogonSession>;

    /// Volume serial number (uppercase hex) -> drive letter prefix.
    fn volume_inventory(&self) -> HashMap<String, String>;

    /// Full path of the running executable, if known.
    fn own_executable_path(&self) -> Option<String>;
}
