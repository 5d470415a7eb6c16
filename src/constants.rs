//! Central Configuration Constants
//!
//! Single source of truth for engine defaults.
//! To change the scanned directory or the blocklist, only edit this file.

/// Default artifact source directory
pub const DEFAULT_PREFETCH_DIR: &str = r"C:\Windows\Prefetch";

/// Artifact filename extension (lowercase, without dot)
pub const ARTIFACT_EXTENSION: &str = "pf";

/// Signer identities that are never trusted, regardless of signature
/// validity. Matched case-insensitively as substrings of the certificate
/// subject.
pub const BLOCKLISTED_SIGNERS: [&str; 2] = ["manthe industries, llc", "slinkware"];

/// Legacy presentation label for "scanned, nothing matched"
pub const CLEAN_RULE_LABEL: &str = "none";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Prefetch Intel";

/// Get artifact directory from environment or use default
pub fn get_prefetch_dir() -> String {
    std::env::var("PREFETCH_INTEL_DIR").unwrap_or_else(|_| DEFAULT_PREFETCH_DIR.to_string())
}
