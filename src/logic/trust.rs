//! Trust Classifier
//!
//! Layered signed/unsigned decision for a resolved executable path. The
//! checks form an ordered chain; each returns a tri-state verdict and the
//! first decisive answer wins:
//!
//! 1. Embedded signature: OS-verified Authenticode. A valid signature from
//!    a blocklisted identity is decisively untrusted; any other valid
//!    signature is trusted; verification failure falls through.
//! 2. Catalog signature: hash lookup in the system signing catalogs.
//!    Terminal - valid means trusted, anything else untrusted.
//!
//! Host trust-store failures are never fatal; they read as "unsigned".
//! Verdicts are cached per path for the classifier's lifetime, since the
//! same executable shows up in many artifacts.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::constants::BLOCKLISTED_SIGNERS;
use crate::host::{EmbeddedSignature, HostCapabilities};

// ============================================================================
// VERDICT & CHECK CHAIN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustVerdict {
    Trusted,
    Untrusted,
    /// This check cannot decide; consult the next one.
    Inconclusive,
}

trait TrustCheck: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, host: &dyn HostCapabilities, path: &str) -> TrustVerdict;
}

struct EmbeddedSignatureCheck;

impl TrustCheck for EmbeddedSignatureCheck {
    fn name(&self) -> &'static str {
        "embedded_signature"
    }

    fn evaluate(&self, host: &dyn HostCapabilities, path: &str) -> TrustVerdict {
        match host.verify_embedded_signature(path) {
            EmbeddedSignature::Valid { signer_subject } => {
                if subject_is_blocklisted(&signer_subject) {
                    log::debug!("Blocklisted signer on {}: {}", path, signer_subject);
                    TrustVerdict::Untrusted
                } else {
                    TrustVerdict::Trusted
                }
            }
            EmbeddedSignature::Invalid => TrustVerdict::Inconclusive,
        }
    }
}

struct CatalogSignatureCheck;

impl TrustCheck for CatalogSignatureCheck {
    fn name(&self) -> &'static str {
        "catalog_signature"
    }

    fn evaluate(&self, host: &dyn HostCapabilities, path: &str) -> TrustVerdict {
        if host.verify_catalog_signature(path) {
            TrustVerdict::Trusted
        } else {
            TrustVerdict::Untrusted
        }
    }
}

/// Signer identity blocklist, matched case-insensitively on the
/// certificate subject.
fn subject_is_blocklisted(subject: &str) -> bool {
    let lower = subject.to_lowercase();
    BLOCKLISTED_SIGNERS.iter().any(|bad| lower.contains(bad))
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct TrustClassifier {
    checks: Vec<Box<dyn TrustCheck>>,
    cache: RwLock<HashMap<String, bool>>,
}

impl TrustClassifier {
    pub fn new() -> Self {
        Self {
            checks: vec![Box::new(EmbeddedSignatureCheck), Box::new(CatalogSignatureCheck)],
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Signed/unsigned verdict for `path`. Exhausting the chain without a
    /// decisive answer is untrusted.
    pub fn is_trusted(&self, host: &dyn HostCapabilities, path: &str) -> bool {
        if let Some(&cached) = self.cache.read().get(path) {
            return cached;
        }

        let mut trusted = false;
        for check in &self.checks {
            match check.evaluate(host, path) {
                TrustVerdict::Trusted => {
                    log::debug!("{} trusted by {}", path, check.name());
                    trusted = true;
                    break;
                }
                TrustVerdict::Untrusted => {
                    log::debug!("{} rejected by {}", path, check.name());
                    break;
                }
                TrustVerdict::Inconclusive => continue,
            }
        }

        self.cache.write().insert(path.to_string(), trusted);
        trusted
    }
}

impl Default for TrustClassifier {
    fn default() -> Self {
        Self::new()
    }
}
