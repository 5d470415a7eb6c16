//! Error taxonomy
//!
//! Errors stay inside the engine: the pipeline boundary converts every
//! failure into a conservative field value (artifact dropped, path left
//! unresolved, "unsigned"). Nothing here crosses into the output records.

use thiserror::Error;

/// Failure while talking to a host capability.
#[derive(Debug, Error)]
pub enum HostError {
    /// Capability does not exist on this platform.
    #[error("capability not supported on this platform")]
    Unsupported,

    /// Host API reported failure.
    #[error("host API failure: {0}")]
    Api(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while decoding an artifact buffer. Any of these means the
/// artifact is silently skipped by the pipeline.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Buffer smaller than the minimum viable header (0x100 bytes).
    #[error("buffer too small: {0} bytes")]
    Undersized(usize),

    /// Neither the compressed-envelope tag nor the plain-format tag.
    #[error("not a recognized artifact")]
    UnrecognizedTag,

    /// Envelope tag present but the 8-byte prologue does not fit.
    #[error("truncated compression envelope")]
    TruncatedEnvelope,

    /// Reserved flag nibble set in the envelope signature word.
    #[error("unsupported envelope flag")]
    UnsupportedEnvelopeFlag,

    /// Envelope signature word does not carry the expected magic.
    #[error("bad envelope magic")]
    BadEnvelopeMagic,

    #[error("decompression failed: {0}")]
    Decompression(#[from] HostError),
}
