//! Compression Envelope Decoder
//!
//! Newer artifact versions are wrapped in an 8-byte "MAM" prologue followed
//! by an XPRESS-compressed payload. The prologue packs a signature word
//! (magic in the low 3 bytes, format code in bits 24-27, reserved flag in
//! the top nibble) and the declared decompressed size.
//!
//! Everything here fails closed: any malformed prologue or host API failure
//! becomes a `DecodeError` and the caller drops the artifact.

use crate::error::DecodeError;
use crate::host::HostCapabilities;

/// Signature word magic, low 3 bytes = ASCII "MAM".
const ENVELOPE_MAGIC: u32 = 0x004D_414D;

/// Prologue: u32 signature word + u32 declared decompressed size.
const PROLOGUE_LEN: usize = 8;

/// Does this buffer start with the compressed-container tag?
pub fn is_enveloped(buf: &[u8]) -> bool {
    buf.len() >= 3 && &buf[..3] == b"MAM"
}

/// Validate the prologue and inflate the payload through the host's
/// decompression capability.
pub fn inflate(host: &dyn HostCapabilities, buf: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if buf.len() < PROLOGUE_LEN {
        return Err(DecodeError::TruncatedEnvelope);
    }

    let signature = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let decompressed_size = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);

    if signature & 0x00FF_FFFF != ENVELOPE_MAGIC {
        return Err(DecodeError::BadEnvelopeMagic);
    }

    // Top nibble is reserved; a set bit means a container variant we do not
    // support.
    if signature >> 28 != 0 {
        return Err(DecodeError::UnsupportedEnvelopeFlag);
    }

    let format = ((signature >> 24) & 0x0F) as u16;
    let payload = &buf[PROLOGUE_LEN..];

    host.decompress_workspace_size(format)?;

    let inflated = host.decompress(format, payload, decompressed_size as usize)?;
    log::debug!(
        "Inflated envelope: format {} -> {} bytes",
        format,
        inflated.len()
    );
    Ok(inflated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;

    fn prologue(signature: u32, size: u32) -> Vec<u8> {
        let mut buf = signature.to_le_bytes().to_vec();
        buf.extend_from_slice(&size.to_le_bytes());
        buf
    }

    #[test]
    fn detects_envelope_tag() {
        assert!(is_enveloped(b"MAM\x04rest"));
        assert!(!is_enveloped(b"MA"));
        assert!(!is_enveloped(b"\x11\x00\x00\x00SCCA"));
    }

    #[test]
    fn truncated_prologue_fails_cleanly() {
        let host = MockHost::new();
        let err = inflate(&host, b"MAM\x04\x00").unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedEnvelope));
    }

    #[test]
    fn bad_magic_rejected() {
        let host = MockHost::new();
        let buf = prologue(0x0400_0000 | 0x004D_414E, 16);
        assert!(matches!(
            inflate(&host, &buf).unwrap_err(),
            DecodeError::BadEnvelopeMagic
        ));
    }

    #[test]
    fn reserved_flag_nibble_rejected() {
        let host = MockHost::new().with_decompressed_payload(vec![0u8; 16]);
        let buf = prologue(0x1400_0000 | ENVELOPE_MAGIC, 16);
        assert!(matches!(
            inflate(&host, &buf).unwrap_err(),
            DecodeError::UnsupportedEnvelopeFlag
        ));
    }

    #[test]
    fn workspace_sizing_failure_collapses_to_decode_error() {
        // MockHost without a scripted payload reports Unsupported.
        let host = MockHost::new();
        let buf = prologue(0x0400_0000 | ENVELOPE_MAGIC, 16);
        assert!(matches!(
            inflate(&host, &buf).unwrap_err(),
            DecodeError::Decompression(_)
        ));
    }

    #[test]
    fn inflates_to_declared_size() {
        let host = MockHost::new().with_decompressed_payload(b"plaintext".to_vec());
        let mut buf = prologue(0x0400_0000 | ENVELOPE_MAGIC, 9);
        buf.extend_from_slice(b"compressed-bytes");

        let out = inflate(&host, &buf).unwrap();
        assert_eq!(out, b"plaintext");
    }
}
