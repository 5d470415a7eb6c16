//! System Host - Production Capability Implementation
//!
//! Filesystem access goes through `std::fs`. Trust, volume and session
//! queries shell out to PowerShell and parse compressed JSON, so no direct
//! Win32 bindings are needed; on hosts without PowerShell every query
//! degrades to its conservative default. Decompression goes through the
//! ntdll wrapper.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::ARTIFACT_EXTENSION;
use crate::error::HostError;
use crate::host::{ntdll, EmbeddedSignature, HostCapabilities, LogonSession};

/// Production host backed by the local operating system.
#[derive(Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostCapabilities for SystemHost {
    fn list_artifact_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot enumerate {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn decompress_workspace_size(&self, format: u16) -> Result<(u32, u32), HostError> {
        ntdll::workspace_size(format)
    }

    fn decompress(
        &self,
        format: u16,
        input: &[u8],
        expected_len: usize,
    ) -> Result<Vec<u8>, HostError> {
        ntdll::decompress(format, input, expected_len)
    }

    fn verify_embedded_signature(&self, path: &str) -> EmbeddedSignature {
        match query_authenticode(path) {
            Some(sig) if sig.status == "Valid" && sig.signature_type == "Authenticode" => {
                EmbeddedSignature::Valid {
                    signer_subject: sig.subject,
                }
            }
            _ => EmbeddedSignature::Invalid,
        }
    }

    fn verify_catalog_signature(&self, path: &str) -> bool {
        matches!(
            query_authenticode(path),
            Some(sig) if sig.status == "Valid" && sig.signature_type == "Catalog"
        )
    }

    fn interactive_logon_sessions(&self) -> Vec<LogonSession> {
        // LogonType 2 = Interactive, 10 = RemoteInteractive
        let script = r#"
        Get-CimInstance Win32_LogonSession |
            Where-Object { $_.LogonType -eq 2 -or $_.LogonType -eq 10 } |
            ForEach-Object { @{
                'Start' = [int64][double](Get-Date $_.StartTime -UFormat %s)
                'Id' = $_.LogonId.ToString()
            } } | ConvertTo-Json -Compress
        "#;

        let raw = match run_powershell(script) {
            Some(out) => out,
            None => return Vec::new(),
        };

        let mut sessions: Vec<LogonSession> = json_objects(&raw)
            .into_iter()
            .filter_map(|obj| {
                let start = obj["Start"].as_i64()?;
                let id = obj["Id"]
                    .as_str()
                    .and_then(|s| s.parse::<u32>().ok())
                    .unwrap_or(0);
                Some(LogonSession {
                    start_time: start,
                    session_id: id,
                })
            })
            .collect();

        sessions.sort_by_key(|s| s.start_time);
        sessions
    }

    fn volume_inventory(&self) -> HashMap<String, String> {
        let script = r#"
        Get-CimInstance Win32_LogicalDisk |
            Select-Object DeviceID, VolumeSerialNumber |
            ConvertTo-Json -Compress
        "#;

        let raw = match run_powershell(script) {
            Some(out) => out,
            None => {
                log::warn!("Volume inventory unavailable - paths will not resolve");
                return HashMap::new();
            }
        };

        json_objects(&raw)
            .into_iter()
            .filter_map(|obj| {
                let serial = obj["VolumeSerialNumber"].as_str()?.to_uppercase();
                let drive = obj["DeviceID"].as_str()?.to_string();
                Some((serial, drive))
            })
            .collect()
    }

    fn own_executable_path(&self) -> Option<String> {
        std::env::current_exe()
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }
}

// ============================================================================
// POWERSHELL PLUMBING
// ============================================================================

struct AuthenticodeResult {
    status: String,
    signature_type: String,
    subject: String,
}

/// One Get-AuthenticodeSignature query covering both the embedded and the
/// catalog case; SignatureType distinguishes them.
fn query_authenticode(path: &str) -> Option<AuthenticodeResult> {
    // Single quotes in a PS single-quoted string are escaped by doubling.
    let escaped = path.replace('\'', "''");
    let script = format!(
        r#"
        $sig = Get-AuthenticodeSignature -FilePath '{escaped}'
        @{{
            'Status' = $sig.Status.ToString()
            'SignatureType' = $sig.SignatureType.ToString()
            'Subject' = if ($sig.SignerCertificate) {{ $sig.SignerCertificate.Subject }} else {{ '' }}
        }} | ConvertTo-Json -Compress
        "#
    );

    let raw = run_powershell(&script)?;
    let parsed: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;

    Some(AuthenticodeResult {
        status: parsed["Status"].as_str().unwrap_or("").to_string(),
        signature_type: parsed["SignatureType"].as_str().unwrap_or("").to_string(),
        subject: parsed["Subject"].as_str().unwrap_or("").to_string(),
    })
}

fn run_powershell(script: &str) -> Option<String> {
    let output = match Command::new("powershell")
        .args(["-NoProfile", "-Command", script])
        .output()
    {
        Ok(out) => out,
        Err(e) => {
            log::debug!("PowerShell execution failed: {}", e);
            return None;
        }
    };

    if !output.status.success() {
        log::debug!(
            "PowerShell returned failure: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// ConvertTo-Json emits a bare object for a single result and an array for
/// many; normalize to a list either way.
fn json_objects(raw: &str) -> Vec<serde_json::Value> {
    match serde_json::from_str::<serde_json::Value>(raw.trim()) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(obj @ serde_json::Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    }
}
