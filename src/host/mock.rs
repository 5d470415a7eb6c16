//! Scriptable host for tests.
//!
//! Every capability answers from fixture state set up through the builder
//! methods; nothing touches the real system.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::HostError;
use crate::host::{EmbeddedSignature, HostCapabilities, LogonSession};

#[derive(Default)]
pub struct MockHost {
    artifacts: Vec<(PathBuf, Vec<u8>)>,
    existing_files: HashSet<String>,
    embedded_signatures: HashMap<String, EmbeddedSignature>,
    catalog_signed: HashSet<String>,
    sessions: Vec<LogonSession>,
    volumes: HashMap<String, String>,
    own_path: Option<String>,
    /// Payload returned by `decompress` when decompression is scripted.
    decompressed_payload: Option<Vec<u8>>,
    pub volume_inventory_calls: Mutex<u32>,
    pub scan_reads: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.artifacts.push((PathBuf::from(name), bytes));
        self
    }

    pub fn with_existing_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.existing_files.insert(path.to_string());
        self.artifacts.push((PathBuf::from(path), bytes));
        self
    }

    pub fn with_embedded_signature(mut self, path: &str, signer_subject: &str) -> Self {
        self.embedded_signatures.insert(
            path.to_string(),
            EmbeddedSignature::Valid {
                signer_subject: signer_subject.to_string(),
            },
        );
        self
    }

    pub fn with_catalog_signature(mut self, path: &str) -> Self {
        self.catalog_signed.insert(path.to_string());
        self
    }

    pub fn with_session(mut self, start_time: i64, session_id: u32) -> Self {
        self.sessions.push(LogonSession {
            start_time,
            session_id,
        });
        self
    }

    pub fn with_volume(mut self, serial: &str, drive: &str) -> Self {
        self.volumes
            .insert(serial.to_uppercase(), drive.to_string());
        self
    }

    pub fn with_own_path(mut self, path: &str) -> Self {
        self.own_path = Some(path.to_string());
        self
    }

    pub fn with_decompressed_payload(mut self, payload: Vec<u8>) -> Self {
        self.decompressed_payload = Some(payload);
        self
    }
}

impl HostCapabilities for MockHost {
    fn list_artifact_files(&self, _dir: &Path) -> Vec<PathBuf> {
        self.artifacts
            .iter()
            .filter(|(p, _)| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("pf"))
                    .unwrap_or(false)
            })
            .map(|(p, _)| p.clone())
            .collect()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.scan_reads
            .lock()
            .push(path.to_string_lossy().into_owned());
        self.artifacts
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no fixture"))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.existing_files.contains(path)
    }

    fn decompress_workspace_size(&self, _format: u16) -> Result<(u32, u32), HostError> {
        if self.decompressed_payload.is_some() {
            Ok((1024, 256))
        } else {
            Err(HostError::Unsupported)
        }
    }

    fn decompress(
        &self,
        _format: u16,
        _input: &[u8],
        expected_len: usize,
    ) -> Result<Vec<u8>, HostError> {
        match &self.decompressed_payload {
            Some(payload) => {
                let mut out = payload.clone();
                out.resize(expected_len, 0);
                Ok(out)
            }
            None => Err(HostError::Unsupported),
        }
    }

    fn verify_embedded_signature(&self, path: &str) -> EmbeddedSignature {
        self.embedded_signatures
            .get(path)
            .cloned()
            .unwrap_or(EmbeddedSignature::Invalid)
    }

    fn verify_catalog_signature(&self, path: &str) -> bool {
        self.catalog_signed.contains(path)
    }

    fn interactive_logon_sessions(&self) -> Vec<LogonSession> {
        self.sessions.clone()
    }

    fn volume_inventory(&self) -> HashMap<String, String> {
        *self.volume_inventory_calls.lock() += 1;
        self.volumes.clone()
    }

    fn own_executable_path(&self) -> Option<String> {
        self.own_path.clone()
    }
}
