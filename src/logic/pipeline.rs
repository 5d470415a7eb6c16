//! Aggregation Pipeline
//!
//! Drives the whole engine: enumerate artifacts, decode, resolve the proper
//! path, classify trust, scan when warranted, stamp the session window.
//! Strictly sequential; each artifact reaches a terminal state before the
//! next one starts.
//!
//! Unparseable files are skipped silently (in-progress writes and foreign
//! format versions are common in a live prefetch directory); everything
//! that decodes is emitted, in decode order, with conservative defaults for
//! whatever could not be determined.

use std::path::Path;

use crate::host::HostCapabilities;
use crate::logic::parser::PrefetchBuffer;
use crate::logic::rules::{builtin_rules, GenericRule};
use crate::logic::scanner::scan_bytes;
use crate::logic::session::{format_local_time, run_in_current_session};
use crate::logic::trust::TrustClassifier;
use crate::logic::types::{ArtifactRecord, ScanOutcome};
use crate::logic::volume::VolumeResolver;

/// Engine context: host seam plus the read-only rule list, the lazily
/// built volume resolver and the trust classifier. Owns no global state.
pub struct Engine<'h> {
    host: &'h dyn HostCapabilities,
    rules: Vec<GenericRule>,
    resolver: VolumeResolver<'h>,
    classifier: TrustClassifier,
}

impl<'h> Engine<'h> {
    pub fn new(host: &'h dyn HostCapabilities) -> Self {
        Self::with_rules(host, builtin_rules())
    }

    pub fn with_rules(host: &'h dyn HostCapabilities, rules: Vec<GenericRule>) -> Self {
        Self {
            host,
            rules,
            resolver: VolumeResolver::new(host),
            classifier: TrustClassifier::new(),
        }
    }

    /// Decode and classify every artifact in `dir`. Never fails; failures
    /// degrade to skipped artifacts or conservative field values.
    pub fn run(&self, dir: &Path) -> Vec<ArtifactRecord> {
        let files = self.host.list_artifact_files(dir);
        log::info!("Scanning {} artifacts in {}", files.len(), dir.display());

        let mut records = Vec::new();
        for path in files {
            let raw = match self.host.read_file(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            let decoded = match PrefetchBuffer::decode(self.host, raw) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            records.push(self.classify(&path, &decoded));
        }

        log::info!("{} artifacts classified", records.len());
        records
    }

    fn classify(&self, path: &Path, decoded: &PrefetchBuffer) -> ArtifactRecord {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let executed_time = decoded.primary_execution_time();

        let related_paths: Vec<String> = decoded
            .name_table()
            .iter()
            .map(|p| self.resolver.resolve(p))
            .collect();

        let mut record = ArtifactRecord {
            readable_time: format_local_time(executed_time),
            executed_time,
            last_eight_execution_times: decoded.run_history(),
            run_count: decoded.run_count(),
            in_session: run_in_current_session(self.host, executed_time),
            is_present: true,
            related_paths,
            filename,
            ..ArtifactRecord::default()
        };

        if let Some(proper_path) = find_proper_path(&record.filename, &record.related_paths) {
            record.proper_path = proper_path;

            if !self.host.file_exists(&record.proper_path) {
                record.is_present = false;
                record.is_signed = false;
                record.scan = ScanOutcome::Clean;
            } else {
                record.is_signed = self.classifier.is_trusted(self.host, &record.proper_path);
                if record.is_signed {
                    record.scan = ScanOutcome::Clean;
                } else if !self.is_own_executable(&record.proper_path) {
                    record.scan = self.scan_target(&record.proper_path);
                }
                // Self-path: no scan, outcome stays NotScanned.
            }
        }

        record.classified = true;
        record
    }

    fn scan_target(&self, path: &str) -> ScanOutcome {
        let bytes = match self.host.read_file(Path::new(path)) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("Cannot read {} for scanning: {}", path, e);
                return ScanOutcome::Clean;
            }
        };

        let report = scan_bytes(&self.rules, &bytes);
        if report.any_match {
            log::info!("{} flagged by {:?}", path, report.matched);
            ScanOutcome::Flagged(report.matched)
        } else {
            ScanOutcome::Clean
        }
    }

    fn is_own_executable(&self, path: &str) -> bool {
        self.host
            .own_executable_path()
            .map(|own| own.eq_ignore_ascii_case(path))
            .unwrap_or(false)
    }
}

/// Pick the name-table entry that belongs to the artifact itself: last path
/// component equal (case-insensitive) to the artifact filename stem before
/// the first hyphen, and carrying an extension.
fn find_proper_path(artifact_filename: &str, resolved_paths: &[String]) -> Option<String> {
    let stem = artifact_filename
        .split_once('-')
        .map(|(head, _)| head)
        .unwrap_or(artifact_filename);

    resolved_paths
        .iter()
        .find(|path| {
            let component = path.rsplit(['\\', '/']).next().unwrap_or(path);
            component.contains('.') && component.eq_ignore_ascii_case(stem)
        })
        .cloned()
}
