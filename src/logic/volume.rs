//! Volume Path Resolver
//!
//! Artifact-internal paths name their disk by a volume-GUID device
//! reference (`\VOLUME{<guid>-<serial>}\...`). The resolver swaps that for a
//! live drive letter using a serial-number map from the host's volume
//! inventory. Resolution is best-effort: any structural mismatch or unknown
//! serial returns the input unchanged.
//!
//! The inventory query is expensive and stable for the run's duration, so
//! the map is built at most once per resolver, guarded by `OnceCell`.

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::host::HostCapabilities;

const VOLUME_PREFIX: &str = "VOLUME{";

pub struct VolumeResolver<'h> {
    host: &'h dyn HostCapabilities,
    serial_map: OnceCell<HashMap<String, String>>,
}

impl<'h> VolumeResolver<'h> {
    pub fn new(host: &'h dyn HostCapabilities) -> Self {
        Self {
            host,
            serial_map: OnceCell::new(),
        }
    }

    fn serial_map(&self) -> &HashMap<String, String> {
        self.serial_map.get_or_init(|| {
            let map = self.host.volume_inventory();
            if map.is_empty() {
                log::warn!("Empty volume inventory - device paths will pass through unresolved");
            } else {
                log::debug!("Volume serial map built: {} volumes", map.len());
            }
            map
        })
    }

    /// Resolve one volume-GUID device path to a drive-letter path, or
    /// return it unchanged.
    pub fn resolve(&self, path: &str) -> String {
        let start = match path.find(VOLUME_PREFIX) {
            Some(pos) => pos,
            None => return path.to_string(),
        };
        let close = match path[start..].find('}') {
            Some(rel) => start + rel,
            None => return path.to_string(),
        };

        let volume_id = &path[start + VOLUME_PREFIX.len()..close];
        let serial = match volume_id.rfind('-') {
            Some(dash) => volume_id[dash + 1..].to_uppercase(),
            None => return path.to_string(),
        };

        match self.serial_map().get(&serial) {
            Some(drive) => format!("{}{}", drive, &path[close + 1..]),
            None => path.to_string(),
        }
    }
}
