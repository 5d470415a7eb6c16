//! Binary Record Decoder
//!
//! Fixed-offset little-endian view over a decoded artifact buffer. A
//! `PrefetchBuffer` can only be obtained through [`PrefetchBuffer::decode`],
//! which enforces the minimum viable size and the format tag up front, so
//! every fixed-field accessor is bounds-safe by construction.
//!
//! Layout (all offsets from buffer start):
//! 0x00 version | 0x04 signature | 0x0C file size |
//! 0x64/0x68 name-table offset/size | 0x6C/0x70/0x74 volume table |
//! 0x80 primary timestamp + 8 history slots | 0xD0 run count.

use crate::error::DecodeError;
use crate::host::HostCapabilities;
use crate::logic::envelope;

/// Minimum viable header; covers every fixed offset below.
const MIN_BUFFER_LEN: usize = 0x100;

const OFFSET_VERSION: usize = 0x00;
const OFFSET_SIGNATURE: usize = 0x04;
const OFFSET_FILE_SIZE: usize = 0x0C;
const OFFSET_NAME_TABLE: usize = 0x64;
const OFFSET_NAME_TABLE_SIZE: usize = 0x68;
const OFFSET_VOLUME_TABLE: usize = 0x6C;
const OFFSET_VOLUME_COUNT: usize = 0x70;
const OFFSET_VOLUME_TABLE_SIZE: usize = 0x74;
const OFFSET_EXECUTION_TIMES: usize = 0x80;
const OFFSET_RUN_COUNT: usize = 0xD0;

/// Seconds between the Windows epoch (1601) and the unix epoch (1970).
const EPOCH_DELTA_SECS: i64 = 11_644_473_600;
/// 100ns ticks per second.
const TICKS_PER_SEC: u64 = 10_000_000;

/// Convert a Windows FILETIME tick count to unix epoch seconds.
pub fn filetime_ticks_to_unix(ticks: u64) -> i64 {
    (ticks / TICKS_PER_SEC) as i64 - EPOCH_DELTA_SECS
}

/// Decoded (plain or inflated) artifact buffer with typed accessors.
#[derive(Debug)]
pub struct PrefetchBuffer {
    data: Vec<u8>,
}

impl PrefetchBuffer {
    /// Decode a raw artifact file: unwrap the compression envelope when
    /// present, accept the plain format when tagged `SCCA` at offset 4,
    /// reject everything else.
    pub fn decode(host: &dyn HostCapabilities, raw: Vec<u8>) -> Result<Self, DecodeError> {
        if raw.len() < MIN_BUFFER_LEN {
            return Err(DecodeError::Undersized(raw.len()));
        }

        let data = if envelope::is_enveloped(&raw) {
            envelope::inflate(host, &raw)?
        } else if &raw[4..8] == b"SCCA" {
            raw
        } else {
            return Err(DecodeError::UnrecognizedTag);
        };

        if data.len() < MIN_BUFFER_LEN {
            return Err(DecodeError::Undersized(data.len()));
        }

        Ok(Self { data })
    }

    // Fixed offsets are all < MIN_BUFFER_LEN, checked at construction.
    fn read_u32(&self, offset: usize) -> u32 {
        let bytes: [u8; 4] = self.data[offset..offset + 4].try_into().unwrap();
        u32::from_le_bytes(bytes)
    }

    fn read_u64(&self, offset: usize) -> u64 {
        let bytes: [u8; 8] = self.data[offset..offset + 8].try_into().unwrap();
        u64::from_le_bytes(bytes)
    }

    pub fn version(&self) -> u32 {
        self.read_u32(OFFSET_VERSION)
    }

    pub fn signature(&self) -> u32 {
        self.read_u32(OFFSET_SIGNATURE)
    }

    pub fn file_size(&self) -> u32 {
        self.read_u32(OFFSET_FILE_SIZE)
    }

    pub fn name_table_offset(&self) -> u32 {
        self.read_u32(OFFSET_NAME_TABLE)
    }

    pub fn name_table_size(&self) -> u32 {
        self.read_u32(OFFSET_NAME_TABLE_SIZE)
    }

    pub fn volume_table_offset(&self) -> u32 {
        self.read_u32(OFFSET_VOLUME_TABLE)
    }

    pub fn volume_count(&self) -> u32 {
        self.read_u32(OFFSET_VOLUME_COUNT)
    }

    pub fn volume_table_size(&self) -> u32 {
        self.read_u32(OFFSET_VOLUME_TABLE_SIZE)
    }

    pub fn run_count(&self) -> u32 {
        self.read_u32(OFFSET_RUN_COUNT)
    }

    pub fn executed_timestamp(&self) -> u64 {
        self.read_u64(OFFSET_EXECUTION_TIMES)
    }

    /// Primary execution timestamp as unix epoch seconds.
    pub fn primary_execution_time(&self) -> i64 {
        filetime_ticks_to_unix(self.executed_timestamp())
    }

    /// Referenced path strings in table order. Empty entries (consecutive
    /// NUL terminators) are preserved; an unterminated tail is discarded.
    pub fn name_table(&self) -> Vec<String> {
        let offset = self.name_table_offset() as usize;
        let size = self.name_table_size() as usize;

        if offset >= self.data.len() {
            return Vec::new();
        }
        let end = offset.saturating_add(size).min(self.data.len());

        split_utf16_table(&self.data[offset..end])
    }

    /// Up to 8 historical run timestamps, unix epoch seconds; 0 = unused
    /// slot. Always 8 wide regardless of how many slots the buffer held.
    pub fn run_history(&self) -> [i64; 8] {
        read_run_history(&self.data)
    }
}

/// Split a UTF-16LE code-unit run on NUL terminators.
fn split_utf16_table(bytes: &[u8]) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Vec<u16> = Vec::new();

    for pair in bytes.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            entries.push(String::from_utf16_lossy(&current));
            current.clear();
        } else {
            current.push(unit);
        }
    }

    entries
}

/// Clamped read of the 8-slot history array at 0x80: only whole slots that
/// fit inside the buffer are decoded, the rest stay zero.
fn read_run_history(data: &[u8]) -> [i64; 8] {
    let mut times = [0i64; 8];

    if data.len() <= OFFSET_EXECUTION_TIMES {
        return times;
    }

    let available = data.len() - OFFSET_EXECUTION_TIMES;
    let slots = (available / 8).min(8);

    for (i, slot) in times.iter_mut().enumerate().take(slots) {
        let offset = OFFSET_EXECUTION_TIMES + i * 8;
        let bytes: [u8; 8] = data[offset..offset + 8].try_into().unwrap();
        let ticks = u64::from_le_bytes(bytes);
        if ticks != 0 {
            *slot = filetime_ticks_to_unix(ticks);
        }
    }

    times
}
