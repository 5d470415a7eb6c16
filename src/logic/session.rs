//! Session Window Check
//!
//! Flags whether a run timestamp falls inside the current interactive logon
//! window: at or after the earliest interactive session's start, at or
//! before now. No sessions means no window, so never inside.

use chrono::{Local, TimeZone, Utc};

use crate::host::HostCapabilities;

pub fn run_in_current_session(host: &dyn HostCapabilities, executed_time: i64) -> bool {
    let sessions = host.interactive_logon_sessions();
    let earliest = match sessions.first() {
        Some(session) => session,
        None => return false,
    };

    let now = Utc::now().timestamp();
    executed_time >= earliest.start_time && executed_time <= now
}

/// Render unix epoch seconds as local `%Y-%m-%d %H:%M:%S`.
pub fn format_local_time(executed_time: i64) -> String {
    Local
        .timestamp_opt(executed_time, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
