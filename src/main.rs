//! Prefetch Intel - CLI Entry Point
//!
//! Runs the pipeline against the artifact directory and emits one JSON
//! record per line on stdout; the GUI frontend consumes the same records.

use std::path::Path;

use prefetch_intel::{constants, Engine, SystemHost};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{}",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let host = SystemHost::new();
    let engine = Engine::new(&host);
    let records = engine.run(Path::new(&constants::get_prefetch_dir()));

    for record in &records {
        match serde_json::to_string(record) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("Cannot serialize {}: {}", record.filename, e),
        }
    }
}
