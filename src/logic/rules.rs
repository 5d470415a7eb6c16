//! Built-in Generic Rules
//!
//! The fixed heuristic rule set run against unsigned executables. Each rule
//! is a named bundle of case-insensitive patterns; a rule matches when any
//! of its patterns is found (ASCII or UTF-16LE wide) and its file-type
//! precondition holds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericRule {
    pub name: String,
    /// Regex sources; the scanner applies case-insensitivity.
    pub patterns: Vec<String>,
    /// Only applies to native executables (MZ header).
    pub requires_pe: bool,
}

impl GenericRule {
    fn new(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            requires_pe: true,
        }
    }
}

/// The process-wide rule list, in evaluation order.
pub fn builtin_rules() -> Vec<GenericRule> {
    vec![
        GenericRule::new("Generic A", &["clicker", "autoclick"]),
        GenericRule::new(
            "Specifics A",
            &[
                r"Exodus\.codes",
                r"slinky\.gg",
                r"slinkyhook\.dll",
                r"slinky_library\.dll",
                r"\[!\] Failed to find Vape jar",
                r"\$Vape Launcher",
            ],
        ),
    ]
}
