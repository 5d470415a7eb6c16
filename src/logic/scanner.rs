//! Pattern Scanner
//!
//! Compiles the generic rule list into regex matchers and runs them over a
//! target file's bytes. Rules are tiny and static, so compiling on every
//! scan call is accepted inefficiency rather than a correctness concern.
//!
//! "Wide" matching: besides the raw bytes, the scanner matches against a
//! UTF-16LE decode of the buffer at both byte alignments, so wide strings
//! embedded in executables are caught by the same patterns.

use regex::bytes::Regex;

use crate::logic::rules::GenericRule;

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Matched rule names, in rule-list order.
    pub matched: Vec<String>,
    pub any_match: bool,
}

/// Run every rule against `bytes`. A malformed rule aborts only this scan
/// call (empty report), mirroring a compiler failure in the rule engine.
pub fn scan_bytes(rules: &[GenericRule], bytes: &[u8]) -> ScanReport {
    let mut compiled = Vec::with_capacity(rules.len());
    for rule in rules {
        let alternation = rule
            .patterns
            .iter()
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        match Regex::new(&format!("(?i){alternation}")) {
            Ok(re) => compiled.push((rule, re)),
            Err(e) => {
                log::warn!("Rule '{}' failed to compile: {}", rule.name, e);
                return ScanReport::default();
            }
        }
    }

    let is_pe = bytes.starts_with(b"MZ");
    let wide_even = utf16le_view(bytes, 0);
    let wide_odd = utf16le_view(bytes, 1);

    let mut matched = Vec::new();
    for (rule, re) in &compiled {
        if rule.requires_pe && !is_pe {
            continue;
        }
        if re.is_match(bytes) || re.is_match(&wide_even) || re.is_match(&wide_odd) {
            matched.push(rule.name.clone());
        }
    }

    ScanReport {
        any_match: !matched.is_empty(),
        matched,
    }
}

/// Lossy UTF-16LE decode starting at `skip`, returned as UTF-8 bytes.
/// Binary noise decodes to replacement garbage that no pattern matches.
fn utf16le_view(bytes: &[u8], skip: usize) -> Vec<u8> {
    if bytes.len() <= skip {
        return Vec::new();
    }
    let units: Vec<u16> = bytes[skip..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::builtin_rules;

    fn pe_with(content: &[u8]) -> Vec<u8> {
        let mut file = b"MZ\x90\x00\x03\x00".to_vec();
        file.extend_from_slice(content);
        file
    }

    fn wide(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn ascii_pattern_matches_case_insensitively() {
        let report = scan_bytes(&builtin_rules(), &pe_with(b"..AutoCLICKER settings.."));
        assert!(report.any_match);
        assert_eq!(report.matched, vec!["Generic A"]);
    }

    #[test]
    fn wide_pattern_matches() {
        let mut file = pe_with(b"\x00\x01\x02");
        file.extend_from_slice(&wide("loader: slinky.gg/download"));
        let report = scan_bytes(&builtin_rules(), &file);
        assert_eq!(report.matched, vec!["Specifics A"]);
    }

    #[test]
    fn wide_pattern_matches_at_odd_alignment() {
        // 7-byte header so the wide run starts on an odd offset.
        let mut file = pe_with(b"\x00");
        file.extend_from_slice(&wide("slinkyhook.dll"));
        let report = scan_bytes(&builtin_rules(), &file);
        assert_eq!(report.matched, vec!["Specifics A"]);
    }

    #[test]
    fn non_pe_file_never_matches_pe_gated_rules() {
        let report = scan_bytes(&builtin_rules(), b"plain text full of clicker words");
        assert!(!report.any_match);
        assert!(report.matched.is_empty());
    }

    #[test]
    fn matches_keep_rule_list_order() {
        let report = scan_bytes(
            &builtin_rules(),
            &pe_with(b"clicker + slinky.gg in one binary"),
        );
        assert_eq!(report.matched, vec!["Generic A", "Specifics A"]);
    }

    #[test]
    fn escaped_dot_does_not_match_arbitrary_byte() {
        let report = scan_bytes(&builtin_rules(), &pe_with(b"slinky_gg is not the domain"));
        assert!(!report.any_match);
    }

    #[test]
    fn malformed_rule_aborts_scan_with_empty_report() {
        let rules = vec![crate::logic::rules::GenericRule {
            name: "Broken".to_string(),
            patterns: vec!["(unclosed".to_string()],
            requires_pe: false,
        }];
        let report = scan_bytes(&rules, &pe_with(b"anything"));
        assert!(!report.any_match);
        assert!(report.matched.is_empty());
    }
}
