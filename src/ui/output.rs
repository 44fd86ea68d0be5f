//! Human-facing messages. Everything goes to stderr; stdout carries facts.

use crate::extractor::ExtractionSummary;
use crate::ui::palette;
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};

const MARK_HEADER: &str = "🚀";
const MARK_OK: &str = "✅";
const MARK_FAILED: &str = "❌";

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress everything but errors.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// `VXREF_QUIET` set to `1` or `true`.
pub fn quiet_from_env() -> bool {
    std::env::var("VXREF_QUIET")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", MARK_HEADER, text.style(palette().heading.clone()));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", MARK_OK, label.style(palette().ok.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", MARK_FAILED, label.style(palette().failure.clone()));
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    eprintln!();
    eprintln!("━{}━", title.style(palette().heading.clone()));
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("  {} {}", label.style(palette().label.clone()), value);
}

/// Rows describing one extraction; unresolved references only when there are any.
pub fn extraction_rows(file: &str, entries: usize, summary: &ExtractionSummary) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("File:", file.to_string()),
        ("Entries:", entries.to_string()),
        ("Definitions:", summary.definitions.to_string()),
        ("References:", summary.references.to_string()),
    ];
    if summary.unresolved > 0 {
        rows.push(("Unresolved:", summary.unresolved.to_string()));
    }
    rows
}

pub fn extraction_report(file: &str, entries: usize, summary: &ExtractionSummary) {
    section("Extraction");
    for (label, value) in extraction_rows(file, entries, summary) {
        summary_row(label, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("yes"));
    }

    #[test]
    fn test_quiet_switch() {
        set_quiet(true);
        assert!(is_quiet());
        set_quiet(false);
        assert!(!is_quiet());
    }

    #[test]
    fn test_unresolved_row_only_when_needed() {
        let clean = ExtractionSummary { nodes: 4, definitions: 2, references: 1, unresolved: 0 };
        let rows = extraction_rows("top.sv", 12, &clean);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], ("Entries:", "12".to_string()));

        let dangling = ExtractionSummary { unresolved: 1, ..clean };
        let rows = extraction_rows("top.sv", 12, &dangling);
        assert_eq!(rows.last(), Some(&("Unresolved:", "1".to_string())));
    }
}
