//! Parse the model's free-text reply into structured prescription fields.
//!
//! The reply format is delimiter-based: `Doctor:` / `Disease:` scalar lines,
//! then a `Medicines:` section and a `Tests:` section of numbered entries.
//! Medicines are taken only from their own section so numbered test entries
//! never leak into the medicine list.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::NOT_FOUND;

static DOCTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Doctor:\s*(.*)$").unwrap());

static DISEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Disease:\s*(.*)$").unwrap());

/// Numbered-list entry, e.g. `1. Napa 500 mg` or `2.[Seclo 20 mg]`.
static LIST_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

// Section headers count only at the start of a line, like the scalar
// labels, so prose mentioning "Medicines:" mid-sentence is not a header.
static MEDICINES_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Medicines:").unwrap());

static TESTS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Tests:").unwrap());

/// Structured fields extracted from one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPrescription {
    pub doctor_name: String,
    pub disease: String,
    pub medicines: Vec<String>,
    pub tests: Vec<String>,
}

/// Parse a reply into prescription fields.
///
/// Never fails: unreadable scalar fields fall back to `"Not Found"` and
/// absent sections yield empty lists.
pub fn parse_reply(reply: &str) -> ParsedPrescription {
    let (medicine_section, test_section) = split_sections(reply);

    ParsedPrescription {
        doctor_name: capture_scalar(&DOCTOR_RE, reply),
        disease: capture_scalar(&DISEASE_RE, reply),
        medicines: numbered_entries(medicine_section),
        tests: numbered_entries(test_section),
    }
}

/// Slice the reply into its `Medicines:` and `Tests:` sections.
///
/// Each section runs from its header to the other section's header (or end
/// of reply), whichever order the headers appear in. A missing header
/// yields an empty section.
fn split_sections(reply: &str) -> (&str, &str) {
    let meds = MEDICINES_HEADER_RE.find(reply);
    let tests = TESTS_HEADER_RE.find(reply);

    let medicine_section = match meds {
        Some(m) => {
            let end = tests
                .map(|t| t.start())
                .filter(|s| *s > m.end())
                .unwrap_or(reply.len());
            &reply[m.end()..end]
        }
        None => "",
    };

    let test_section = match tests {
        Some(t) => {
            let end = meds
                .map(|m| m.start())
                .filter(|s| *s > t.end())
                .unwrap_or(reply.len());
            &reply[t.end()..end]
        }
        None => "",
    };

    (medicine_section, test_section)
}

/// Capture a `Label: value` scalar; `"Not Found"` when absent or unreadable.
fn capture_scalar(re: &Regex, reply: &str) -> String {
    let value = re
        .captures(reply)
        .and_then(|cap| cap.get(1))
        .map(|m| strip_brackets(m.as_str().trim()))
        .unwrap_or_default();

    if value.is_empty() || value.eq_ignore_ascii_case(NOT_FOUND) {
        NOT_FOUND.to_string()
    } else {
        value.to_string()
    }
}

/// Collect numbered-list entries from a section, markers stripped.
fn numbered_entries(section: &str) -> Vec<String> {
    section
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let m = LIST_ENTRY_RE.find(line)?;
            let entry = strip_brackets(line[m.end()..].trim());
            if entry.is_empty() || entry.eq_ignore_ascii_case(NOT_FOUND) {
                None
            } else {
                Some(entry.to_string())
            }
        })
        .collect()
}

/// Drop one pair of wrapping square brackets, if present.
///
/// The prompt's output template shows entries as `[<Medicine Name> ...]`;
/// the model sometimes keeps the brackets literally.
fn strip_brackets(value: &str) -> &str {
    value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .map(str::trim)
        .unwrap_or(value)
}
