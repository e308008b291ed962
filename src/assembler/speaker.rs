//! Speaker table construction (spec §4.1 "Speaker table", §9 "Speaker table
//! identity").
//!
//! Speaker labels are opaque strings from the upstream service; they are
//! mapped to stable UUIDs exactly once here, in order of first appearance.
//! Every downstream reference goes through the resulting table, never the
//! raw label again.

use uuid::Uuid;

use crate::ir::SpeakerInfo;

/// Label used for the synthetic single speaker created when no token in the
/// transcript carries a speaker label.
pub const DEFAULT_SPEAKER_LABEL: &str = "default";

/// Build the speaker table from the speaker labels attached to a sequence of
/// tokens (in first-appearance order), falling back to a single default
/// speaker when no label is present anywhere.
///
/// Returns the table plus a rewrite function's worth of information: callers
/// pass `None` speaker fields through [`resolve`] to fold in the default.
pub fn build_table<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<SpeakerInfo> {
    let mut table = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for label in labels.flatten() {
        if seen.insert(label.to_string()) {
            table.push(SpeakerInfo {
                source_label: label.to_string(),
                display_name: format!("Speaker {}", table.len() + 1),
                uuid: Uuid::new_v4(),
            });
        }
    }

    if table.is_empty() {
        table.push(SpeakerInfo {
            source_label: DEFAULT_SPEAKER_LABEL.to_string(),
            display_name: "Speaker 1".to_string(),
            uuid: Uuid::new_v4(),
        });
    }

    table
}

/// Resolve a word's raw speaker label against the table: `None` is rewritten
/// to the table's sole entry when it is the synthetic default (no real
/// labels were ever present), and left as `None` otherwise — an
/// unattributed word in a multi-speaker transcript stays unattributed.
pub fn resolve(table: &[SpeakerInfo], raw: Option<&str>) -> Option<String> {
    match raw {
        Some(label) => Some(label.to_string()),
        None if table.len() == 1 && table[0].source_label == DEFAULT_SPEAKER_LABEL => {
            Some(DEFAULT_SPEAKER_LABEL.to_string())
        }
        None => None,
    }
}
