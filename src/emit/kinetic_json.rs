//! Kinetic-JSON emitter (spec §6 "Downstream — kinetic"): projects the
//! three row streams into the editor-JSON schema, one segment per bucket
//! entry.

use crate::ir::Transcript;
use crate::kinetic::{self, Bucket, BucketConfig};
use crate::lang;

use super::editor_json::{EditorSegment, EditorWord, EditorWordType};

fn row_to_segments(row: &[kinetic::KineticWord], language: Option<&str>) -> Vec<EditorSegment> {
    row.iter()
        .map(|word| EditorSegment {
            start: word.appear_s,
            duration: word.display_duration_s,
            speaker: None,
            language: language.map(str::to_string),
            words: vec![EditorWord {
                text: word.text.clone(),
                start: word.appear_s,
                duration: word.display_duration_s,
                confidence: 1.0,
                eos: false,
                word_type: EditorWordType::Word,
                tags: Vec::new(),
            }],
        })
        .collect()
}

/// Run the kinetic bucketiser over `transcript` (already restricted to a
/// single logical speaker) and project its three rows into the
/// editor-JSON schema.
pub fn to_streams(transcript: &Transcript, config: &BucketConfig) -> [Vec<EditorSegment>; 3] {
    let buckets: Vec<Bucket> = kinetic::bucketize(transcript, config);
    let rows = kinetic::rows(&buckets, config);
    let language = transcript
        .primary_language
        .as_deref()
        .map(|code| lang::to_bcp47(code));

    [
        row_to_segments(&rows[0], language),
        row_to_segments(&rows[1], language),
        row_to_segments(&rows[2], language),
    ]
}
