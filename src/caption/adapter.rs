//! Caption adapter (spec §4.2): reshapes the IR into the segmenter's input.

use crate::ir::{IrItem, Transcript, MERGEABLE_PUNCTUATION};

use super::types::CaptionWord;

const SPEAKER_MARKER_TEXT: &str = "–";
const MAX_CONSECUTIVE_MERGES: u8 = 3;

/// A word after punctuation merge (pass 1), before speaker-marker injection
/// and segment-start flagging (passes 2-3).
#[derive(Debug, Clone)]
struct MergedWord {
    text: String,
    start_s: f64,
    end_s: f64,
    speaker: Option<String>,
    /// How many punctuation marks have merged onto this word so far, in
    /// the current consecutive run (spec §4.2 rule 1's cap of 3).
    merge_streak: u8,
}

fn is_sentence_ender(text: &str) -> bool {
    text.ends_with('.') || text.ends_with('?') || text.ends_with('!')
}

/// Pass 1: merge each standalone mergeable punctuation mark onto the
/// preceding word, up to 3 consecutive marks; overflow merges onto the
/// *next* word instead (spec §4.2 rule 1).
fn merge_punctuation(items: &[IrItem]) -> Vec<MergedWord> {
    let mut merged: Vec<MergedWord> = Vec::new();
    // Punctuation that overflowed the 3-mark cap (or preceded any word at
    // all) and is waiting to be prefixed onto the next real word.
    let mut pending_prefix = String::new();
    let mut pending_start_s: Option<f64> = None;
    let mut pending_end_s = 0.0;

    for item in items {
        match item {
            IrItem::Word(w) => {
                let mut text = w.text.clone();
                let start_s = pending_start_s.take().unwrap_or(w.start_s);
                if !pending_prefix.is_empty() {
                    text = format!("{pending_prefix}{text}");
                    pending_prefix.clear();
                }
                merged.push(MergedWord {
                    text,
                    start_s,
                    end_s: w.start_s + w.duration_s,
                    speaker: w.speaker.clone(),
                    merge_streak: 0,
                });
            }
            IrItem::Punct(p) => {
                if !MERGEABLE_PUNCTUATION.contains(&p.text.as_str()) {
                    // Not in the merge set (e.g. a standalone en-dash) —
                    // it stands on its own, like a word.
                    merged.push(MergedWord {
                        text: p.text.clone(),
                        start_s: p.start_s,
                        end_s: p.start_s + p.duration_s,
                        speaker: p.speaker.clone(),
                        merge_streak: 0,
                    });
                    continue;
                }

                let merged_onto_prev = merged.last_mut().is_some_and(|last| {
                    if last.merge_streak < MAX_CONSECUTIVE_MERGES {
                        last.text.push_str(&p.text);
                        last.end_s = p.start_s + p.duration_s;
                        last.merge_streak += 1;
                        true
                    } else {
                        false
                    }
                });

                if !merged_onto_prev {
                    if pending_start_s.is_none() {
                        pending_start_s = Some(p.start_s);
                    }
                    pending_prefix.push_str(&p.text);
                    pending_end_s = p.start_s + p.duration_s;
                }
            }
        }
    }

    // Trailing overflow with no following word: stands on its own.
    if !pending_prefix.is_empty() {
        merged.push(MergedWord {
            text: pending_prefix,
            start_s: pending_start_s.unwrap_or(pending_end_s),
            end_s: pending_end_s,
            speaker: None,
            merge_streak: 0,
        });
    }

    merged
}

/// Passes 2-3: inject synthetic speaker-change markers and flag segment
/// starts, projecting timing 1:1 from the merged words (pass 4).
fn inject_markers_and_flags(merged: Vec<MergedWord>) -> Vec<CaptionWord> {
    let mut out = Vec::with_capacity(merged.len());
    let mut prev_speaker: Option<Option<String>> = None;
    let mut prev_ends_sentence = false;

    for (idx, w) in merged.into_iter().enumerate() {
        let is_first = idx == 0;

        if !is_first {
            if let Some(prev_sp) = &prev_speaker {
                if *prev_sp != w.speaker {
                    out.push(CaptionWord {
                        text: SPEAKER_MARKER_TEXT.to_string(),
                        start_s: w.start_s,
                        end_s: w.start_s,
                        is_speaker_marker: true,
                        is_segment_start: false,
                    });
                }
            }
        }

        let is_segment_start = is_first || prev_ends_sentence;
        prev_ends_sentence = is_sentence_ender(&w.text);
        prev_speaker = Some(w.speaker.clone());

        out.push(CaptionWord {
            text: w.text,
            start_s: w.start_s,
            end_s: w.end_s,
            is_speaker_marker: false,
            is_segment_start,
        });
    }

    out
}

/// Adapt a [`Transcript`] into the segmenter's [`CaptionWord`] stream (spec
/// §4.2). Idempotent in spirit: re-running punctuation merge over an
/// already-homogeneous `CaptionWord` stream (no remaining punctuation items
/// to fold in) would be a no-op, which is why the full pipeline from the
/// same `Transcript` always reproduces the same output (spec §8 invariants
/// 6-7).
pub fn adapt(transcript: &Transcript) -> Vec<CaptionWord> {
    let merged = merge_punctuation(&transcript.words);
    inject_markers_and_flags(merged)
}
