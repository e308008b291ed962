//! Kinetic bucketiser (spec §4.4): partitions a single-speaker sentence
//! word-stream into three interleaved, time-aligned row streams with
//! precise appear/disappear timing.

use crate::ir::{IrItem, Transcript, MERGEABLE_PUNCTUATION};

/// Kinetic bucketiser configuration (spec §4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct BucketConfig {
    pub max_bucket_size: usize,
    pub max_hold_s: f64,
    pub final_hold_s: f64,
    pub min_word_display_s: f64,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            max_bucket_size: 3,
            max_hold_s: 3.0,
            final_hold_s: 1.5,
            min_word_display_s: 0.15,
        }
    }
}

/// Cap on consecutive punctuation marks merged onto one word before
/// overflow starts prefixing the *next* word instead (spec §4.2 rule 1,
/// reused identically here per spec §4.4's "identical to §4.2 rule 1").
const MAX_CONSECUTIVE_MERGES: u8 = 3;

/// One merged visual word, after the punctuation-merge pass (spec §4.4
/// "Punctuation merge") and before bucket partitioning.
#[derive(Debug, Clone)]
struct MergedWord {
    text: String,
    start_s: f64,
    end_s: f64,
    eos: bool,
    /// How many punctuation marks have merged onto this word so far, in
    /// the current consecutive run (cap of 3).
    merge_streak: u8,
}

/// A kinetic slot holding up to `max_bucket_size` words that appear
/// together and clear together (spec §3 `Bucket`).
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub words: Vec<BucketWord>,
    /// Shared clear time for every word in this bucket.
    pub end_s: f64,
}

/// One word inside a [`Bucket`], with its row slot already assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketWord {
    pub text: String,
    pub start_s: f64,
    /// 0, 1, or 2 — which of the three output rows this word occupies.
    pub row: usize,
}

/// One row-stream entry: a word's appear time and on-screen duration
/// (spec §6 "Downstream — kinetic").
#[derive(Debug, Clone, PartialEq)]
pub struct KineticWord {
    pub text: String,
    pub appear_s: f64,
    pub display_duration_s: f64,
}

/// Merge standalone mergeable punctuation onto the preceding word, up to
/// 3 consecutive marks; overflow merges onto the *next* word instead
/// (spec §4.4: identical to the caption adapter's rule 1; no speaker
/// markers).
fn merge_punctuation(items: &[IrItem]) -> Vec<MergedWord> {
    let mut merged: Vec<MergedWord> = Vec::new();
    let mut pending_prefix = String::new();
    let mut pending_start_s: Option<f64> = None;
    let mut pending_end_s = 0.0;

    for item in items {
        match item {
            IrItem::Word(w) => {
                let start_s = pending_start_s.take().unwrap_or(w.start_s);
                let mut text = w.text.clone();
                if !pending_prefix.is_empty() {
                    text = format!("{pending_prefix}{text}");
                    pending_prefix.clear();
                }
                merged.push(MergedWord {
                    text,
                    start_s,
                    end_s: w.start_s + w.duration_s,
                    eos: w.eos,
                    merge_streak: 0,
                });
            }
            IrItem::Punct(p) => {
                if !MERGEABLE_PUNCTUATION.contains(&p.text.as_str()) {
                    merged.push(MergedWord {
                        text: p.text.clone(),
                        start_s: p.start_s,
                        end_s: p.start_s + p.duration_s,
                        eos: false,
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

    if !pending_prefix.is_empty() {
        merged.push(MergedWord {
            text: pending_prefix,
            start_s: pending_start_s.unwrap_or(pending_end_s),
            end_s: pending_end_s,
            eos: false,
            merge_streak: 0,
        });
    }

    merged
}

/// Split a merged word stream into sentences at `eos=true` boundaries
/// (spec §4.4 "Sentence split"). Each returned `Vec` is one sentence, in
/// transcript order.
fn split_sentences(words: Vec<MergedWord>) -> Vec<Vec<MergedWord>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for word in words {
        let ends_sentence = word.eos;
        current.push(word);
        if ends_sentence {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Partition a single sentence's words into buckets of `max_bucket_size`,
/// left to right; the final bucket carries the remainder.
fn partition_buckets(words: &[MergedWord], max_bucket_size: usize) -> Vec<&[MergedWord]> {
    words.chunks(max_bucket_size.max(1)).collect()
}

/// Run the full kinetic pipeline (spec §4.4): merge punctuation, split
/// into sentences, partition into buckets, and compute shared clear
/// times and row assignments. `transcript.words` must already be
/// restricted to a single logical speaker — the bucketiser does not
/// itself filter by speaker.
pub fn bucketize(transcript: &Transcript, config: &BucketConfig) -> Vec<Bucket> {
    let merged = merge_punctuation(&transcript.words);
    let sentences = split_sentences(merged);

    // Flatten bucket boundaries across sentences so "next bucket" can
    // look across a sentence boundary (spec §4.4 "next = the first word
    // of the next bucket (within the same or next sentence...)").
    let mut all_buckets: Vec<Vec<MergedWord>> = Vec::new();
    for sentence in sentences {
        for chunk in partition_buckets(&sentence, config.max_bucket_size) {
            all_buckets.push(chunk.to_vec());
        }
    }

    let n = all_buckets.len();
    let mut buckets = Vec::with_capacity(n);

    for (idx, words) in all_buckets.iter().enumerate() {
        let last = words.last().expect("bucket is never empty");
        let is_final_bucket = idx + 1 == n;

        let mut clear = if is_final_bucket {
            last.start_s + (last.end_s - last.start_s) + config.final_hold_s
        } else {
            all_buckets[idx + 1][0].start_s
        };
        clear = clear.min(last.start_s + config.max_hold_s);

        let bucket_words = words
            .iter()
            .enumerate()
            .map(|(row, w)| BucketWord {
                text: w.text.clone(),
                start_s: w.start_s,
                row,
            })
            .collect();

        buckets.push(Bucket {
            words: bucket_words,
            end_s: clear,
        });
    }

    buckets
}

/// Project `buckets` into three independent row streams (spec §4.4 "Row
/// assignment", §6 "Downstream — kinetic"). Row *r*'s stream holds one
/// entry per bucket that has a word in that row.
pub fn rows(buckets: &[Bucket], config: &BucketConfig) -> [Vec<KineticWord>; 3] {
    let mut rows: [Vec<KineticWord>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for bucket in buckets {
        for word in &bucket.words {
            if word.row >= rows.len() {
                continue;
            }
            let display_duration_s = (bucket.end_s - word.start_s).max(config.min_word_display_s);
            rows[word.row].push(KineticWord {
                text: word.text.clone(),
                appear_s: word.start_s,
                display_duration_s,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AssembledPunct, AssembledWord};

    fn word(text: &str, start_s: f64, duration_s: f64, eos: bool) -> IrItem {
        IrItem::Word(AssembledWord {
            text: text.to_string(),
            start_s,
            duration_s,
            confidence: 0.9,
            eos,
            speaker: None,
            language: None,
            tags: Vec::new(),
        })
    }

    fn punct(text: &str, start_s: f64, duration_s: f64) -> IrItem {
        IrItem::Punct(AssembledPunct {
            text: text.to_string(),
            start_s,
            duration_s,
            confidence: 0.9,
            speaker: None,
            language: None,
            tags: Vec::new(),
        })
    }

    fn transcript(words: Vec<IrItem>) -> Transcript {
        Transcript {
            words,
            speakers: Vec::new(),
            primary_language: None,
            source_name: None,
            duration_s: 0.0,
        }
    }

    /// Scenario S6: a 6-word sentence followed by a next sentence at
    /// 3.50, with the default `max_bucket_size = 3`.
    #[test]
    fn scenario_s6_kinetic_six_word_sentence() {
        let items = vec![
            word("a", 0.50, 0.10, false),
            word("b", 0.80, 0.10, false),
            word("c", 1.10, 0.10, false),
            word("d", 1.50, 0.10, false),
            word("e", 1.80, 0.10, false),
            word("f", 2.10, 0.10, true),
            word("g", 3.50, 0.10, true),
        ];
        let transcript = transcript(items);
        let config = BucketConfig::default();
        let buckets = bucketize(&transcript, &config);
        let streams = rows(&buckets, &config);

        assert_eq!(streams[0][0].appear_s, 0.50);
        assert!((streams[0][0].display_duration_s - 1.00).abs() < 1e-9);
        assert_eq!(streams[0][1].appear_s, 1.50);
        assert!((streams[0][1].display_duration_s - 2.00).abs() < 1e-9);

        assert_eq!(streams[1][0].appear_s, 0.80);
        assert!((streams[1][0].display_duration_s - 0.70).abs() < 1e-9);
        assert_eq!(streams[1][1].appear_s, 1.80);
        assert!((streams[1][1].display_duration_s - 1.70).abs() < 1e-9);

        assert_eq!(streams[2][0].appear_s, 1.10);
        assert!((streams[2][0].display_duration_s - 0.40).abs() < 1e-9);
        assert_eq!(streams[2][1].appear_s, 2.10);
        assert!((streams[2][1].display_duration_s - 1.40).abs() < 1e-9);
    }

    #[test]
    fn final_bucket_extends_by_final_hold_s() {
        let items = vec![
            word("a", 0.0, 0.5, false),
            word("b", 1.0, 0.5, true),
        ];
        let transcript = transcript(items);
        let config = BucketConfig::default();
        let buckets = bucketize(&transcript, &config);
        assert_eq!(buckets.len(), 1);
        assert!((buckets[0].end_s - (1.0 + 0.5 + config.final_hold_s)).abs() < 1e-9);
    }

    #[test]
    fn clear_time_is_capped_at_max_hold_s() {
        let items = vec![
            word("a", 0.0, 0.1, true),
            word("b", 10.0, 0.1, true),
        ];
        let transcript = transcript(items);
        let config = BucketConfig::default();
        let buckets = bucketize(&transcript, &config);
        assert!((buckets[0].end_s - config.max_hold_s).abs() < 1e-9);
    }

    #[test]
    fn bucket_partitioning_caps_at_three_words() {
        let items = (0..5)
            .map(|i| word("w", i as f64, 0.1, i == 4))
            .collect();
        let transcript = transcript(items);
        let config = BucketConfig::default();
        let buckets = bucketize(&transcript, &config);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].words.len(), 3);
        assert_eq!(buckets[1].words.len(), 2);
    }

    /// Mirrors the caption adapter's identical regression test (spec §4.4:
    /// "identical to §4.2 rule 1") — a 4th consecutive mark overflows onto
    /// the next word instead of merging without limit.
    #[test]
    fn caps_at_three_consecutive_marks_then_overflows_to_next_word() {
        let items = vec![
            word("wait", 0.0, 0.5, false),
            punct("?", 0.5, 0.1),
            punct("!", 0.6, 0.1),
            punct("?", 0.7, 0.1),
            punct("!", 0.8, 0.1),
            word("really", 1.0, 0.5, true),
        ];
        let transcript = transcript(items);
        let config = BucketConfig::default();
        let buckets = bucketize(&transcript, &config);
        let words: Vec<&str> = buckets
            .iter()
            .flat_map(|b| b.words.iter().map(|w| w.text.as_str()))
            .collect();
        assert_eq!(words, vec!["wait?!?", "!really"]);
    }
}
