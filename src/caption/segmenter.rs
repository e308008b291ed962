//! Caption segmenter (spec §4.3): a dynamic-programming engine that
//! partitions a [`CaptionWord`] stream into time-bounded, line-broken
//! [`CaptionSegment`]s.

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;

use crate::error::{ConversionError, Result};

use super::config::{Config, Weights, SWEDISH_WEAK_WORDS};
use super::types::{CaptionSegment, CaptionWord};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Visible length: strips `<…>` markup and counts Unicode scalar values,
/// not bytes (spec §4.3).
pub fn visible_len(text: &str) -> usize {
    strip_markup(text).chars().count()
}

fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn ends_with_any(text: &str, marks: &[char]) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| marks.contains(&c))
}

fn strip_trailing_punct(token: &str) -> &str {
    token.trim_end_matches(['.', ',', '?', '!', ';', ':', '…'])
}

fn is_weak_word(token: &str) -> bool {
    let cleaned = strip_trailing_punct(token).to_lowercase();
    SWEDISH_WEAK_WORDS.contains(&cleaned.as_str())
}

fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().next_back()
}

// ── Line-break search (spec §4.3 `best_line_break`) ─────────────────────────

#[derive(Debug, Clone)]
struct LineBreak {
    lines: Vec<String>,
    score: f64,
}

fn cps_penalty(weights: &Weights, config: &Config, len: usize, start: f64, end: f64) -> f64 {
    let cps = len as f64 / (end - start).max(1e-6);
    weights.cps_above_target * (cps - config.target_cps).max(0.0)
        + weights.cps_above_max * (cps - config.max_cps).max(0.0)
}

fn single_line_score(config: &Config, text: &str, len: usize, start: f64, end: f64) -> f64 {
    let w = &config.weights;
    let target = config.target_line_chars as f64;
    let _ = text;
    w.len_deviation * (len as f64 - target).abs()
        + w.single_line_long * (len as f64 - config.prefer_split_over as f64).max(0.0)
        + cps_penalty(w, config, len, start, end)
}

fn two_line_score(
    config: &Config,
    line1: &str,
    line2: &str,
    l1: usize,
    l2: usize,
    start: f64,
    end: f64,
) -> f64 {
    let w = &config.weights;
    let target = config.target_line_chars as f64;

    let len_deviation = w.len_deviation * ((l1 as f64 - target).abs() + (l2 as f64 - target).abs());
    let balance = w.balance * (l1 as f64 - l2 as f64).abs();
    let orphan = w.orphan * (config.min_line_chars as f64 - l1.min(l2) as f64).max(0.0);

    let weak_end = last_token(line1)
        .filter(|t| is_weak_word(t))
        .map_or(0.0, |_| w.weak_end);

    let short_end = last_token(line1)
        .map(visible_len)
        .filter(|&l| (1..=2).contains(&l))
        .map_or(0.0, |_| w.short_end);

    let punct_bonus = if ends_with_any(line1, &['.', '!', '?', '…']) {
        w.punct_bonus
    } else {
        0.0
    };
    let comma_bonus = if ends_with_any(line1, &[',', ';', ':']) {
        w.comma_bonus
    } else {
        0.0
    };

    let cps = cps_penalty(w, config, l1 + l2, start, end);

    len_deviation + balance + orphan + weak_end + short_end + punct_bonus + comma_bonus + cps
}

/// Find the lowest-scoring valid line layout for `text` (spec §4.3
/// `best_line_break`). `None` means no layout satisfies `max_line_chars`.
fn best_line_break(config: &Config, text: &str, start: f64, end: f64) -> Option<LineBreak> {
    let normalized = normalize_whitespace(text);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let mut candidates = Vec::new();

    let single_len = visible_len(&normalized);
    if single_len <= config.max_line_chars {
        candidates.push(LineBreak {
            lines: vec![normalized.clone()],
            score: single_line_score(config, &normalized, single_len, start, end),
        });
    }

    if config.max_lines >= 2 {
        for split in 1..tokens.len() {
            let line1 = tokens[..split].join(" ");
            let line2 = tokens[split..].join(" ");
            let l1 = visible_len(&line1);
            let l2 = visible_len(&line2);
            if l1 > config.max_line_chars || l2 > config.max_line_chars {
                continue;
            }
            candidates.push(LineBreak {
                score: two_line_score(config, &line1, &line2, l1, l2, start, end),
                lines: vec![line1, line2],
            });
        }
    }

    candidates
        .into_iter()
        .min_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
}

// ── Segment cost (spec §4.3 "Segment cost") ─────────────────────────────────

fn boundary_term(weights: &Weights, last_word_text: &str) -> f64 {
    if ends_with_any(last_word_text, &['.', '!', '?', '…']) {
        weights.boundary_punct_bonus
    } else if ends_with_any(last_word_text, &[',', ';', ':']) {
        0.3 * weights.boundary_punct_bonus
    } else if last_token(last_word_text).is_some_and(is_weak_word) {
        weights.boundary_weak_end
    } else {
        weights.boundary_no_punct
    }
}

fn build_span_text(content_words: &[CaptionWord], has_speaker: bool) -> String {
    let base = content_words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if has_speaker {
        format!("– {base}")
    } else {
        base
    }
}

struct SpanEval {
    cost: f64,
    segment: CaptionSegment,
    cue_len: usize,
}

/// Forced-break check: a candidate span `[i, j)` may begin at a speaker
/// marker but must never contain one anywhere else (spec §4.3 step 1).
fn crosses_forced_break(words: &[CaptionWord], i: usize, j: usize) -> bool {
    words[i + 1..j].iter().any(|w| w.is_speaker_marker)
}

fn evaluate_span(words: &[CaptionWord], config: &Config, i: usize, j: usize) -> Option<SpanEval> {
    if crosses_forced_break(words, i, j) {
        return None;
    }

    let has_speaker = words[i].is_speaker_marker;
    let content_start = if has_speaker { i + 1 } else { i };
    if content_start >= j {
        return None;
    }

    let text = build_span_text(&words[content_start..j], has_speaker);
    let cue_len = visible_len(&text);
    if cue_len > config.max_cue_chars {
        return None;
    }

    let lb = best_line_break(config, &text, words[i].start_s, words[j - 1].end_s)?;
    let dur = words[j - 1].end_s - words[i].start_s;

    let w = &config.weights;
    let cost = lb.score
        + w.cue_len_deviation * (cue_len as f64 - config.target_cue_chars as f64).abs()
        + w.cue_dur_below * (config.min_cue_dur - dur).max(0.0)
        + w.cue_dur_above * (dur - config.max_cue_dur).max(0.0)
        + boundary_term(w, &words[j - 1].text)
        + if has_speaker { w.speaker_change_bonus } else { 0.0 };

    Some(SpanEval {
        cost,
        segment: CaptionSegment {
            start_s: words[i].start_s,
            end_s: words[j - 1].end_s,
            lines: lb.lines,
            has_speaker_prefix: has_speaker,
        },
        cue_len,
    })
}

// ── Dynamic program (spec §4.3 "Dynamic program") ───────────────────────────

struct DpCell {
    cost: f64,
    back: usize,
    segment: CaptionSegment,
}

fn run_dp(words: &[CaptionWord], config: &Config) -> Vec<Option<DpCell>> {
    let n = words.len();
    let mut dp_cost: Vec<f64> = vec![f64::INFINITY; n + 1];
    dp_cost[0] = 0.0;
    let mut cells: Vec<Option<DpCell>> = (0..=n).map(|_| None).collect();

    for j in 1..=n {
        let lower = j.saturating_sub(config.max_lookback_words).max(0);

        let best = (lower..j)
            .into_par_iter()
            .filter_map(|i| {
                if !dp_cost[i].is_finite() {
                    return None;
                }
                let eval = evaluate_span(words, config, i, j)?;
                let mut total = dp_cost[i] + eval.cost;

                let dur = eval.segment.duration_s();
                if dur < config.min_cue_dur && j < n {
                    total += 2.0;
                }
                if eval.cue_len < 35 && j < n {
                    total += 1.5;
                }
                if j < n && words[j].is_segment_start {
                    total -= 2.0;
                }
                if !ends_with_any(&words[j - 1].text, &['.', '!', '?', '…']) {
                    total += 1.0;
                }

                Some((i, total, eval.segment))
            })
            .min_by(|(i1, c1, _), (i2, c2, _)| c1.partial_cmp(c2).unwrap().then(i1.cmp(i2)));

        if let Some((i, total, segment)) = best {
            dp_cost[j] = total;
            cells[j] = Some(DpCell {
                cost: total,
                back: i,
                segment,
            });
        }
    }

    cells
}

fn backtrack(cells: Vec<Option<DpCell>>, n: usize) -> Option<Vec<CaptionSegment>> {
    let last = cells.get(n)?.as_ref()?;
    if !last.cost.is_finite() {
        return None;
    }

    let mut segments = Vec::new();
    let mut j = n;
    loop {
        let cell = cells[j].as_ref()?;
        segments.push(cell.segment.clone());
        if cell.back == 0 {
            break;
        }
        j = cell.back;
    }
    segments.reverse();
    Some(segments)
}

/// Greedy fallback used when the DP's window cannot satisfy the
/// constraints (spec §4.3 "Fallback"): extend each span as far as
/// `max_cue_chars` and forced breaks allow, line-breaking each span
/// independently.
fn greedy_fallback(words: &[CaptionWord], config: &Config) -> Result<Vec<CaptionSegment>> {
    let n = words.len();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < n {
        let has_speaker = words[i].is_speaker_marker;
        let content_start = if has_speaker { i + 1 } else { i };
        if content_start >= n {
            break;
        }

        let mut j = content_start + 1;
        let first_text = build_span_text(&words[content_start..j], has_speaker);
        if visible_len(&first_text) > config.max_cue_chars {
            return Err(ConversionError::SegmentationInfeasible { word_index: i });
        }

        while j < n && !words[j].is_speaker_marker {
            let next_j = j + 1;
            let text = build_span_text(&words[content_start..next_j], has_speaker);
            if visible_len(&text) > config.max_cue_chars {
                break;
            }
            j = next_j;
        }

        let text = build_span_text(&words[content_start..j], has_speaker);
        let lb = best_line_break(config, &text, words[i].start_s, words[j - 1].end_s)
            .ok_or(ConversionError::SegmentationInfeasible { word_index: i })?;

        segments.push(CaptionSegment {
            start_s: words[i].start_s,
            end_s: words[j - 1].end_s,
            lines: lb.lines,
            has_speaker_prefix: has_speaker,
        });
        i = j;
    }

    Ok(segments)
}

/// Segment a [`CaptionWord`] stream into time-bounded [`CaptionSegment`]s
/// (spec §4.3). Pure function of `(words, config)` — same inputs always
/// yield identical output (spec §8 invariant 7).
pub fn segment(words: &[CaptionWord], config: &Config) -> Result<Vec<CaptionSegment>> {
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let cells = run_dp(words, config);
    if let Some(segments) = backtrack(cells, words.len()) {
        return Ok(segments);
    }

    tracing::warn!("DP exhausted its window; falling back to greedy segmentation");
    greedy_fallback(words, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(text: &str, start_s: f64, end_s: f64) -> CaptionWord {
        CaptionWord {
            text: text.to_string(),
            start_s,
            end_s,
            is_speaker_marker: false,
            is_segment_start: false,
        }
    }

    #[test]
    fn visible_len_ignores_markup() {
        assert_eq!(visible_len("<i>hello</i>"), 5);
    }

    #[test]
    fn single_short_sentence_fits_one_segment() {
        let words = vec![
            w("The", 0.0, 0.3),
            w("quick", 0.4, 0.8),
            w("fox.", 0.9, 1.3),
        ];
        let config = Config::broadcast();
        let segments = segment(&words, &config).unwrap();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].lines.len() <= 2);
        for line in &segments[0].lines {
            assert!(visible_len(line) <= config.max_line_chars);
        }
    }

    #[test]
    fn social_preset_never_emits_two_lines() {
        let words: Vec<CaptionWord> = (0..20)
            .map(|i| w("word", i as f64, i as f64 + 0.5))
            .collect();
        let config = Config::social();
        let segments = segment(&words, &config).unwrap();
        for seg in &segments {
            assert_eq!(seg.lines.len(), 1);
            assert!(visible_len(&seg.lines[0]) <= config.max_line_chars);
        }
    }

    #[test]
    fn never_straddles_a_speaker_marker() {
        let mut words = vec![w("hello", 0.0, 0.3), w("there", 0.4, 0.8)];
        let mut marker = w("–", 1.2, 1.2);
        marker.is_speaker_marker = true;
        words.push(marker);
        words.push(w("hi", 1.2, 1.5));
        words.push(w("again", 1.6, 2.0));

        let config = Config::broadcast();
        let segments = segment(&words, &config).unwrap();

        let marker_idx = 2;
        for seg in &segments {
            let contains_before = seg.start_s <= words[marker_idx - 1].start_s && seg.end_s >= words[marker_idx].start_s && seg.end_s < words[marker_idx + 1].start_s;
            assert!(!contains_before, "a segment must not straddle the marker");
        }
    }

    #[test]
    fn determinism_same_input_yields_identical_segments() {
        let words = vec![w("one", 0.0, 0.3), w("two", 0.4, 0.8), w("three.", 0.9, 1.3)];
        let config = Config::broadcast();
        let a = segment(&words, &config).unwrap();
        let b = segment(&words, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_token_longer_than_max_cue_chars_is_infeasible() {
        let long_word = "x".repeat(200);
        let words = vec![w(&long_word, 0.0, 1.0)];
        let config = Config::social();
        let err = segment(&words, &config).unwrap_err();
        assert!(matches!(err, ConversionError::SegmentationInfeasible { .. }));
    }

    /// A zero-width DP lookback window leaves every cell unreachable, so
    /// the DP exhausts without covering the stream; the greedy fallback
    /// still succeeds, and the fallback is logged (spec §4.3 "Fallback").
    #[tracing_test::traced_test]
    #[test]
    fn dp_exhaustion_falls_back_to_greedy_and_is_logged() {
        let words = vec![w("one", 0.0, 0.3), w("two", 0.4, 0.8), w("three.", 0.9, 1.3)];
        let config = Config::broadcast().with_max_lookback_words(0);
        let segments = segment(&words, &config).unwrap();
        assert!(!segments.is_empty());
        assert!(logs_contain("falling back to greedy segmentation"));
    }
}
