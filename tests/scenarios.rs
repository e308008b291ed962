//! Literal scenarios from the testable-properties catalogue that exercise
//! the full pipeline end to end (tokens in, emitted artifact out). S1-S3
//! are unit-tested alongside the assembler; this file covers S4-S6.

mod common;

use transcript_core::caption::{self, Config};
use transcript_core::kinetic::{self, BucketConfig};

// ── S4: broadcast segmentation hard caps ────────────────────────────────

#[test]
fn scenario_s4_broadcast_hard_caps() {
    let tokens = common::long_tokenized_speech();
    let transcript = transcript_core::assemble(&tokens, None).unwrap();
    let config = Config::broadcast();
    let segments = caption::captions(&transcript, &config).unwrap();

    assert!(!segments.is_empty());
    for segment in &segments {
        assert!(segment.lines.len() <= 2);
        for line in &segment.lines {
            assert!(caption::visible_len(line) <= config.max_line_chars);
        }
        let cue_len: usize = segment.lines.iter().map(|l| caption::visible_len(l)).sum();
        assert!(cue_len <= config.max_cue_chars);
    }
}

// ── S5: social segmentation enforces a single line ──────────────────────

#[test]
fn scenario_s5_social_single_line() {
    let tokens = common::long_tokenized_speech();
    let transcript = transcript_core::assemble(&tokens, None).unwrap();
    let config = Config::social();
    let segments = caption::captions(&transcript, &config).unwrap();

    assert!(!segments.is_empty());
    for segment in &segments {
        assert_eq!(segment.lines.len(), 1);
        assert!(caption::visible_len(&segment.lines[0]) <= config.max_line_chars);
    }
}

// ── S6: kinetic 6-word sentence, end to end from tokens ─────────────────

#[test]
fn scenario_s6_kinetic_end_to_end() {
    let tokens = vec![
        common::token("one", 500, 600, 0.9, None, None),
        common::token(" two", 800, 900, 0.9, None, None),
        common::token(" three", 1100, 1200, 0.9, None, None),
        common::token(" four", 1500, 1600, 0.9, None, None),
        common::token(" five", 1800, 1900, 0.9, None, None),
        common::token(" six", 2100, 2200, 0.9, None, None),
        common::token(".", 2200, 2210, 0.9, None, None),
        common::token(" seven", 3500, 3600, 0.9, None, None),
        common::token(".", 3600, 3610, 0.9, None, None),
    ];
    let transcript = transcript_core::assemble(&tokens, None).unwrap();
    let config = BucketConfig::default();
    let buckets = kinetic::bucketize(&transcript, &config);
    let streams = kinetic::rows(&buckets, &config);

    let approx = |a: f64, b: f64| (a - b).abs() < 1e-9;

    assert!(approx(streams[0][0].appear_s, 0.50) && approx(streams[0][0].display_duration_s, 1.00));
    assert!(approx(streams[0][1].appear_s, 1.50) && approx(streams[0][1].display_duration_s, 2.00));
    assert!(approx(streams[1][0].appear_s, 0.80) && approx(streams[1][0].display_duration_s, 0.70));
    assert!(approx(streams[1][1].appear_s, 1.80) && approx(streams[1][1].display_duration_s, 1.70));
    assert!(approx(streams[2][0].appear_s, 1.10) && approx(streams[2][0].display_duration_s, 0.40));
    assert!(approx(streams[2][1].appear_s, 2.10) && approx(streams[2][1].display_duration_s, 1.40));
}
