//! SRT emitter (spec §6 "Downstream — SRT"): UTF-8 text, LF line endings.

use crate::caption::CaptionSegment;

fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round().max(0.0) as i64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Render `segments` as an SRT document, applying the two final timing
/// rules during emission (spec §6): enforce `end ≥ start + min_display_dur`,
/// then `end = min(end, next.start − 0.05)` for every cue but the last.
pub fn to_srt(segments: &[CaptionSegment], min_display_dur: f64) -> String {
    let n = segments.len();
    let mut ends: Vec<f64> = segments
        .iter()
        .map(|s| s.end_s.max(s.start_s + min_display_dur))
        .collect();

    for i in 0..n {
        if i + 1 < n {
            ends[i] = ends[i].min(segments[i + 1].start_s - 0.05);
        }
    }

    let mut out = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        out.push_str(&(idx + 1).to_string());
        out.push('\n');
        out.push_str(&format_timestamp(segment.start_s));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(ends[idx]));
        out.push('\n');
        for line in &segment.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
