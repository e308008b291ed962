//! Segmenter input/output types (spec §3).

/// The segmenter's internal input word (spec §3 `CaptionWord`). Produced by
/// the caption adapter from the IR, consumed only by the segmenter.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionWord {
    /// Includes any attached trailing punctuation (post punctuation-merge).
    pub text: String,
    pub start_s: f64,
    pub end_s: f64,
    /// `true` for the synthetic dash word injected on a speaker change; such
    /// a word carries no visible content and is a forced segmentation break.
    pub is_speaker_marker: bool,
    /// `true` for the first word of a sentence (the transcript's first real
    /// word, or any word following a sentence terminator).
    pub is_segment_start: bool,
}

impl CaptionWord {
    pub fn duration_s(&self) -> f64 {
        self.end_s - self.start_s
    }
}

/// One caption cue (spec §3 `CaptionSegment`).
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSegment {
    pub start_s: f64,
    pub end_s: f64,
    /// 1 or 2 lines of visible text.
    pub lines: Vec<String>,
    pub has_speaker_prefix: bool,
}

impl CaptionSegment {
    pub fn duration_s(&self) -> f64 {
        self.end_s - self.start_s
    }
}
