//! Error taxonomy for the conversion core (spec §7).

/// Fatal conditions the core can report. Never used for normal control flow.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ConversionError {
    /// A post-filter token is missing timing or carries a negative interval.
    /// Fatal to the entire conversion.
    #[error("malformed token at index {index}: {reason}")]
    MalformedToken { index: usize, reason: String },

    /// Zero tokens remain after filtering translation tokens.
    #[error("transcript is empty after filtering")]
    EmptyTranscript,

    /// The segmenter's DP exhausted its window and the greedy fallback also
    /// failed (e.g. a single merged word exceeds `max_cue_chars`). Fatal for
    /// the caption path only.
    #[error("segmentation infeasible at word index {word_index}")]
    SegmentationInfeasible { word_index: usize },
}

/// Non-fatal condition surfaced alongside otherwise-successful output.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ConversionWarning {
    /// A language code absent from the ISO-639-1 → BCP-47 table produced the
    /// sentinel `"??-??"`.
    UnknownLanguage { code: String },
}

pub type Result<T> = std::result::Result<T, ConversionError>;
