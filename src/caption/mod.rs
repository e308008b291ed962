//! Caption segmenter subsystem (spec §4.2-§4.3): turns a [`Transcript`] into
//! time-bounded, line-broken caption cues.

mod adapter;
mod config;
mod segmenter;
mod types;

pub use config::{Config, Weights, SWEDISH_WEAK_WORDS};
pub use segmenter::visible_len;
pub use types::{CaptionSegment, CaptionWord};

use crate::error::Result;
use crate::ir::Transcript;

/// Run the full caption pipeline: adapt the IR into [`CaptionWord`]s, then
/// segment those words into [`CaptionSegment`]s under `config`.
pub fn captions(transcript: &Transcript, config: &Config) -> Result<Vec<CaptionSegment>> {
    let words = adapter::adapt(transcript);
    segmenter::segment(&words, config)
}

/// Adapt a transcript into the segmenter's intermediate word stream, without
/// segmenting it. Exposed for callers that want to inspect or test the
/// adapter pass independently (spec §4.2).
pub fn adapt(transcript: &Transcript) -> Vec<CaptionWord> {
    adapter::adapt(transcript)
}

/// Segment an already-adapted word stream. Exposed for callers that build
/// their own `CaptionWord` stream outside of [`adapt`].
pub fn segment(words: &[CaptionWord], config: &Config) -> Result<Vec<CaptionSegment>> {
    segmenter::segment(words, config)
}
