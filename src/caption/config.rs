//! Segmenter configuration (spec §4.3, §9 "Process-wide configuration").
//!
//! An explicit, immutable value threaded through every call — never
//! process-wide mutable state — so a caller can run [`Config::broadcast`]
//! and [`Config::social`] concurrently without interference (REDESIGN
//! FLAG, resolved).

/// Named scalar weights for the line-break and segment cost functions
/// (spec §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub len_deviation: f64,
    pub single_line_long: f64,
    pub balance: f64,
    pub orphan: f64,
    pub weak_end: f64,
    pub short_end: f64,
    pub punct_bonus: f64,
    pub comma_bonus: f64,
    pub cps_above_target: f64,
    pub cps_above_max: f64,
    pub cue_len_deviation: f64,
    pub cue_dur_below: f64,
    pub cue_dur_above: f64,
    pub boundary_punct_bonus: f64,
    pub boundary_weak_end: f64,
    pub boundary_no_punct: f64,
    pub speaker_change_bonus: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            len_deviation: 0.05,
            single_line_long: 0.3,
            balance: 0.2,
            orphan: 0.4,
            weak_end: 1.2,
            short_end: 0.8,
            punct_bonus: -1.0,
            comma_bonus: -0.4,
            cps_above_target: 0.5,
            cps_above_max: 2.0,
            cue_len_deviation: 0.03,
            cue_dur_below: 2.0,
            cue_dur_above: 1.0,
            boundary_punct_bonus: -1.5,
            boundary_weak_end: 0.6,
            boundary_no_punct: 1.0,
            speaker_change_bonus: 0.5,
        }
    }
}

/// Segmenter configuration (spec §4.3). Presets ([`Config::broadcast`],
/// [`Config::social`]) are immutable values; overrides produce a derived
/// value via the `with_*` builders.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_lines: u8,
    pub max_line_chars: usize,
    pub max_cue_chars: usize,
    pub target_line_chars: usize,
    pub prefer_split_over: usize,
    pub min_line_chars: usize,
    pub target_cps: f64,
    pub max_cps: f64,
    pub min_cue_dur: f64,
    pub max_cue_dur: f64,
    pub min_display_dur: f64,
    pub target_cue_chars: usize,
    pub max_lookback_words: usize,
    pub weights: Weights,
}

impl Config {
    /// 2×42 chars, tuned for Swedish SDH broadcast delivery.
    pub fn broadcast() -> Self {
        Self {
            max_lines: 2,
            max_line_chars: 42,
            max_cue_chars: 84,
            target_line_chars: 36,
            prefer_split_over: 40,
            min_line_chars: 10,
            target_cps: 17.0,
            max_cps: 20.0,
            min_cue_dur: 1.0,
            max_cue_dur: 7.0,
            min_display_dur: 0.8,
            target_cue_chars: 60,
            max_lookback_words: 18,
            weights: Weights::default(),
        }
    }

    /// 1×25 chars, single-line social delivery.
    pub fn social() -> Self {
        Self {
            max_lines: 1,
            max_line_chars: 25,
            max_cue_chars: 25,
            target_line_chars: 20,
            prefer_split_over: 25,
            min_line_chars: 5,
            target_cps: 15.0,
            max_cps: 18.0,
            min_cue_dur: 0.8,
            max_cue_dur: 4.0,
            min_display_dur: 0.6,
            target_cue_chars: 20,
            max_lookback_words: 6,
            weights: Weights::default(),
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_lookback_words(mut self, max_lookback_words: usize) -> Self {
        self.max_lookback_words = max_lookback_words;
        self
    }
}

/// Swedish function words that make poor line terminators in SDH (spec
/// §4.3). Kept as plain `&str`s (not a `HashSet`) since the list is short
/// and membership is checked once per candidate line, not in a hot loop.
pub const SWEDISH_WEAK_WORDS: &[&str] = &[
    "och", "att", "som", "men", "eller", "utan", "eftersom", "medan", "i", "på", "av", "för",
    "med", "till", "om", "från", "kring", "mot", "via", "under", "över", "mellan", "innan",
    "efter", "trots", "när", "då", "så", "det", "de", "den", "detta", "dessa", "man", "vi", "jag",
    "du", "han", "hon", "ni", "en", "ett", "där", "här", "ju", "är", "var", "blir", "ska", "kan",
    "har", "hade", "får", "vill", "kommer", "inte",
];
