//! The Intermediate Representation (spec §3): the Assembler's sole output and
//! the read-only input to every downstream formatter.

use uuid::Uuid;

/// Sentence-terminating punctuation marks (spec §3 invariant 3, §4.1 EOS
/// inference).
pub const SENTENCE_TERMINATORS: [&str; 3] = [".", "?", "!"];

/// Punctuation that merges onto a preceding word in the caption adapter
/// (spec §4.2 rule 1) and the kinetic bucketiser (spec §4.4). The em-dash
/// `—` (U+2014) is distinct from the en-dash `–` (U+2013) reserved for the
/// synthetic speaker-change marker, so both belong here per spec.
pub const MERGEABLE_PUNCTUATION: [&str; 8] = [".", ",", "?", "!", ";", ":", "…", "—"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordType {
    Word,
    Punctuation,
}

/// One assembled, whole word (spec §3 `AssembledWord`, word case).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssembledWord {
    pub text: String,
    pub start_s: f64,
    pub duration_s: f64,
    pub confidence: f64,
    pub eos: bool,
    pub speaker: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
}

/// One stand-alone punctuation mark (spec §3 `AssembledWord`, punctuation
/// case). Carries the same timing/confidence fields but never an `eos` flag
/// — only words can be sentence-final.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssembledPunct {
    pub text: String,
    pub start_s: f64,
    pub duration_s: f64,
    pub confidence: f64,
    pub speaker: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
}

/// The IR's word stream is heterogeneous: words and punctuation interleaved
/// in one ordered sequence. Modelled as a tagged variant (spec §9
/// "Heterogeneous word sequences") so a caller handling both cases is
/// checked exhaustively by the compiler, instead of branching on a
/// `word_type` field at every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum IrItem {
    Word(AssembledWord),
    Punct(AssembledPunct),
}

impl IrItem {
    pub fn text(&self) -> &str {
        match self {
            IrItem::Word(w) => &w.text,
            IrItem::Punct(p) => &p.text,
        }
    }

    pub fn start_s(&self) -> f64 {
        match self {
            IrItem::Word(w) => w.start_s,
            IrItem::Punct(p) => p.start_s,
        }
    }

    pub fn duration_s(&self) -> f64 {
        match self {
            IrItem::Word(w) => w.duration_s,
            IrItem::Punct(p) => p.duration_s,
        }
    }

    pub fn end_s(&self) -> f64 {
        self.start_s() + self.duration_s()
    }

    pub fn confidence(&self) -> f64 {
        match self {
            IrItem::Word(w) => w.confidence,
            IrItem::Punct(p) => p.confidence,
        }
    }

    pub fn speaker(&self) -> Option<&str> {
        match self {
            IrItem::Word(w) => w.speaker.as_deref(),
            IrItem::Punct(p) => p.speaker.as_deref(),
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            IrItem::Word(w) => w.language.as_deref(),
            IrItem::Punct(p) => p.language.as_deref(),
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            IrItem::Word(w) => &w.tags,
            IrItem::Punct(p) => &p.tags,
        }
    }

    pub fn word_type(&self) -> WordType {
        match self {
            IrItem::Word(_) => WordType::Word,
            IrItem::Punct(_) => WordType::Punctuation,
        }
    }

    /// `eos` is always `false` for punctuation — only the word preceding a
    /// sentence terminator carries the flag (spec §3 invariant 3).
    pub fn eos(&self) -> bool {
        matches!(self, IrItem::Word(w) if w.eos)
    }

    pub fn is_word(&self) -> bool {
        matches!(self, IrItem::Word(_))
    }

    pub fn is_punct(&self) -> bool {
        matches!(self, IrItem::Punct(_))
    }

    pub fn is_sentence_terminator(&self) -> bool {
        self.is_punct() && SENTENCE_TERMINATORS.contains(&self.text())
    }

    pub fn is_mergeable_punct(&self) -> bool {
        self.is_punct() && MERGEABLE_PUNCTUATION.contains(&self.text())
    }
}

/// A unique speaker (spec §3 `SpeakerInfo`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeakerInfo {
    pub source_label: String,
    pub display_name: String,
    pub uuid: Uuid,
}

/// The IR root (spec §3 `Transcript`). Produced in one pass by the
/// Assembler, consumed read-only by every formatter — never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub words: Vec<IrItem>,
    pub speakers: Vec<SpeakerInfo>,
    pub primary_language: Option<String>,
    pub source_name: Option<String>,
    pub duration_s: f64,
}

impl Transcript {
    pub fn speaker_by_label(&self, label: &str) -> Option<&SpeakerInfo> {
        self.speakers.iter().find(|s| s.source_label == label)
    }

    /// Check the invariants in spec §3. Exercised by tests and available to
    /// callers building a `Transcript` outside the Assembler (e.g. fixtures).
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut prev_start = f64::NEG_INFINITY;
        for (idx, item) in self.words.iter().enumerate() {
            if item.start_s() < prev_start {
                return Err(format!("word {idx} is out of start_s order"));
            }
            prev_start = item.start_s();

            if item.duration_s() < 0.0 {
                return Err(format!("word {idx} has negative duration_s"));
            }

            if let Some(label) = item.speaker() {
                if self.speaker_by_label(label).is_none() {
                    return Err(format!("word {idx} references unknown speaker {label}"));
                }
            }

            if !item.tags().is_empty() {
                return Err(format!("word {idx} has non-empty tags"));
            }
        }

        for (idx, item) in self.words.iter().enumerate() {
            if !item.is_word() {
                continue;
            }
            let next_is_terminator = self.words.get(idx + 1).is_some_and(|n| n.is_sentence_terminator());
            if item.eos() != next_is_terminator {
                return Err(format!("word {idx} has eos={} but next-is-terminator={}", item.eos(), next_is_terminator));
            }
        }

        Ok(())
    }
}
