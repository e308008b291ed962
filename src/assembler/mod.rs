//! The Assembler (spec §4.1): reconstructs whole words from sub-word
//! tokens, classifies punctuation, aggregates confidence, infers sentence
//! boundaries, and maps speakers and languages into the IR.

mod source_token;
pub mod speaker;

pub use source_token::{SourceToken, TranslationStatus};

use crate::error::{ConversionError, Result};
use crate::ir::{AssembledPunct, AssembledWord, IrItem, Transcript};
use crate::lang;

/// Punctuation marks that are their own word boundary (spec §4.1 word
/// boundary rules table). Note this is a superset of
/// [`crate::ir::MERGEABLE_PUNCTUATION`] — it also includes the en-dash,
/// which the assembler treats as standalone punctuation but which is
/// reserved downstream for the caption adapter's synthetic speaker-change
/// marker and so is never merged onto a preceding word.
const PUNCTUATION_MARKS: [&str; 9] = [".", ",", "?", "!", ";", ":", "…", "—", "–"];

fn is_standalone_punctuation(trimmed: &str) -> bool {
    PUNCTUATION_MARKS.contains(&trimmed)
}

fn ms_to_s(ms: i64) -> f64 {
    ms as f64 / 1000.0
}

/// In-progress word being accumulated across one or more sub-word tokens.
struct OpenWord {
    text: String,
    start_ms: i64,
    end_ms: i64,
    min_confidence: f64,
    speaker: Option<String>,
    language: Option<String>,
}

impl OpenWord {
    fn start(token: &SourceToken, start_ms: i64, end_ms: i64) -> Self {
        let mut text = token.text.clone();
        if let Some(stripped) = text.strip_prefix(' ') {
            text = stripped.to_string();
        }
        Self {
            text,
            start_ms,
            end_ms,
            min_confidence: token.confidence,
            speaker: token.speaker.clone(),
            language: token.language.clone(),
        }
    }

    fn append(&mut self, token: &SourceToken, end_ms: i64) {
        self.text.push_str(&token.text);
        self.end_ms = end_ms;
        self.min_confidence = self.min_confidence.min(token.confidence);
        if self.speaker.is_none() {
            self.speaker = token.speaker.clone();
        }
        if self.language.is_none() {
            self.language = token.language.clone();
        }
    }

    fn finish(self) -> AssembledWord {
        AssembledWord {
            text: self.text,
            start_s: ms_to_s(self.start_ms),
            duration_s: ms_to_s(self.end_ms - self.start_ms),
            confidence: self.min_confidence,
            eos: false,
            speaker: self.speaker,
            language: self.language,
            tags: Vec::new(),
        }
    }
}

/// Discard tokens carrying a `translation` status (spec §4.1 pre-filter)
/// and validate that every remaining token carries timing.
fn filter_and_validate(tokens: &[SourceToken]) -> Result<Vec<(usize, &SourceToken)>> {
    let filtered: Vec<(usize, &SourceToken)> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_translation())
        .collect();

    if filtered.is_empty() {
        return Err(ConversionError::EmptyTranscript);
    }

    for &(index, token) in &filtered {
        let (Some(start_ms), Some(end_ms)) = (token.start_ms, token.end_ms) else {
            return Err(ConversionError::MalformedToken {
                index,
                reason: "missing start_ms or end_ms after translation filtering".to_string(),
            });
        };
        if end_ms < start_ms {
            return Err(ConversionError::MalformedToken {
                index,
                reason: "end_ms precedes start_ms".to_string(),
            });
        }
    }

    Ok(filtered)
}

/// Fold sub-word tokens into whole words and standalone punctuation
/// (spec §4.1 word boundary rules table).
fn fold_words(tokens: &[(usize, &SourceToken)]) -> Vec<IrItem> {
    let mut items = Vec::new();
    let mut open: Option<OpenWord> = None;

    for &(_, token) in tokens {
        if token.text.is_empty() {
            tracing::debug!("skipping empty-text token");
            continue;
        }

        // start_ms/end_ms were validated to be present in filter_and_validate.
        let start_ms = token.start_ms.unwrap();
        let end_ms = token.end_ms.unwrap();

        let trimmed = token.text.trim();
        if is_standalone_punctuation(trimmed) {
            if let Some(w) = open.take() {
                items.push(IrItem::Word(w.finish()));
            }
            items.push(IrItem::Punct(AssembledPunct {
                text: trimmed.to_string(),
                start_s: ms_to_s(start_ms),
                duration_s: ms_to_s(end_ms - start_ms),
                confidence: token.confidence,
                speaker: token.speaker.clone(),
                language: token.language.clone(),
                tags: Vec::new(),
            }));
            continue;
        }

        let leading_space = token.text.starts_with(' ');
        let speaker_changed = open
            .as_ref()
            .is_some_and(|w| w.speaker != token.speaker && token.speaker.is_some());

        if leading_space || speaker_changed {
            if let Some(w) = open.take() {
                items.push(IrItem::Word(w.finish()));
            }
        }

        match &mut open {
            Some(w) => w.append(token, end_ms),
            None => open = Some(OpenWord::start(token, start_ms, end_ms)),
        }
    }

    if let Some(w) = open.take() {
        items.push(IrItem::Word(w.finish()));
    }

    items
}

/// Second pass: mark the word immediately preceding a sentence-terminating
/// punctuation mark as `eos=true` (spec §4.1 EOS inference).
fn infer_eos(items: &mut [IrItem]) {
    for idx in 0..items.len() {
        if !items[idx].is_sentence_terminator() || idx == 0 {
            continue;
        }
        if let IrItem::Word(w) = &mut items[idx - 1] {
            w.eos = true;
        }
    }
}

fn rewrite_speakers(items: &mut [IrItem], table: &[crate::ir::SpeakerInfo]) {
    for item in items.iter_mut() {
        let resolved = speaker::resolve(table, item.speaker());
        match item {
            IrItem::Word(w) => w.speaker = resolved,
            IrItem::Punct(p) => p.speaker = resolved,
        }
    }
}

/// Assemble a finite ordered sequence of [`SourceToken`]s into a
/// [`Transcript`] (spec §4.1).
///
/// Never fails on well-formed input. Fails with [`ConversionError`] when the
/// translation pre-filter leaves zero tokens, or a remaining token is
/// missing timing / carries a negative interval.
pub fn assemble(tokens: &[SourceToken], source_name: Option<String>) -> Result<Transcript> {
    let filtered = filter_and_validate(tokens)?;

    let mut items = fold_words(&filtered);
    infer_eos(&mut items);

    let labels: Vec<Option<&str>> = filtered.iter().map(|(_, t)| t.speaker.as_deref()).collect();
    let table = speaker::build_table(labels.into_iter());
    rewrite_speakers(&mut items, &table);

    let primary_language = lang::most_frequent(
        items
            .iter()
            .filter(|i| i.is_word())
            .filter_map(|i| i.language()),
    );

    let duration_s = items.last().map(|i| i.end_s()).unwrap_or(0.0);

    Ok(Transcript {
        words: items,
        speakers: table,
        primary_language,
        source_name,
        duration_s,
    })
}
