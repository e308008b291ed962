//! Editor-JSON emitter (spec §6 "Downstream — editor-JSON"): one segment
//! per sentence, split at `eos`.

use serde::Serialize;

use crate::error::ConversionWarning;
use crate::ir::{IrItem, Transcript, WordType};
use crate::lang;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorWordType {
    Word,
    Punctuation,
}

impl From<WordType> for EditorWordType {
    fn from(value: WordType) -> Self {
        match value {
            WordType::Word => EditorWordType::Word,
            WordType::Punctuation => EditorWordType::Punctuation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorWord {
    pub text: String,
    pub start: f64,
    pub duration: f64,
    pub confidence: f64,
    pub eos: bool,
    #[serde(rename = "type")]
    pub word_type: EditorWordType,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorSegment {
    pub start: f64,
    pub duration: f64,
    pub speaker: Option<String>,
    pub language: Option<String>,
    pub words: Vec<EditorWord>,
}

fn to_editor_word(item: &IrItem) -> EditorWord {
    EditorWord {
        text: item.text().to_string(),
        start: item.start_s(),
        duration: item.duration_s(),
        confidence: item.confidence(),
        eos: item.eos(),
        word_type: item.word_type().into(),
        tags: item.tags().to_vec(),
    }
}

fn finalize_segment(
    items: &[&IrItem],
    transcript: &Transcript,
    warnings: &mut Vec<ConversionWarning>,
) -> EditorSegment {
    let start = items.first().map_or(0.0, |i| i.start_s());
    let end = items.last().map_or(start, |i| i.end_s());

    let speaker = items
        .iter()
        .find_map(|i| i.speaker())
        .and_then(|label| transcript.speaker_by_label(label))
        .map(|info| info.uuid.to_string());

    let language = items.iter().find_map(|i| i.language()).map(|code| {
        let (bcp47, warning) = lang::to_bcp47_checked(code);
        if let Some(w) = warning {
            warnings.push(w);
        }
        bcp47.to_string()
    });

    EditorSegment {
        start,
        duration: end - start,
        speaker,
        language,
        words: items.iter().map(|i| to_editor_word(i)).collect(),
    }
}

/// Split `transcript` into sentences at `eos` and render each as an
/// [`EditorSegment`]. Returns any [`ConversionWarning`]s raised while
/// mapping language codes (spec §7 `UnknownLanguage`).
pub fn to_segments(transcript: &Transcript) -> (Vec<EditorSegment>, Vec<ConversionWarning>) {
    let mut segments = Vec::new();
    let mut warnings = Vec::new();
    let mut current: Vec<&IrItem> = Vec::new();

    for item in &transcript.words {
        let prev_was_eos_word = current.last().is_some_and(|prev| prev.eos());
        current.push(item);
        if item.is_sentence_terminator() && prev_was_eos_word {
            segments.push(finalize_segment(&current, transcript, &mut warnings));
            current.clear();
        }
    }
    if !current.is_empty() {
        segments.push(finalize_segment(&current, transcript, &mut warnings));
    }

    (segments, warnings)
}
