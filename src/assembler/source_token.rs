//! The assembler's sole external input (spec §4.1, §6, §9 "Dynamic field
//! naming in legacy inputs" — this is the one explicit deserialiser the
//! crate keeps; everything downstream consumes the IR instead).

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    Original,
    None,
    Translation,
    Absent,
}

/// One sub-word speech-recognition token, as returned by the upstream
/// service (spec §4.1). Field names are fixed by the wire contract in
/// spec §6.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SourceToken {
    pub text: String,
    #[serde(default)]
    pub start_ms: Option<i64>,
    #[serde(default)]
    pub end_ms: Option<i64>,
    pub confidence: f64,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub translation_status: Option<TranslationStatus>,
}

impl SourceToken {
    pub fn is_translation(&self) -> bool {
        matches!(self.translation_status, Some(TranslationStatus::Translation))
    }
}
