use transcript_core::SourceToken;

pub fn token(
    text: &str,
    start_ms: i64,
    end_ms: i64,
    confidence: f64,
    speaker: Option<&str>,
    language: Option<&str>,
) -> SourceToken {
    SourceToken {
        text: text.to_string(),
        start_ms: Some(start_ms),
        end_ms: Some(end_ms),
        confidence,
        speaker: speaker.map(str::to_string),
        language: language.map(str::to_string),
        translation_status: None,
    }
}

/// A long, sentence-structured stream of tokens: ten sentences of six
/// words each, every sentence terminated with a full stop. Long enough to
/// exercise the segmenter's DP window repeatedly.
pub fn long_tokenized_speech() -> Vec<SourceToken> {
    const SENTENCE: &[&str] = &["the", "quick", "brown", "fox", "jumps", "away"];
    let mut tokens = Vec::new();
    let mut t: i64 = 0;

    for sentence_idx in 0..10 {
        for (word_idx, word) in SENTENCE.iter().enumerate() {
            let start = t;
            let end = start + 180;
            t = end + 20;
            let text = if sentence_idx == 0 && word_idx == 0 {
                word.to_string()
            } else {
                format!(" {word}")
            };
            tokens.push(token(&text, start, end, 0.9, Some("1"), Some("sv")));
        }
        let start = t;
        let end = start + 60;
        t = end + 100;
        tokens.push(token(".", start, end, 0.95, Some("1"), Some("sv")));
    }

    tokens
}
