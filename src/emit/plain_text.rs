//! Plain-text emitter (spec §2, `SPEC_FULL.md` §6): flattens a
//! [`Transcript`] back into ordinary prose, reattaching punctuation to its
//! preceding word and prefixing a new line with the speaker's display name
//! whenever the speaker changes.

use crate::ir::Transcript;

/// Render `transcript` as plain text: words separated by single spaces,
/// punctuation attached directly to the word it follows, with a
/// `"Speaker N: "` prefix on its own line whenever the speaker changes.
pub fn to_plain_text(transcript: &Transcript) -> String {
    let mut out = String::new();
    let mut current_speaker: Option<Option<&str>> = None;

    for item in &transcript.words {
        if item.is_punct() {
            out.push_str(item.text());
            continue;
        }

        let speaker = item.speaker();
        if current_speaker != Some(speaker) {
            if !out.is_empty() {
                out.push('\n');
            }
            if let Some(label) = speaker.and_then(|l| transcript.speaker_by_label(l)) {
                out.push_str(&label.display_name);
                out.push_str(": ");
            }
            current_speaker = Some(speaker);
        } else if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
            out.push(' ');
        }
        out.push_str(item.text());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AssembledPunct, AssembledWord, IrItem};

    #[test]
    fn reattaches_punctuation_without_a_leading_space() {
        let words = vec![
            IrItem::Word(AssembledWord {
                text: "How".into(),
                start_s: 0.0,
                duration_s: 0.1,
                confidence: 0.9,
                eos: false,
                speaker: None,
                language: None,
                tags: vec![],
            }),
            IrItem::Word(AssembledWord {
                text: "are".into(),
                start_s: 0.2,
                duration_s: 0.1,
                confidence: 0.9,
                eos: false,
                speaker: None,
                language: None,
                tags: vec![],
            }),
            IrItem::Punct(AssembledPunct {
                text: "?".into(),
                start_s: 0.3,
                duration_s: 0.02,
                confidence: 0.9,
                speaker: None,
                language: None,
                tags: vec![],
            }),
        ];
        let transcript = Transcript {
            words,
            speakers: vec![],
            primary_language: None,
            source_name: None,
            duration_s: 0.32,
        };
        assert_eq!(to_plain_text(&transcript), "How are?");
    }

    #[test]
    fn prefixes_a_new_line_with_the_speaker_on_change() {
        use crate::ir::SpeakerInfo;
        use uuid::Uuid;

        let words = vec![
            IrItem::Word(AssembledWord {
                text: "Hello".into(),
                start_s: 0.0,
                duration_s: 0.3,
                confidence: 0.9,
                eos: false,
                speaker: Some("1".into()),
                language: None,
                tags: vec![],
            }),
            IrItem::Word(AssembledWord {
                text: "Hi".into(),
                start_s: 1.0,
                duration_s: 0.3,
                confidence: 0.9,
                eos: false,
                speaker: Some("2".into()),
                language: None,
                tags: vec![],
            }),
            IrItem::Word(AssembledWord {
                text: "there".into(),
                start_s: 1.4,
                duration_s: 0.3,
                confidence: 0.9,
                eos: false,
                speaker: Some("2".into()),
                language: None,
                tags: vec![],
            }),
        ];
        let transcript = Transcript {
            words,
            speakers: vec![
                SpeakerInfo {
                    source_label: "1".into(),
                    display_name: "Speaker 1".into(),
                    uuid: Uuid::nil(),
                },
                SpeakerInfo {
                    source_label: "2".into(),
                    display_name: "Speaker 2".into(),
                    uuid: Uuid::nil(),
                },
            ],
            primary_language: None,
            source_name: None,
            duration_s: 1.7,
        };
        assert_eq!(
            to_plain_text(&transcript),
            "Speaker 1: Hello\nSpeaker 2: Hi there"
        );
    }
}
