//! ISO 639-1 → BCP-47 language mapping (spec §6) and the "most frequent,
//! ties to first occurrence" language-selection rule used by the assembler
//! (spec §4.1 "Language mapping").

use crate::error::ConversionWarning;

/// Sentinel returned for a code absent from the table.
pub const UNMAPPED_SENTINEL: &str = "??-??";

/// Map an ISO 639-1 code to its BCP-47 tag (spec §6). Unknown codes map to
/// the sentinel `"??-??"` — non-fatal, surfaced via [`to_bcp47_checked`].
pub fn to_bcp47(iso: &str) -> &'static str {
    match iso {
        "sv" => "sv-se",
        "en" => "en-us",
        "da" => "da-dk",
        "no" => "nb-no",
        "fi" => "fi-fi",
        "de" => "de-de",
        "fr" => "fr-fr",
        "es" => "es-es",
        "nl" => "nl-nl",
        "it" => "it-it",
        "pt" => "pt-br",
        "ja" => "ja-jp",
        "ko" => "ko-kr",
        "zh" => "cmn-hans",
        "ar" => "ar-sa",
        "ru" => "ru-ru",
        "pl" => "pl-pl",
        "tr" => "tr-tr",
        "hi" => "hi-in",
        _ => UNMAPPED_SENTINEL,
    }
}

/// Same as [`to_bcp47`], but also returns the non-fatal warning an emitter
/// should log (spec §7 `UnknownLanguage`).
pub fn to_bcp47_checked(iso: &str) -> (&'static str, Option<ConversionWarning>) {
    let mapped = to_bcp47(iso);
    if mapped == UNMAPPED_SENTINEL {
        (
            mapped,
            Some(ConversionWarning::UnknownLanguage {
                code: iso.to_string(),
            }),
        )
    } else {
        (mapped, None)
    }
}

/// The most frequent code in `codes`, ties broken by first occurrence.
/// Returns `None` if `codes` is empty.
pub fn most_frequent<'a>(codes: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for code in codes {
        match counts.iter_mut().find(|(k, _)| *k == code) {
            Some(entry) => entry.1 += 1,
            None => counts.push((code, 1)),
        }
    }

    let max_count = counts.iter().map(|(_, n)| *n).max()?;
    counts
        .into_iter()
        .find(|(_, n)| *n == max_count)
        .map(|(code, _)| code.to_string())
}
