//! Title-marker contract for a Wiktionary language edition.
//!
//! The same compiled pattern decides which dump lines get indexed, where a
//! record starts inside its first line, and which section is a lemma's head.
//! Keeping it in one place means the index and the extractor cannot drift
//! apart.

use regex::Regex;
use std::sync::OnceLock;

/// Closing tag that ends the wikitext of a page in a MediaWiki XML dump.
pub const TEXT_SENTINEL: &str = "</text>";

static GERMAN_TITLE: OnceLock<Regex> = OnceLock::new();

/// A trait that defines how entries of one Wiktionary edition are marked.
pub trait Edition {
    /// A short name used for debugging and logging.
    const DEBUG_NAME: &'static str;

    /// Literal string that terminates a record's text span.
    const SENTINEL: &'static str = TEXT_SENTINEL;

    /// Compiled title pattern. Capture group 1 is the entry key.
    fn title_regex() -> &'static Regex;

    /// Returns the first title marker found in `line` as `(key, marker_start)`.
    fn match_title(line: &str) -> Option<(&str, usize)> {
        let caps = Self::title_regex().captures(line)?;
        let whole = caps.get(0)?;
        let key = caps.get(1)?;
        Some((key.as_str(), whole.start()))
    }

    /// Returns the byte position in `line` where the title marker for `key` starts.
    fn locate_title(line: &str, key: &str) -> Option<usize> {
        Self::title_regex()
            .captures_iter(line)
            .find(|caps| caps.get(1).is_some_and(|m| m.as_str() == key))
            .and_then(|caps| caps.get(0))
            .map(|m| m.start())
    }
}

/// Zero-cost marker struct for the German Wiktionary (de.wiktionary.org).
///
/// Entries open with a level-2 heading of the form
/// `== Haus ({{Sprache|Deutsch}}) ==`.
#[derive(Debug)]
pub struct German;

impl Edition for German {
    const DEBUG_NAME: &'static str = "dewiktionary";

    fn title_regex() -> &'static Regex {
        GERMAN_TITLE.get_or_init(|| {
            Regex::new(r"== (\w+) \(\{\{Sprache\|Deutsch\}\}\) ==")
                .expect("Invalid German title pattern")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Edition, German};

    #[test]
    fn matches_marker_inside_xml_line() {
        let line = r#"      <text bytes="12" xml:space="preserve">== Haus ({{Sprache|Deutsch}}) =="#;
        let (key, start) = German::match_title(line).unwrap();
        assert_eq!(key, "Haus");
        assert!(line[start..].starts_with("== Haus"));
    }

    #[test]
    fn keys_are_case_sensitive_and_unicode() {
        assert_eq!(
            German::match_title("== Äpfel ({{Sprache|Deutsch}}) ==").map(|(k, _)| k),
            Some("Äpfel")
        );
        assert_eq!(German::locate_title("== haus ({{Sprache|Deutsch}}) ==", "Haus"), None);
    }

    #[test]
    fn ignores_other_languages() {
        assert!(German::match_title("== house ({{Sprache|Englisch}}) ==").is_none());
    }

    #[test]
    fn locates_the_requested_key_among_several() {
        let line = "== Tor ({{Sprache|Deutsch}}) == == Tür ({{Sprache|Deutsch}}) ==";
        assert_eq!(German::locate_title(line, "Tür"), Some(32));
    }
}
