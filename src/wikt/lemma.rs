//! Field extraction from German Wiktionary entries.
//!
//! An entry is laid out as a level-2 head naming the word and its language,
//! one level-3 section per part of speech, and level-4 subsections such as
//! the translation table:
//!
//! ```text
//! == Haus ({{Sprache|Deutsch}}) ==
//! === {{Wortart|Substantiv|Deutsch}}, {{n}} ===
//! {{Deutsch Substantiv Übersicht
//! |Genus=n
//! |Nominativ Singular=Haus
//! ...}}
//! ==== {{Übersetzungen}} ====
//! *{{en}}: [1] {{Ü|en|house}}
//! ```
//!
//! Which templates or list items carry inflection data depends on the part
//! of speech; that mapping lives in a [`PatternTable`] built once and passed
//! to the [`LemmaParser`] by reference.

use std::collections::HashMap;
use std::sync::OnceLock;
use log::{debug, trace};
use regex::Regex;

use super::format::sections::Sections;
use super::types::edition::{Edition, German};
use super::types::error::{Result, WiktError};
use super::types::models::{Category, Inflection, Lemma, Section, Translation};

/// Version of the built-in German pattern table.
pub const PATTERN_TABLE_VERSION: u32 = 1;

const OVERVIEW_TEMPLATE: &str = r"^Deutsch (\w+) Übersicht";
const PRONOUN_TABLE_TEMPLATE: &str = r"^Pronomina-Tabelle";
const INFLECTED_FORM_ITEM: &str = r"^([\w\s\.]+)'''\[\[(\w+)\]\]'''";

static WORD_CLASS_PATTERN: OnceLock<Regex> = OnceLock::new();
static TRANSLATION_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches `{{Wortart|Substantiv|Deutsch}}, {{n}}, {{Wortart|Eigenname|Deutsch}}`.
fn word_class_regex() -> &'static Regex {
    WORD_CLASS_PATTERN.get_or_init(|| {
        Regex::new(
            r"\{\{Wortart\|([\w\s]+)\|Deutsch\}\}(?:, \{\{([fmn]+)\}\})?(?:, \{\{Wortart\|([\w\s]+)\|Deutsch\}\})?",
        )
        .expect("Invalid word class regex pattern")
    })
}

/// Matches `*{{en}}: [1] {{Ü|en|house}}` with an optional trailing gender template.
fn translation_regex() -> &'static Regex {
    TRANSLATION_PATTERN.get_or_init(|| {
        Regex::new(r"\*\{\{(\w+)\}\}: (?:\[[^\]]*\] )?\{\{Ü\|\w+\|([^}|]+)\}\}(?: \{\{(\w+)\}\})?")
            .expect("Invalid translation regex pattern")
    })
}

/// Versioned lookup table of inflection extraction patterns, keyed by word class.
#[derive(Debug, Clone)]
pub struct PatternTable {
    pub version: u32,
    template_patterns: HashMap<String, Regex>,
    list_item_patterns: HashMap<String, Regex>,
    translation_languages: Vec<String>,
}

impl PatternTable {
    /// An empty table.
    pub fn new(version: u32) -> Self {
        Self {
            version,
            template_patterns: HashMap::new(),
            list_item_patterns: HashMap::new(),
            translation_languages: Vec::new(),
        }
    }

    /// The built-in table for the German Wiktionary.
    pub fn german() -> Self {
        let overview = Regex::new(OVERVIEW_TEMPLATE).expect("Invalid overview template pattern");
        let pronouns =
            Regex::new(PRONOUN_TABLE_TEMPLATE).expect("Invalid pronoun table template pattern");
        let inflected = Regex::new(INFLECTED_FORM_ITEM).expect("Invalid inflected form pattern");

        let mut table = Self::new(PATTERN_TABLE_VERSION);
        for word_class in ["Verb", "Adjektiv", "Indefinitpronomen", "Substantiv"] {
            table.template_patterns.insert(word_class.to_string(), overview.clone());
        }
        table.template_patterns.insert("Artikel".to_string(), pronouns);
        for word_class in ["Konjugierte Form", "Deklinierte Form"] {
            table.list_item_patterns.insert(word_class.to_string(), inflected.clone());
        }
        table.translation_languages = ["en", "fr", "it", "es"].map(String::from).to_vec();
        table
    }

    /// Register the template-name pattern whose arguments hold the inflections of `word_class`.
    pub fn with_template(mut self, word_class: &str, pattern: &str) -> Result<Self> {
        let regex = compile(pattern)?;
        self.template_patterns.insert(word_class.to_string(), regex);
        Ok(self)
    }

    /// Register the list-item pattern (two groups: name, value) used for `word_class`.
    pub fn with_list_item(mut self, word_class: &str, pattern: &str) -> Result<Self> {
        let regex = compile(pattern)?;
        self.list_item_patterns.insert(word_class.to_string(), regex);
        Ok(self)
    }

    /// Replace the set of language codes kept from translation tables.
    pub fn with_translation_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translation_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn template_pattern(&self, word_class: &str) -> Option<&Regex> {
        self.template_patterns.get(word_class)
    }

    pub fn list_item_pattern(&self, word_class: &str) -> Option<&Regex> {
        self.list_item_patterns.get(word_class)
    }

    pub fn accepts_language(&self, lang: &str) -> bool {
        self.translation_languages.iter().any(|l| l == lang)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::german()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| WiktError::InvalidPattern(format!("{}: {}", pattern, e)))
}

/// Turns raw entry text into a [`Lemma`].
#[derive(Debug, Clone, Copy)]
pub struct LemmaParser<'t> {
    table: &'t PatternTable,
}

impl<'t> LemmaParser<'t> {
    pub fn new(table: &'t PatternTable) -> Self {
        Self { table }
    }

    /// Parse the entry text of `term`.
    ///
    /// The first section must be the German head; otherwise the lemma comes
    /// back with no root and no categories. Parsing stops at the next
    /// level-2 section, which belongs to another language.
    pub fn parse(&self, term: &str, wikitext: &str) -> Lemma {
        let mut sections = Sections::new(wikitext);
        let root = sections.next().and_then(|head| self.parse_head(&head));
        let mut categories: Vec<Category> = Vec::new();

        if root.is_some() {
            for section in sections.take_while(|s| s.level > 2) {
                match section.level {
                    3 => categories.extend(self.parse_category(&section)),
                    4 => {
                        if let Some(category) = categories.last_mut() {
                            self.parse_translations(category, &section);
                        }
                    }
                    _ => {}
                }
            }
        } else {
            debug!("No German head section in entry for '{}'", term);
        }

        Lemma {
            term: term.to_string(),
            wikitext: wikitext.to_string(),
            root,
            categories,
        }
    }

    /// Returns the head word if `section` is a level-2 German head.
    pub fn parse_head(&self, section: &Section<'_>) -> Option<String> {
        if section.level != 2 {
            return None;
        }
        German::match_title(section.heading).map(|(key, _)| key.to_string())
    }

    /// Builds a category from a level-3 part-of-speech section.
    pub fn parse_category(&self, section: &Section<'_>) -> Option<Category> {
        let caps = word_class_regex().captures(section.heading)?;
        let word_class = caps.get(1)?.as_str().trim().to_string();
        let gender = caps.get(2).map(|m| m.as_str().to_string());
        let name = [caps.get(1), caps.get(2), caps.get(3)]
            .into_iter()
            .flatten()
            .map(|m| m.as_str().trim())
            .collect::<Vec<_>>()
            .join(", ");

        let inflections = if let Some(pattern) = self.table.template_pattern(&word_class) {
            template_inflections(section.body, pattern)
        } else if let Some(pattern) = self.table.list_item_pattern(&word_class) {
            list_inflections(section.body, pattern)
        } else {
            Vec::new()
        };
        trace!("Category '{}': {} inflections", name, inflections.len());

        Some(Category {
            name,
            word_class,
            gender,
            inflections,
            translations: Vec::new(),
        })
    }

    /// Adds translations from a `{{Übersetzungen}}` section to `category`.
    pub fn parse_translations(&self, category: &mut Category, section: &Section<'_>) {
        if section.title() != "{{Übersetzungen}}" {
            return;
        }
        for caps in translation_regex().captures_iter(section.body) {
            let lang = &caps[1];
            if !self.table.accepts_language(lang) {
                continue;
            }
            let value = [caps.get(2), caps.get(3)]
                .into_iter()
                .flatten()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            category.translations.push(Translation {
                lang: lang.to_string(),
                value,
            });
        }
    }
}

/// A template call found at nesting depth zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    pub name: &'a str,
    /// Named arguments keep their name; positional ones are numbered from 1.
    pub args: Vec<(String, &'a str)>,
}

/// Find the outermost `{{...}}` template calls in `text`.
pub fn top_level_templates(text: &str) -> Vec<Template<'_>> {
    let bytes = text.as_bytes();
    let mut templates = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;

    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'{', b'{') => {
                if depth == 0 {
                    start = i + 2;
                }
                depth += 1;
                i += 2;
            }
            (b'}', b'}') if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    templates.push(parse_template(&text[start..i]));
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    templates
}

fn parse_template(body: &str) -> Template<'_> {
    let mut parts = split_arguments(body).into_iter();
    let name = parts.next().unwrap_or_default().trim();
    let mut positional = 0usize;
    let args = parts
        .map(|part| match part.split_once('=') {
            Some((key, value)) if !key.contains("{{") && !key.contains("[[") => {
                (key.trim().to_string(), value.trim())
            }
            _ => {
                positional += 1;
                (positional.to_string(), part.trim())
            }
        })
        .collect();
    Template { name, args }
}

/// Split a template body at `|` characters outside nested `{{ }}` and `[[ ]]`.
fn split_arguments(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut last = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1).copied()) {
            (b'{', Some(b'{')) | (b'[', Some(b'[')) => {
                depth += 1;
                i += 2;
                continue;
            }
            (b'}', Some(b'}')) | (b']', Some(b']')) if depth > 0 => {
                depth -= 1;
                i += 2;
                continue;
            }
            (b'|', _) if depth == 0 => {
                parts.push(&body[last..i]);
                last = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&body[last..]);
    parts
}

fn template_inflections(body: &str, pattern: &Regex) -> Vec<Inflection> {
    top_level_templates(body)
        .into_iter()
        .filter(|t| pattern.is_match(t.name))
        .flat_map(|t| t.args)
        .map(|(name, value)| Inflection {
            name,
            value: value.to_string(),
        })
        .collect()
}

fn list_inflections(body: &str, pattern: &Regex) -> Vec<Inflection> {
    body.lines()
        .filter_map(|line| line.trim_start().strip_prefix('*'))
        .map(|item| item.trim_start_matches('*'))
        .filter_map(|item| pattern.captures(item))
        .filter_map(|caps| {
            Some(Inflection {
                name: caps.get(1)?.as_str().trim().to_string(),
                value: caps.get(2)?.as_str().to_string(),
            })
        })
        .collect()
}
