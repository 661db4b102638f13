use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wikt_reader::{
    Inflection, Lemma, PatternTable, RecordSource, Result, StoreOptions, Translation, WiktError,
    Wiktionary,
};

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("fixtures");
    for part in parts {
        p.push(part);
    }
    p
}

fn open_sample(dir: &TempDir) -> Wiktionary {
    let path = dir.path().join("dewiktionary-sample.xml");
    fs::copy(fixture_path(&["dewiktionary-sample.xml"]), &path).unwrap();
    Wiktionary::local(&path).unwrap()
}

fn inflections(pairs: &[(&str, &str)]) -> Vec<Inflection> {
    pairs
        .iter()
        .map(|(name, value)| Inflection {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn translations(pairs: &[(&str, &str)]) -> Vec<Translation> {
    pairs
        .iter()
        .map(|(lang, value)| Translation {
            lang: lang.to_string(),
            value: value.to_string(),
        })
        .collect()
}

/// In-memory backend, keyed like the dump.
struct MemorySource(HashMap<String, String>);

impl MemorySource {
    fn with(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl RecordSource for MemorySource {
    fn fetch(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.0.get(key).cloned())
    }
}

struct FailingSource;

impl RecordSource for FailingSource {
    fn fetch(&mut self, _key: &str) -> Result<Option<String>> {
        Err(WiktError::Remote("connection refused".to_string()))
    }
}

#[test]
fn noun_with_overview_template_and_translations() {
    let dir = TempDir::new().unwrap();
    let mut dict = open_sample(&dir);
    let lemma = dict.query("Haus").unwrap().unwrap();

    assert_eq!(lemma.term, "Haus");
    assert_eq!(lemma.root.as_deref(), Some("Haus"));
    assert_eq!(lemma.categories.len(), 1);

    let noun = &lemma.categories[0];
    assert_eq!(noun.name, "Substantiv, n");
    assert_eq!(noun.word_class, "Substantiv");
    assert_eq!(noun.gender.as_deref(), Some("n"));
    assert_eq!(
        noun.inflections,
        inflections(&[
            ("Genus", "n"),
            ("Nominativ Singular", "Haus"),
            ("Nominativ Plural", "Häuser"),
            ("Genitiv Singular", "Hauses"),
            ("Genitiv Plural", "Häuser"),
            ("Bild", "Haus.jpg"),
        ])
    );
    assert_eq!(
        noun.translations,
        translations(&[("en", "house"), ("fr", "maison, f"), ("it", "casa, f")])
    );
    assert!(lemma.has_inflections());
}

#[test]
fn verb_with_overview_template() {
    let dir = TempDir::new().unwrap();
    let mut dict = open_sample(&dir);
    let lemma = dict.query("gehen").unwrap().unwrap();

    let verb = &lemma.categories[0];
    assert_eq!(verb.name, "Verb");
    assert_eq!(verb.gender, None);
    assert_eq!(verb.inflections.len(), 6);
    assert_eq!(
        verb.inflections[2],
        Inflection {
            name: "Präsens_er, sie, es".to_string(),
            value: "geht".to_string(),
        }
    );
    assert_eq!(
        verb.translations,
        translations(&[("en", "go"), ("es", "ir")])
    );
}

#[test]
fn inflected_form_points_back_to_its_lemma() {
    let dir = TempDir::new().unwrap();
    let mut dict = open_sample(&dir);
    let lemma = dict.query("ging").unwrap().unwrap();

    assert_eq!(lemma.root.as_deref(), Some("ging"));
    let form = &lemma.categories[0];
    assert_eq!(form.name, "Konjugierte Form");
    assert_eq!(
        form.inflections,
        inflections(&[
            ("1. Person Singular Indikativ Präteritum Aktiv des Verbs", "gehen"),
            ("3. Person Singular Indikativ Präteritum Aktiv des Verbs", "gehen"),
        ])
    );
    assert!(form.translations.is_empty());
}

#[test]
fn other_language_sections_are_ignored() {
    let dir = TempDir::new().unwrap();
    let mut dict = open_sample(&dir);
    let lemma = dict.query("Hand").unwrap().unwrap();

    assert_eq!(lemma.categories.len(), 1);
    assert_eq!(lemma.categories[0].name, "Substantiv, f");
    assert_eq!(lemma.categories[0].translations, translations(&[("en", "hand")]));
    assert!(lemma.wikitext.contains("({{Sprache|Englisch}})"));
}

#[test]
fn unknown_words_are_not_found() {
    let dir = TempDir::new().unwrap();
    let mut dict = open_sample(&dir);
    assert_eq!(dict.query("house").unwrap(), None);
    assert_eq!(dict.wikitext("Nichtwort").unwrap(), None);
}

#[test]
fn custom_pattern_table_changes_extraction() {
    let dir = TempDir::new().unwrap();
    let patterns = PatternTable::german().with_translation_languages(["nl"]);
    let mut dict = open_sample(&dir).with_patterns(patterns);

    let lemma = dict.query("Haus").unwrap().unwrap();
    assert_eq!(lemma.categories[0].translations, translations(&[("nl", "huis, n")]));

    let mut dict = dict.with_patterns(PatternTable::new(7));
    assert_eq!(dict.patterns().version, 7);
    let lemma = dict.query("Haus").unwrap().unwrap();
    assert!(!lemma.has_inflections());
    assert!(lemma.categories[0].translations.is_empty());

    let persons = PatternTable::new(8)
        .with_list_item("Konjugierte Form", r"^(\d)\. Person.*'''\[\[(\w+)\]\]'''")
        .unwrap();
    let mut dict = dict.with_patterns(persons);
    let lemma = dict.query("ging").unwrap().unwrap();
    assert_eq!(
        lemma.categories[0].inflections,
        inflections(&[("1", "gehen"), ("3", "gehen")])
    );
    // Word classes without an entry keep no inflections.
    assert!(!dict.query("gehen").unwrap().unwrap().has_inflections());
}

#[test]
fn any_source_can_back_the_dictionary() {
    let source = MemorySource::with(&[
        (
            "Müller",
            "== Müller ({{Sprache|Deutsch}}) ==\n\
             === {{Wortart|Substantiv|Deutsch}}, {{m}}, {{Wortart|Nachname|Deutsch}} ===\n\
             {{Deutsch Substantiv Übersicht\n|Genus=m\n|Nominativ Singular=Müller\n}}\n",
        ),
        ("cat", "== cat ({{Sprache|Englisch}}) ==\n=== {{Wortart|Substantiv|Englisch}} ===\n"),
        (
            "ach",
            "== ach ({{Sprache|Deutsch}}) ==\n==== {{Übersetzungen}} ====\n*{{en}}: [1] {{Ü|en|oh}}\n\
             === {{Wortart|Interjektion|Deutsch}} ===\n{{Bedeutungen}}\n",
        ),
    ]);
    let mut dict = Wiktionary::with_source(source);

    let lemma = dict.query("Müller").unwrap().unwrap();
    let noun = &lemma.categories[0];
    assert_eq!(noun.name, "Substantiv, m, Nachname");
    assert_eq!(noun.word_class, "Substantiv");
    assert_eq!(noun.gender.as_deref(), Some("m"));
    assert_eq!(noun.inflections.len(), 2);

    let lemma = dict.query("cat").unwrap().unwrap();
    assert_eq!(lemma.root, None);
    assert!(lemma.categories.is_empty());

    // A translation table ahead of any part of speech has nowhere to go.
    let lemma = dict.query("ach").unwrap().unwrap();
    assert_eq!(lemma.categories.len(), 1);
    assert_eq!(lemma.categories[0].name, "Interjektion");
    assert!(lemma.categories[0].inflections.is_empty());
    assert!(lemma.categories[0].translations.is_empty());
}

#[test]
fn source_errors_propagate() {
    let mut dict = Wiktionary::with_source(FailingSource);
    let err = dict.query("Haus").unwrap_err();
    assert!(matches!(err, WiktError::Remote(_)), "{:?}", err);
}

#[test]
fn queries_keep_the_raw_text() {
    let dir = TempDir::new().unwrap();
    let options = StoreOptions {
        index_path: Some(dir.path().join("woerter.csv")),
        ..StoreOptions::default()
    };
    let mut dict = Wiktionary::local_with(fixture_path(&["dewiktionary-sample.xml"]), options).unwrap();

    let Lemma { wikitext, .. } = dict.query("gehen").unwrap().unwrap();
    assert_eq!(Some(wikitext), dict.wikitext("gehen").unwrap());
    assert!(dir.path().join("woerter.csv").exists());
}
