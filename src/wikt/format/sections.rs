//! # Heading Scanner & Section Splitter
//!
//! Wikitext headings are runs of two or more `=` around a title:
//! `=== {{Wortart|Substantiv|Deutsch}}, {{n}} ===`. The length of the opening
//! run is the heading level; the closing run may differ in length.
//!
//! Both scanners below make a single forward pass with an explicit cursor.
//! [`Sections`] turns the heading positions into `(level, heading, body)`
//! triples, folding headings of level [`ABSORBED_LEVEL`] and deeper into the
//! body of the section that precedes them.

use crate::wikt::types::models::{HeadingSpan, Section};

/// Headings at this level or deeper never open a section of their own.
pub const ABSORBED_LEVEL: usize = 5;

/// Iterator over the heading positions of a text, in order.
///
/// Anything between the opening and closing runs belongs to the heading,
/// including whitespace and line breaks. An opening run with no closing run
/// before the end of text is not a heading and ends the scan.
#[derive(Debug, Clone)]
pub struct Headings<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Headings<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            cursor: 0,
        }
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let from = self.cursor;
        while self.cursor < self.bytes.len() && pred(self.bytes[self.cursor]) {
            self.cursor += 1;
        }
        self.cursor - from
    }
}

impl Iterator for Headings<'_> {
    type Item = HeadingSpan;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.bytes.len();
        while self.cursor < len {
            let opens = self.bytes[self.cursor] == b'='
                && self.bytes.get(self.cursor + 1) == Some(&b'=');
            if !opens {
                self.cursor += 1;
                continue;
            }

            let start = self.cursor;
            let level = self.skip_while(|b| b == b'=');
            self.skip_while(|b| b != b'=');
            // An opening run with nothing closing it is plain text, so a
            // trailing `== B` stays in the body of the section before it.
            if self.cursor == len {
                return None;
            }
            self.skip_while(|b| b == b'=');
            return Some(HeadingSpan {
                start,
                end: self.cursor,
                level,
            });
        }
        None
    }
}

/// Iterator over the sections of a record's text.
///
/// Text before the first section-opening heading is not part of any section.
/// A text without headings yields nothing.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    text: &'a str,
    headings: Headings<'a>,
    current: Option<HeadingSpan>,
    started: bool,
}

impl<'a> Sections<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            headings: Headings::new(text),
            current: None,
            started: false,
        }
    }

    fn section(&self, heading: HeadingSpan, body_end: usize) -> Section<'a> {
        Section {
            level: heading.level,
            heading: &self.text[heading.start..heading.end],
            body: &self.text[heading.end..body_end],
        }
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.current = self.headings.find(|h| h.level < ABSORBED_LEVEL);
        }
        let current = self.current?;

        match self.headings.find(|h| h.level < ABSORBED_LEVEL) {
            Some(next) => {
                self.current = Some(next);
                Some(self.section(current, next.start))
            }
            None => {
                self.current = None;
                Some(self.section(current, self.text.len()))
            }
        }
    }
}

/// Split `text` into its ordered sections.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    Sections::new(text).collect()
}
