//! # Record Extraction
//!
//! Turns an indexed offset back into the text of one entry. The offset
//! addresses the *line* holding the title marker, not the marker itself: in
//! an XML dump the first heading usually shares its line with the opening
//! `<text ...>` tag. Extraction therefore drops everything before the marker,
//! then collects lines until the closing sentinel.
//!
//! Line breaks in the returned text are always `\n`, whatever the dump uses.

use std::io::{BufRead, Seek, SeekFrom};
use log::trace;

use crate::wikt::types::edition::Edition;
use crate::wikt::types::error::{Result, WiktError};
use crate::wikt::types::models::LineEnding;
use crate::wikt::types::options::StoreOptions;
use crate::wikt::utils;

/// Upper bounds on how far one extraction may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLimits {
    pub max_lines: usize,
    pub max_bytes: usize,
}

impl From<&StoreOptions> for RecordLimits {
    fn from(options: &StoreOptions) -> Self {
        Self {
            max_lines: options.max_record_lines,
            max_bytes: options.max_record_bytes,
        }
    }
}

/// Extract the record for `key` whose title line starts at `offset`.
///
/// The returned text starts exactly at the title marker and ends exactly
/// before the sentinel.
///
/// # Errors
/// - [`WiktError::TitleMarkerMissing`] if the line at `offset` does not carry
///   the marker for `key` (stale index, or offset past end of file)
/// - [`WiktError::UnterminatedRecord`] if end of file or one of `limits` is
///   reached before the sentinel
/// - [`WiktError::Io`] on read or seek failure
pub fn extract_record<E: Edition, R: BufRead + Seek>(
    reader: &mut R,
    offset: u64,
    key: &str,
    line_ending: LineEnding,
    limits: RecordLimits,
) -> Result<String> {
    reader.seek(SeekFrom::Start(offset))?;

    let marker_missing = || WiktError::TitleMarkerMissing {
        key: key.to_string(),
        offset,
    };

    let mut buf = Vec::new();
    let mut bytes = utils::read_line(reader, line_ending, &mut buf)?
        .ok_or_else(marker_missing)? as usize;
    let mut lines = 1usize;

    let first_line = String::from_utf8_lossy(&buf);
    let start = E::locate_title(&first_line, key).ok_or_else(marker_missing)?;
    let mut line = first_line[start..].to_string();
    let mut text = String::new();

    loop {
        if let Some(end) = line.find(E::SENTINEL) {
            text.push_str(&line[..end]);
            trace!(
                "Extracted '{}' at offset {}: {} lines, {} chars",
                key,
                offset,
                lines,
                text.len()
            );
            return Ok(text);
        }
        text.push_str(&line);
        text.push('\n');

        let unterminated = |lines, bytes| WiktError::UnterminatedRecord {
            key: key.to_string(),
            offset,
            lines,
            bytes,
        };
        if lines >= limits.max_lines || bytes >= limits.max_bytes {
            return Err(unterminated(lines, bytes));
        }
        match utils::read_line(reader, line_ending, &mut buf)? {
            Some(width) => {
                lines += 1;
                bytes += width as usize;
            }
            None => return Err(unterminated(lines, bytes)),
        }
        line = String::from_utf8_lossy(&buf).into_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikt::types::edition::German;
    use std::io::Cursor;

    const LIMITS: RecordLimits = RecordLimits {
        max_lines: 100,
        max_bytes: 1 << 20,
    };

    #[test]
    fn record_on_a_single_line() {
        let dump = "<text>== Tor ({{Sprache|Deutsch}}) == kurz</text>\n";
        let text =
            extract_record::<German, _>(&mut Cursor::new(dump), 0, "Tor", LineEnding::Lf, LIMITS)
                .unwrap();
        assert_eq!(text, "== Tor ({{Sprache|Deutsch}}) == kurz");
    }

    #[test]
    fn sentinel_at_line_start_ends_the_record() {
        let dump = "x\n<text>== Tor ({{Sprache|Deutsch}}) ==\nzwei\n</text>\n";
        let text =
            extract_record::<German, _>(&mut Cursor::new(dump), 2, "Tor", LineEnding::Lf, LIMITS)
                .unwrap();
        assert_eq!(text, "== Tor ({{Sprache|Deutsch}}) ==\nzwei\n");
    }

    #[test]
    fn line_bound_is_enforced() {
        let dump = "== Tor ({{Sprache|Deutsch}}) ==\na\nb\nc\n</text>\n";
        let limits = RecordLimits { max_lines: 2, max_bytes: 1 << 20 };
        let err =
            extract_record::<German, _>(&mut Cursor::new(dump), 0, "Tor", LineEnding::Lf, limits)
                .unwrap_err();
        assert!(matches!(err, WiktError::UnterminatedRecord { lines: 2, .. }));
    }
}
