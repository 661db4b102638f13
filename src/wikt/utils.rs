//! Low-level line reading utilities

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use super::types::error::{Result, WiktError};
use super::types::models::LineEnding;

/// Suffix appended to the dump's file stem to name its index.
pub const INDEX_SUFFIX: &str = "-index.csv";

/// Detect the line terminator of a file from the end of its first line.
///
/// Bytes are scanned, not collected, up to the first `\n` or the byte after
/// the first `\r`, however long the first line is. The whole dump is assumed
/// to use one convention. The reader's position is left unspecified.
pub fn detect_line_ending(reader: impl Read) -> io::Result<LineEnding> {
    let mut reader = BufReader::new(reader);
    let mut after_cr = false;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            return Ok(if after_cr { LineEnding::Cr } else { LineEnding::Lf });
        }
        for &byte in chunk {
            if after_cr {
                return Ok(if byte == b'\n' { LineEnding::CrLf } else { LineEnding::Cr });
            }
            match byte {
                b'\n' => return Ok(LineEnding::Lf),
                b'\r' => after_cr = true,
                _ => {}
            }
        }
        let consumed = chunk.len();
        reader.consume(consumed);
    }
}

/// Read one physical line into `buf`, without its terminator.
///
/// Returns `None` at end of file. Otherwise returns the number of bytes the
/// line occupies on disk, computed as content length plus the terminator
/// width of `ending`. The last line of a file may lack a terminator, in which
/// case only its content length is counted.
pub fn read_line<R: BufRead>(
    reader: &mut R,
    ending: LineEnding,
    buf: &mut Vec<u8>,
) -> io::Result<Option<u64>> {
    buf.clear();
    let delimiter = ending.delimiter();
    if reader.read_until(delimiter, buf)? == 0 {
        return Ok(None);
    }

    if buf.last() != Some(&delimiter) {
        return Ok(Some(buf.len() as u64));
    }
    buf.pop();
    if ending == LineEnding::CrLf && buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(buf.len() as u64 + ending.width()))
}

/// Derive the default index location for a dump: `<dir>/<stem>-index.csv`.
pub fn index_path_for(corpus_path: &Path) -> PathBuf {
    let stem = corpus_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    corpus_path.with_file_name(format!("{}{}", stem, INDEX_SUFFIX))
}

/// Open the dump for reading, reporting a missing file as [`WiktError::CorpusNotFound`].
pub fn open_corpus(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => WiktError::CorpusNotFound(path.to_path_buf()),
        _ => WiktError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detects_each_convention() {
        assert_eq!(detect_line_ending(Cursor::new("a\nb\n")).unwrap(), LineEnding::Lf);
        assert_eq!(detect_line_ending(Cursor::new("a\r\nb\r\n")).unwrap(), LineEnding::CrLf);
        assert_eq!(detect_line_ending(Cursor::new("a\rb\r")).unwrap(), LineEnding::Cr);
        assert_eq!(detect_line_ending(Cursor::new("")).unwrap(), LineEnding::Lf);
        assert_eq!(detect_line_ending(Cursor::new("a\r")).unwrap(), LineEnding::Cr);
    }

    #[test]
    fn long_first_line_is_read_to_its_end() {
        let mut dump = "x".repeat(200 * 1024);
        dump.push_str("\r\n<page>\r\n");
        assert_eq!(detect_line_ending(Cursor::new(dump)).unwrap(), LineEnding::CrLf);
    }

    #[test]
    fn terminator_split_across_buffer_refills() {
        // BufReader's default capacity is 8 KiB; put the CR at its last byte.
        let mut dump = "x".repeat(8 * 1024 - 1);
        dump.push_str("\r\nrest");
        assert_eq!(detect_line_ending(Cursor::new(dump)).unwrap(), LineEnding::CrLf);
    }

    #[test]
    fn line_widths_include_terminator() {
        let mut reader = Cursor::new("ab\r\ncde\r\nf");
        let mut buf = Vec::new();
        assert_eq!(read_line(&mut reader, LineEnding::CrLf, &mut buf).unwrap(), Some(4));
        assert_eq!(buf, b"ab");
        assert_eq!(read_line(&mut reader, LineEnding::CrLf, &mut buf).unwrap(), Some(5));
        assert_eq!(buf, b"cde");
        assert_eq!(read_line(&mut reader, LineEnding::CrLf, &mut buf).unwrap(), Some(1));
        assert_eq!(buf, b"f");
        assert_eq!(read_line(&mut reader, LineEnding::CrLf, &mut buf).unwrap(), None);
    }

    #[test]
    fn index_sits_next_to_dump() {
        let path = index_path_for(Path::new("/data/dewiktionary-pages-articles.xml"));
        assert_eq!(path, PathBuf::from("/data/dewiktionary-pages-articles-index.csv"));
    }
}
