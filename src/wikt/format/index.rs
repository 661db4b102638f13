//! # Byte-Offset Index
//!
//! The index maps every entry key of a dump to the byte offset of the line
//! holding its title marker. It is stored as plain text, one `key,offset`
//! pair per line, in the order the keys appear in the dump.
//!
//! ## Building
//! [`build_index`] makes one sequential pass over the dump. Offsets are
//! accumulated from each line's content length plus the terminator width
//! detected up front, so the index is only valid for the exact file (and line
//! ending convention) it was built from.
//!
//! ## Reading
//! [`IndexReader`] never loads the whole index. A lookup first consults the
//! memo cache; on a miss it resumes reading the index file where the previous
//! scan stopped, caching every entry it passes, until the key turns up or the
//! file is exhausted.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use log::{debug, info, trace, warn};

use crate::wikt::types::edition::Edition;
use crate::wikt::types::error::{Result, WiktError};
use crate::wikt::types::models::{IndexEntry, IndexSummary, LineEnding};
use crate::wikt::utils;

/// Build the index for `corpus_path` and write it to `index_path`.
///
/// Any existing file at `index_path` is replaced once the pass completes. The
/// entries are first written to `<index_path>.partial`, so an interrupted
/// build never leaves a truncated index behind.
///
/// # Errors
/// - [`WiktError::CorpusNotFound`] if the dump does not exist
/// - [`WiktError::Io`] on any read or write failure
pub fn build_index<E: Edition>(
    corpus_path: &Path,
    index_path: &Path,
    progress_interval: u64,
) -> Result<IndexSummary> {
    info!(
        "Building {} index: {} -> {}",
        E::DEBUG_NAME,
        corpus_path.display(),
        index_path.display()
    );

    let mut corpus = utils::open_corpus(corpus_path)?;
    let line_ending = utils::detect_line_ending(&mut corpus)?;
    debug!("Detected {} line endings in {}", line_ending, corpus_path.display());

    // Reopen rather than rewind: detection reads through its own buffer.
    let corpus = BufReader::new(utils::open_corpus(corpus_path)?);
    let partial_path = partial_path_for(index_path);
    let mut writer = BufWriter::new(File::create(&partial_path)?);

    let summary = write_index::<E, _, _>(corpus, &mut writer, line_ending, progress_interval)
        .and_then(|summary| {
            writer.flush()?;
            Ok(summary)
        });
    drop(writer);

    match summary {
        Ok(summary) => {
            fs::rename(&partial_path, index_path)?;
            info!(
                "Index built: {} entries from {} lines",
                summary.entries, summary.lines
            );
            Ok(summary)
        }
        Err(e) => {
            let _ = fs::remove_file(&partial_path);
            Err(e)
        }
    }
}

/// Scan `corpus` line by line and write one `key,offset` line per title marker.
///
/// `line_ending` must describe the on-disk terminator of `corpus`; it is
/// added to every line's content length when advancing the offset.
pub fn write_index<E: Edition, R: BufRead, W: Write>(
    mut corpus: R,
    index: &mut W,
    line_ending: LineEnding,
    progress_interval: u64,
) -> Result<IndexSummary> {
    let mut buf = Vec::new();
    let mut offset = 0u64;
    let mut lines = 0u64;
    let mut entries = 0u64;

    while let Some(width) = utils::read_line(&mut corpus, line_ending, &mut buf)? {
        if progress_interval > 0 && lines % progress_interval == 0 {
            info!("Parsed {} lines, {} entries", lines, entries);
        }
        lines += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Some((key, _)) = E::match_title(&line) {
            writeln!(index, "{},{}", key, offset)?;
            entries += 1;
        }
        offset += width;
    }

    Ok(IndexSummary {
        lines,
        entries,
        line_ending,
    })
}

/// Parse one index line. Returns `None` for lines that are not `key,offset`.
pub fn parse_entry(line: &str) -> Option<IndexEntry> {
    let (key, offset) = line.trim_end().rsplit_once(',')?;
    if key.is_empty() {
        return None;
    }
    let offset = offset.parse().ok()?;
    Some(IndexEntry {
        key: key.to_string(),
        offset,
    })
}

fn partial_path_for(index_path: &Path) -> PathBuf {
    let mut name = index_path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Lazy, memoizing reader over an index file.
///
/// The read cursor only ever moves forward. Each entry passed is cached, so a
/// key already scanned past is answered without touching the file again, and
/// once the file is exhausted every miss is answered immediately.
///
/// Lookups mutate the cursor and the cache, hence `&mut self`: sharing one
/// reader between threads requires external locking.
#[derive(Debug)]
pub struct IndexReader<R> {
    reader: R,
    cache: HashMap<String, u64>,
    buf: String,
    lines_read: u64,
    exhausted: bool,
}

impl IndexReader<BufReader<File>> {
    /// Open an index file for lazy reading.
    ///
    /// # Errors
    /// [`WiktError::IndexNotFound`] if the file does not exist, [`WiktError::Io`]
    /// for any other open failure.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => WiktError::IndexNotFound(path.to_path_buf()),
            _ => WiktError::Io(e),
        })?;
        debug!("Opened index file: {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> IndexReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cache: HashMap::new(),
            buf: String::new(),
            lines_read: 0,
            exhausted: false,
        }
    }

    /// Find the dump offset recorded for `key`.
    ///
    /// Returns `Ok(None)` if the key is not in the index. If a key was
    /// indexed more than once, the first occurrence wins.
    pub fn lookup(&mut self, key: &str) -> Result<Option<u64>> {
        if let Some(&offset) = self.cache.get(key) {
            trace!("Index cache hit: {} -> {}", key, offset);
            return Ok(Some(offset));
        }

        while let Some(entry) = self.next_entry()? {
            self.remember(&entry);
            if entry.key == key {
                let offset = self.cache[key];
                trace!("Index scan hit after {} lines: {} -> {}", self.lines_read, key, offset);
                return Ok(Some(offset));
            }
        }

        trace!("Key not in index: {}", key);
        Ok(None)
    }

    /// Iterate over the entries not yet read, in index order.
    ///
    /// The iterator shares the lookup cursor: every entry it yields is cached,
    /// and entries already passed by earlier lookups are not yielded again.
    /// A repeated key is yielded only for its first occurrence.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries { index: self }
    }

    /// Number of index lines consumed so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Number of distinct keys held in the memo cache.
    pub fn cached_keys(&self) -> usize {
        self.cache.len()
    }

    /// Returns true once the whole index file has been read.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Cache `entry` unless its key is already known. Returns true if it was new.
    fn remember(&mut self, entry: &IndexEntry) -> bool {
        match self.cache.entry(entry.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(entry.offset);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Read the next well-formed entry, skipping malformed lines.
    fn next_entry(&mut self) -> Result<Option<IndexEntry>> {
        while !self.exhausted {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                debug!("Index exhausted after {} lines, {} keys cached", self.lines_read, self.cache.len());
                self.exhausted = true;
                break;
            }
            self.lines_read += 1;

            match parse_entry(&self.buf) {
                Some(entry) => return Ok(Some(entry)),
                None => warn!(
                    "Skipping malformed index line {}: {:?}",
                    self.lines_read,
                    self.buf.trim_end()
                ),
            }
        }
        Ok(None)
    }
}

/// Forward iterator over the unread part of an index, see [`IndexReader::entries`].
#[derive(Debug)]
pub struct Entries<'r, R> {
    index: &'r mut IndexReader<R>,
}

impl<R: BufRead> Iterator for Entries<'_, R> {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.index.next_entry() {
                Ok(Some(entry)) => {
                    if self.index.remember(&entry) {
                        return Some(Ok(entry));
                    }
                    trace!("Skipping repeated index key: {}", entry.key);
                }
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
