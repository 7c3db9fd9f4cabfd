//! Streaming record decoder
//!
//! Reads one gzip-compressed NDJSON archive in fixed-size decompressed
//! chunks, reassembles lines that straddle chunk boundaries, and parses
//! each complete line into a [`Record`]. Peak memory is bounded by the
//! chunk size plus one line regardless of archive size.
//!
//! Each line has one of three outcomes: a decoded record, a logged skip
//! (malformed JSON is expected at dump scale and must not halt the run),
//! or end-of-stream. A read error mid-archive logs and ends this archive's
//! sequence early; it never aborts the overall run.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::{error, warn};

use crate::record::Record;

/// Default decompressed-chunk size: 16 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Streaming reader over the records of one `.jsonl.gz` archive.
///
/// Finite and not restartable: once the underlying stream is exhausted or
/// fails, the reader yields nothing more.
pub struct RecordReader {
    source: PathBuf,
    reader: MultiGzDecoder<BufReader<File>>,
    /// Fixed-size read buffer; one decompressed chunk per `read` call.
    chunk: Vec<u8>,
    /// Undecoded trailing bytes carried across chunk boundaries.
    carry: Vec<u8>,
    /// Complete lines split out of the last chunk, awaiting parsing.
    ready: VecDeque<Vec<u8>>,
    eof: bool,
    lines: u64,
    parse_failures: u64,
}

impl RecordReader {
    /// Open an archive with the default chunk size.
    pub fn open(path: &Path) -> io::Result<Self> {
        Self::with_chunk_size(path, DEFAULT_CHUNK_SIZE)
    }

    /// Open an archive with an explicit decompressed-chunk size.
    ///
    /// Concatenated gzip members are treated as a single stream.
    pub fn with_chunk_size(path: &Path, chunk_size: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            source: path.to_path_buf(),
            reader: MultiGzDecoder::new(BufReader::new(file)),
            chunk: vec![0u8; chunk_size],
            carry: Vec::new(),
            ready: VecDeque::new(),
            eof: false,
            lines: 0,
            parse_failures: 0,
        })
    }

    /// The archive this reader was opened on.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Non-empty lines seen so far, including ones that failed to parse.
    pub fn lines_seen(&self) -> u64 {
        self.lines
    }

    /// Lines skipped because they did not parse as a record.
    pub fn parse_failures(&self) -> u64 {
        self.parse_failures
    }

    /// Decode the next record, absorbing skippable lines along the way.
    pub fn next_record(&mut self) -> Option<Record> {
        loop {
            let line = self.next_line()?;
            let text = line.trim_ascii();
            if text.is_empty() {
                continue;
            }
            self.lines += 1;
            match serde_json::from_slice::<Record>(text) {
                Ok(record) => return Some(record),
                Err(err) => {
                    self.parse_failures += 1;
                    warn!("JSON decode error in {}: {err}", self.source.display());
                }
            }
        }
    }

    /// Pop the next complete line, refilling from the stream as needed.
    fn next_line(&mut self) -> Option<Vec<u8>> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(line);
            }
            if self.eof {
                return None;
            }
            self.refill();
        }
    }

    /// Read one chunk and split every complete line out of the carry-over.
    ///
    /// At EOF a non-empty carry-over is one final, possibly unterminated
    /// line. A read error ends the stream early; the carry-over is dropped
    /// because its completeness can no longer be established.
    fn refill(&mut self) {
        let read = match self.reader.read(&mut self.chunk) {
            Ok(read) => read,
            Err(err) => {
                error!("Error reading {}: {err}", self.source.display());
                self.eof = true;
                self.carry.clear();
                return;
            }
        };

        if read == 0 {
            self.eof = true;
            if !self.carry.is_empty() {
                let last = mem::take(&mut self.carry);
                self.ready.push_back(last);
            }
            return;
        }

        self.carry.extend_from_slice(&self.chunk[..read]);
        if let Some(last_newline) = memchr::memrchr(b'\n', &self.carry) {
            let tail = self.carry.split_off(last_newline + 1);
            let complete = mem::replace(&mut self.carry, tail);
            for line in complete.split(|&byte| byte == b'\n') {
                if !line.is_empty() {
                    self.ready.push_back(line.to_vec());
                }
            }
        }
    }
}

impl Iterator for RecordReader {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.next_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_archive(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
        path
    }

    fn dois(reader: RecordReader) -> Vec<String> {
        reader.map(|r| r.attributes.doi).collect()
    }

    #[test]
    fn decodes_newline_delimited_records() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "records.jsonl.gz",
            b"{\"attributes\":{\"doi\":\"10.1/a\"}}\n\
              {\"attributes\":{\"doi\":\"10.1/b\"}}\n",
        );
        let reader = RecordReader::open(&path).unwrap();
        assert_eq!(dois(reader), vec!["10.1/a", "10.1/b"]);
    }

    #[test]
    fn final_unterminated_line_is_decoded() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "records.jsonl.gz",
            b"{\"attributes\":{\"doi\":\"10.1/a\"}}\n\
              {\"attributes\":{\"doi\":\"10.1/b\"}}",
        );
        let reader = RecordReader::open(&path).unwrap();
        assert_eq!(dois(reader), vec!["10.1/a", "10.1/b"]);
    }

    #[test]
    fn chunk_boundary_invariance() {
        // Records longer than the chunk size must reassemble identically.
        let dir = TempDir::new().unwrap();
        let long_doi = format!("10.1/{}", "x".repeat(200));
        let content = format!(
            "{{\"attributes\":{{\"doi\":\"{long_doi}\"}}}}\n\
             {{\"attributes\":{{\"doi\":\"10.2/b\"}}}}\n\
             \n\
             {{\"attributes\":{{\"doi\":\"10.3/c\"}}}}\n"
        );
        let path = write_archive(&dir, "records.jsonl.gz", content.as_bytes());

        let whole = dois(RecordReader::with_chunk_size(&path, DEFAULT_CHUNK_SIZE).unwrap());
        for chunk_size in [1, 7, 64, 300] {
            let split = dois(RecordReader::with_chunk_size(&path, chunk_size).unwrap());
            assert_eq!(split, whole, "chunk size {chunk_size}");
        }
        assert_eq!(whole, vec![long_doi.as_str(), "10.2/b", "10.3/c"]);
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "records.jsonl.gz",
            b"{\"attributes\":{\"doi\":\"10.1/a\"}}\n\
              this is not json\n\
              {\"attributes\":{\"doi\":\"10.1/b\"}}\n",
        );
        let mut reader = RecordReader::open(&path).unwrap();
        let mut seen = Vec::new();
        while let Some(record) = reader.next_record() {
            seen.push(record.attributes.doi);
        }
        assert_eq!(seen, vec!["10.1/a", "10.1/b"]);
        assert_eq!(reader.parse_failures(), 1);
        assert_eq!(reader.lines_seen(), 3);
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "records.jsonl.gz",
            b"\n   \n{\"attributes\":{\"doi\":\"10.1/a\"}}\n\t\n",
        );
        let mut reader = RecordReader::open(&path).unwrap();
        assert_eq!(reader.next_record().unwrap().attributes.doi, "10.1/a");
        assert!(reader.next_record().is_none());
        assert_eq!(reader.lines_seen(), 1);
    }

    #[test]
    fn truncated_archive_ends_early_without_panicking() {
        // Valid gzip header followed by garbage: the decoder errors part way
        // through and the reader must simply stop yielding.
        let dir = TempDir::new().unwrap();
        let good = write_archive(
            &dir,
            "good.jsonl.gz",
            b"{\"attributes\":{\"doi\":\"10.1/a\"}}\n",
        );
        let mut bytes = std::fs::read(&good).unwrap();
        bytes.truncate(bytes.len() / 2);
        let path = dir.path().join("truncated.jsonl.gz");
        std::fs::write(&path, &bytes).unwrap();

        let reader = RecordReader::open(&path).unwrap();
        // No assertion on yielded count: whatever decoded before the error
        // is fine, the stream just has to terminate.
        assert!(reader.count() <= 1);
    }

    #[test]
    fn empty_archive_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, "empty.jsonl.gz", b"");
        let mut reader = RecordReader::open(&path).unwrap();
        assert!(reader.next_record().is_none());
        assert_eq!(reader.lines_seen(), 0);
    }

    #[test]
    fn missing_archive_fails_to_open() {
        assert!(RecordReader::open(Path::new("/nonexistent/x.jsonl.gz")).is_err());
    }
}
