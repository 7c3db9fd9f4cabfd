//! Corpus driver
//!
//! Enumerates every `.jsonl.gz` archive under the corpus root and drives
//! the decoder and extractor over each, sequentially, forwarding match
//! events to the report sink as they are produced. Per-archive failures
//! are logged and absorbed; only a sink failure stops the run.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::decoder::RecordReader;
use crate::error::Result;
use crate::extract::extract_matches;
use crate::patterns::PatternSet;
use crate::report::MatchReport;

/// Totals accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Archives processed (opened or attempted).
    pub archives: u64,
    /// Records decoded across all archives.
    pub records: u64,
    /// Match events written to the report.
    pub matches: u64,
}

/// Recursively discover `.jsonl.gz` archives under `root`.
///
/// Paths that cannot be read during the walk are logged and skipped.
pub fn discover_archives(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.jsonl.gz");
    let mut archives = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) => archives.push(path),
            Err(err) => warn!("Skipping unreadable path during discovery: {err}"),
        }
    }
    Ok(archives)
}

/// Process every archive against the pattern set, writing match events to
/// the report in encounter order.
pub fn run(
    archives: &[PathBuf],
    patterns: &PatternSet,
    report: &mut MatchReport,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for path in archives {
        summary.archives += 1;
        info!("Processing {} ...", path.display());

        let mut reader = match RecordReader::open(path) {
            Ok(reader) => reader,
            Err(err) => {
                error!("Error reading {}: {err}", path.display());
                continue;
            }
        };

        let mut archive_matches = 0u64;
        while let Some(record) = reader.next_record() {
            summary.records += 1;
            for event in extract_matches(&record, patterns) {
                report.write_event(&event)?;
                archive_matches += 1;
            }
        }
        summary.matches += archive_matches;

        debug!(
            "Finished {}: {} lines, {} parse failures, {} matches",
            path.display(),
            reader.lines_seen(),
            reader.parse_failures(),
            archive_matches
        );
    }

    Ok(summary)
}
