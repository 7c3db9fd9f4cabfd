//! Match report output
//!
//! The report is a CSV file with a fixed seven-column header, one row per
//! match event, written incrementally as events are produced. A sink
//! failure is fatal: a partially silent report would be worse than a
//! stopped run.

use std::fs::{self, File};
use std::path::Path;

use crate::error::Result;
use crate::extract::MatchEvent;

/// Column header of the match report.
pub const REPORT_HEADER: [&str; 7] = [
    "pmid",
    "project_number",
    "mapped_id_type",
    "mapped_id",
    "matched_datacite_doi",
    "matched_relation_type",
    "matched_resource_type",
];

/// Incremental CSV writer for match events.
pub struct MatchReport {
    writer: csv::Writer<File>,
}

impl MatchReport {
    /// Create the report file, its parent directories included, and write
    /// the header row.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        writer.write_record(REPORT_HEADER)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// Append one match event as a row.
    pub fn write_event(&mut self, event: &MatchEvent) -> Result<()> {
        self.writer.write_record([
            event.pmid.as_str(),
            event.project_number.as_str(),
            event.mapped_id_type.as_str(),
            event.mapped_id.as_str(),
            event.matched_datacite_doi.as_str(),
            event.matched_relation_type.as_str(),
            event.matched_resource_type.as_str(),
        ])?;
        Ok(())
    }

    /// Flush and close the report.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn event() -> MatchEvent {
        MatchEvent {
            pmid: "1".to_string(),
            project_number: "X1".to_string(),
            mapped_id_type: "doi".to_string(),
            mapped_id: "10.1/abc".to_string(),
            matched_datacite_doi: "10.1/abc".to_string(),
            matched_relation_type: "Same".to_string(),
            matched_resource_type: "Dataset".to_string(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matches.csv");

        let mut report = MatchReport::create(&path).unwrap();
        report.write_event(&event()).unwrap();
        report.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "pmid,project_number,mapped_id_type,mapped_id,matched_datacite_doi,\
             matched_relation_type,matched_resource_type"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,X1,doi,10.1/abc,10.1/abc,Same,Dataset"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/matches.csv");

        let report = MatchReport::create(&path).unwrap();
        report.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
