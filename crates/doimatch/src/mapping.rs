//! Mapping-table input
//!
//! The mapping table is a header-less CSV with four positional columns:
//! `PMID, PROJECT_NUMBER, mapped_id_type, mapped_id`. Loading keeps only the
//! rows that can contribute DOI patterns; a structurally malformed file
//! (wrong column count, unreadable bytes) is a fatal setup error and
//! propagates.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// One row of the identifier-mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingRow {
    /// PubMed id of the originating article.
    pub pmid: String,
    /// Funding project number the article is attributed to.
    pub project_number: String,
    /// Identifier kind of `mapped_id`; only `doi` rows participate.
    pub mapped_id_type: String,
    /// The mapped identifier literal.
    pub mapped_id: String,
}

impl MappingRow {
    /// True when this row's identifier kind is `doi`, compared after
    /// trimming and without regard to ASCII case.
    pub fn is_doi(&self) -> bool {
        self.mapped_id_type.trim().eq_ignore_ascii_case("doi")
    }
}

/// Load the mapping table, keeping only rows with `mapped_id_type` = `doi`.
pub fn load_mapping_rows(path: &Path) -> Result<Vec<MappingRow>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: MappingRow = result?;
        if row.is_doi() {
            rows.push(row);
        }
    }
    Ok(rows)
}
