//! Pattern-set construction
//!
//! Turns qualifying mapping rows into an immutable [`PatternSet`]: the
//! frozen automaton plus a provenance table mapping each pattern id back to
//! the mapping row it came from. Built once at startup, read-only for the
//! rest of the run.

use doimatch_ac::{Automaton, AutomatonBuilder};
use log::debug;

use crate::error::{Error, Result};
use crate::mapping::MappingRow;

/// The frozen DOI pattern set with per-pattern provenance.
pub struct PatternSet {
    automaton: Automaton,
    /// Indexed by pattern id. When the same literal is loaded from more
    /// than one row, the slot is overwritten and the most recently loaded
    /// row wins.
    provenance: Vec<MappingRow>,
}

impl PatternSet {
    /// Build the pattern set from mapping rows.
    ///
    /// A row participates when its `mapped_id_type` is `doi` (trimmed,
    /// case-insensitive) and its trimmed `mapped_id` is non-empty. Fails
    /// with [`Error::EmptyPatternSet`] when no row qualifies.
    pub fn build<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = MappingRow>,
    {
        let mut builder = AutomatonBuilder::new();
        let mut provenance: Vec<MappingRow> = Vec::new();
        let mut duplicates = 0u64;

        for row in rows {
            if !row.is_doi() {
                continue;
            }
            let doi = row.mapped_id.trim();
            if doi.is_empty() {
                continue;
            }
            let slot = builder.add_pattern(doi)? as usize;
            if slot == provenance.len() {
                provenance.push(row);
            } else {
                provenance[slot] = row;
                duplicates += 1;
            }
        }

        if builder.is_empty() {
            return Err(Error::EmptyPatternSet);
        }
        if duplicates > 0 {
            debug!("{duplicates} duplicate DOI literals; keeping the latest row each");
        }

        let automaton = builder.build()?;
        Ok(Self {
            automaton,
            provenance,
        })
    }

    /// Number of distinct DOI patterns.
    pub fn len(&self) -> usize {
        self.provenance.len()
    }

    /// Always false for a built set; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.provenance.is_empty()
    }

    /// The underlying automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The interned (trimmed) literal for a pattern id.
    pub fn pattern(&self, id: u32) -> &str {
        self.automaton.pattern(id)
    }

    /// The provenance row for a pattern id.
    pub fn row(&self, id: u32) -> &MappingRow {
        &self.provenance[id as usize]
    }

    /// Scan `text` and resolve a full-span hit to its provenance.
    ///
    /// Returns `None` unless some pattern literal equals `text` exactly.
    pub fn lookup_exact(&self, text: &str) -> Option<(u32, &MappingRow)> {
        self.automaton
            .find_exact(text)
            .map(|id| (id, &self.provenance[id as usize]))
    }
}
