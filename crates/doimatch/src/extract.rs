//! Match extraction
//!
//! Scans one decoded record's identifier fields against the pattern set and
//! produces match events carrying provenance from both sides. Pure: no I/O,
//! no logging, deterministic for a given record and pattern set.

use crate::patterns::PatternSet;
use crate::record::Record;

/// Relation type reported when the record's own DOI matched.
const SAME_RELATION: &str = "Same";

/// One exact DOI match, joining a mapping row with the record it hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// PubMed id from the mapping row.
    pub pmid: String,
    /// Project number from the mapping row.
    pub project_number: String,
    /// Identifier kind from the mapping row, verbatim.
    pub mapped_id_type: String,
    /// The matched pattern literal (the trimmed mapped DOI).
    pub mapped_id: String,
    /// The inspected record's own DOI (the anchor), even when the match
    /// came from a related identifier.
    pub matched_datacite_doi: String,
    /// `Same` for an own-DOI match, else the related-identifier entry's
    /// relation type verbatim (including empty).
    pub matched_relation_type: String,
    /// Resource type of whichever side matched, verbatim.
    pub matched_resource_type: String,
}

/// Extract every match event from one record.
///
/// Records not in the `findable` state yield nothing. A field matches only
/// when some pattern literal equals it in full; substring containment in
/// either direction does not count. The own-DOI check runs first, then the
/// related identifiers in document order.
pub fn extract_matches(record: &Record, patterns: &PatternSet) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    let attrs = &record.attributes;
    if !attrs.is_findable() {
        return events;
    }

    let anchor_doi = attrs.doi.as_str();
    if !anchor_doi.is_empty() {
        if let Some((id, row)) = patterns.lookup_exact(anchor_doi) {
            events.push(MatchEvent {
                pmid: row.pmid.clone(),
                project_number: row.project_number.clone(),
                mapped_id_type: row.mapped_id_type.clone(),
                mapped_id: patterns.pattern(id).to_string(),
                matched_datacite_doi: anchor_doi.to_string(),
                matched_relation_type: SAME_RELATION.to_string(),
                matched_resource_type: attrs.resource_type.resource_type_general.clone(),
            });
        }
    }

    for related in &attrs.related_identifiers {
        let text = related.identifier_text();
        if let Some((id, row)) = patterns.lookup_exact(&text) {
            events.push(MatchEvent {
                pmid: row.pmid.clone(),
                project_number: row.project_number.clone(),
                mapped_id_type: row.mapped_id_type.clone(),
                mapped_id: patterns.pattern(id).to_string(),
                matched_datacite_doi: anchor_doi.to_string(),
                matched_relation_type: related.relation_type.clone(),
                matched_resource_type: related.resource_type_general.clone(),
            });
        }
    }

    events
}
