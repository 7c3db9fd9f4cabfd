//! DataCite record model
//!
//! One parsed line of a `.jsonl.gz` archive. The dumps carry far more
//! structure than matching needs; everything irrelevant is ignored during
//! deserialization and every relevant field defaults when absent, so a
//! sparse record still decodes.

use serde::Deserialize;
use serde_json::Value;

/// One catalog entry from a DataCite archive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    /// The record's attribute block; defaults to empty when absent.
    #[serde(default)]
    pub attributes: Attributes,
}

/// The attribute block of a [`Record`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// Registration state; only `findable` records participate in matching.
    #[serde(default)]
    pub state: String,
    /// The record's own DOI, empty when absent.
    #[serde(default)]
    pub doi: String,
    /// Resource-type classification.
    #[serde(default)]
    pub resource_type: ResourceType,
    /// Identifiers of related works, in document order.
    #[serde(default)]
    pub related_identifiers: Vec<RelatedIdentifier>,
}

impl Attributes {
    /// True when the record is in the `findable` registration state.
    pub fn is_findable(&self) -> bool {
        self.state == "findable"
    }
}

/// The `resourceType` block of a record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    /// The general resource-type classification, empty when absent.
    #[serde(default)]
    pub resource_type_general: String,
}

/// One entry of a record's `relatedIdentifiers` sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedIdentifier {
    /// The related identifier as raw JSON. Dirty dumps occasionally carry
    /// numbers here instead of strings; keeping the raw value lets
    /// [`identifier_text`](Self::identifier_text) coerce rather than fail
    /// the whole record.
    #[serde(default)]
    pub related_identifier: Value,
    /// Relation of the identified work to this record, empty when absent.
    #[serde(default)]
    pub relation_type: String,
    /// Resource type of the identified work, empty when absent.
    #[serde(default)]
    pub resource_type_general: String,
}

impl RelatedIdentifier {
    /// The related identifier coerced to trimmed text.
    ///
    /// Strings are trimmed as-is; `null`/absent becomes empty; any other
    /// JSON value is rendered in its canonical text form.
    pub fn identifier_text(&self) -> String {
        match &self.related_identifier {
            Value::Null => String::new(),
            Value::String(text) => text.trim().to_string(),
            other => other.to_string().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_decodes() {
        let record: Record = serde_json::from_str(
            r#"{
                "id": "10.1/abc",
                "attributes": {
                    "state": "findable",
                    "doi": "10.1/abc",
                    "resourceType": {"resourceTypeGeneral": "Dataset"},
                    "relatedIdentifiers": [
                        {
                            "relatedIdentifier": " 10.2/def ",
                            "relationType": "IsSupplementTo",
                            "resourceTypeGeneral": "Text"
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        let attrs = &record.attributes;
        assert!(attrs.is_findable());
        assert_eq!(attrs.doi, "10.1/abc");
        assert_eq!(attrs.resource_type.resource_type_general, "Dataset");
        assert_eq!(attrs.related_identifiers.len(), 1);
        let related = &attrs.related_identifiers[0];
        assert_eq!(related.identifier_text(), "10.2/def");
        assert_eq!(related.relation_type, "IsSupplementTo");
    }

    #[test]
    fn sparse_record_defaults() {
        let record: Record = serde_json::from_str(r#"{"attributes": {}}"#).unwrap();
        let attrs = &record.attributes;
        assert!(!attrs.is_findable());
        assert!(attrs.doi.is_empty());
        assert!(attrs.resource_type.resource_type_general.is_empty());
        assert!(attrs.related_identifiers.is_empty());

        let record: Record = serde_json::from_str("{}").unwrap();
        assert!(!record.attributes.is_findable());
    }

    #[test]
    fn numeric_related_identifier_coerces() {
        let related: RelatedIdentifier = serde_json::from_str(
            r#"{"relatedIdentifier": 12345, "relationType": "Cites"}"#,
        )
        .unwrap();
        assert_eq!(related.identifier_text(), "12345");
        assert_eq!(related.resource_type_general, "");
    }

    #[test]
    fn null_related_identifier_is_empty_text() {
        let related: RelatedIdentifier =
            serde_json::from_str(r#"{"relatedIdentifier": null}"#).unwrap();
        assert_eq!(related.identifier_text(), "");
    }
}
