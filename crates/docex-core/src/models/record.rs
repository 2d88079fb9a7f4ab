//! Data models for extracted document records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The kind of source document a text blob was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Company registry extract (visura camerale).
    CompanyFiling,
    /// Personal identity document (carta d'identità, patente, passaporto).
    PersonalIdentity,
    /// Classification reached no threshold.
    Unrecognized,
}

impl DocumentType {
    /// Human-readable Italian label, matching the original export column.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::CompanyFiling => "Visura Camerale",
            DocumentType::PersonalIdentity => "Documento Identità",
            DocumentType::Unrecognized => "Non Riconosciuto",
        }
    }
}

/// Flat mapping from field name to extracted value for one source document.
///
/// Keys are unique; a field is either absent or carries a non-empty cleaned
/// value. Insertion order is irrelevant, so a sorted map keeps serialized
/// output deterministic.
pub type FieldRecord = BTreeMap<String, String>;

/// An extracted field mapping plus provenance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Opaque provenance label, typically the original filename.
    pub source_name: String,

    /// Document type decided by the classifier.
    pub document_type: DocumentType,

    /// When the extraction ran.
    pub extracted_at: NaiveDateTime,

    /// Extracted field values.
    pub fields: FieldRecord,
}

impl Record {
    /// Attach provenance to an extracted field mapping. Field values are
    /// taken as-is; no extraction logic lives here.
    pub fn assemble(
        fields: FieldRecord,
        source_name: impl Into<String>,
        document_type: DocumentType,
        extracted_at: NaiveDateTime,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            document_type,
            extracted_at,
            fields,
        }
    }

    /// Look up a field value.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The company-side identifier used by the batch matcher: Partita IVA
    /// when present, otherwise the company Codice Fiscale.
    pub fn company_identifier(&self) -> Option<&str> {
        self.field("Partita_IVA").or_else(|| self.field("Codice_Fiscale"))
    }
}

/// One finished output row, fixed to an externally supplied schema.
///
/// Columns appear exactly in schema order; unset columns hold an empty
/// string, and field names outside the schema are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    cells: Vec<(String, String)>,
}

impl OutputRow {
    /// Create a row with every schema column initialized to empty.
    pub fn with_columns(schema: &[String]) -> Self {
        Self {
            cells: schema.iter().map(|c| (c.clone(), String::new())).collect(),
        }
    }

    /// Set a column value. Returns false (and drops the value) when the
    /// column is not part of the schema.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        match self.cells.iter_mut().find(|(c, _)| c == column) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    /// Get a column value. None when the column is not part of the schema.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// Column names in schema order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    /// Values in schema order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An association between a company record and an optional person record,
/// produced by batch matching. Leftover records become singleton pairs with
/// the missing side absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPair {
    /// Company-side record, if any.
    pub company: Option<Record>,

    /// Person-side record, if any.
    pub person: Option<Record>,

    /// Which strategy produced the pair.
    pub matched_by: MatchStrategy,
}

/// How a pair was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Company identifier equals the person's Codice Fiscale.
    Identifier,
    /// Company identifier appears in the person record's source filename.
    FilenameHint,
    /// Remaining records paired by original relative order.
    Positional,
    /// No counterpart was found.
    Unpaired,
}

impl MatchPair {
    /// Number of occupied sides (1 or 2).
    pub fn occupied_sides(&self) -> usize {
        self.company.is_some() as usize + self.person.is_some() as usize
    }

    /// True when both sides are present.
    pub fn is_complete(&self) -> bool {
        self.company.is_some() && self.person.is_some()
    }
}

/// A record that could not enter matching, with the reason why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmatchedRecord {
    /// The record as assembled by the pipeline.
    pub record: Record,

    /// Reason the record was set aside.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_assemble_keeps_values_untouched() {
        let mut fields = FieldRecord::new();
        fields.insert("Denominazione".to_string(), "ACME  S.R.L.".to_string());

        let record = Record::assemble(fields, "visura.pdf", DocumentType::CompanyFiling, timestamp());

        assert_eq!(record.field("Denominazione"), Some("ACME  S.R.L."));
        assert_eq!(record.source_name, "visura.pdf");
        assert_eq!(record.document_type, DocumentType::CompanyFiling);
    }

    #[test]
    fn test_company_identifier_prefers_partita_iva() {
        let mut fields = FieldRecord::new();
        fields.insert("Partita_IVA".to_string(), "12345678901".to_string());
        fields.insert("Codice_Fiscale".to_string(), "98765432109".to_string());

        let record = Record::assemble(fields, "v.txt", DocumentType::CompanyFiling, timestamp());
        assert_eq!(record.company_identifier(), Some("12345678901"));
    }

    #[test]
    fn test_output_row_drops_unknown_columns() {
        let schema = vec!["A".to_string(), "B".to_string()];
        let mut row = OutputRow::with_columns(&schema);

        assert!(row.set("A", "1"));
        assert!(!row.set("C", "x"));

        assert_eq!(row.get("A"), Some("1"));
        assert_eq!(row.get("B"), Some(""));
        assert_eq!(row.get("C"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_document_type_serde_snake_case() {
        let json = serde_json::to_string(&DocumentType::CompanyFiling).unwrap();
        assert_eq!(json, "\"company_filing\"");
    }
}
