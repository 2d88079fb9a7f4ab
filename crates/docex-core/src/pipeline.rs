//! The single-document pipeline: classify, extract, clean, assemble.

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::classify::classify_with;
use crate::extract::{extract, NormalizedText, DEFAULT_RULES};
use crate::models::{DocexConfig, DocumentType, Record};

/// Process one source document: classify the raw text, run the rule set for
/// the chosen type, clean the captured values, and attach provenance.
///
/// Never fails on data quality: an unrecognizable document yields a Record
/// with `DocumentType::Unrecognized` and an empty field mapping.
pub fn process_document(source_name: &str, raw_text: &str, config: &DocexConfig) -> Record {
    process_document_at(source_name, raw_text, config, Local::now().naive_local())
}

/// Same as [`process_document`] with an explicit extraction timestamp, for
/// callers that need reproducible provenance.
pub fn process_document_at(
    source_name: &str,
    raw_text: &str,
    config: &DocexConfig,
    extracted_at: NaiveDateTime,
) -> Record {
    let document_type = classify_with(raw_text, &config.classifier);

    let text = NormalizedText::new(raw_text);
    let fields = extract(&text, document_type, &DEFAULT_RULES, &config.cleaner);

    info!(
        source = source_name,
        document_type = ?document_type,
        fields = fields.len(),
        "document processed"
    );

    Record::assemble(fields, source_name, document_type, extracted_at)
}

/// True when a record carries so little data that batch callers may want to
/// flag it (unrecognized type, or a recognized type with nothing extracted).
pub fn is_empty_extraction(record: &Record) -> bool {
    record.document_type == DocumentType::Unrecognized || record.fields.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_company_pipeline_end_to_end() {
        let text = "CAMERA DI COMMERCIO DI MILANO\nVisura ordinaria\n\
                    Denominazione: ACME S.R.L.\nPartita IVA: 12345678901\n\
                    Stato: ATTIVA\n";
        let record =
            process_document_at("visura_acme.txt", text, &DocexConfig::default(), timestamp());

        assert_eq!(record.document_type, DocumentType::CompanyFiling);
        assert_eq!(record.field("Denominazione"), Some("ACME S.R.L"));
        assert_eq!(record.field("Partita_IVA"), Some("12345678901"));
        assert_eq!(record.source_name, "visura_acme.txt");
        assert_eq!(record.extracted_at, timestamp());
    }

    #[test]
    fn test_unrecognized_document_yields_empty_record() {
        let record = process_document_at(
            "ricevuta.txt",
            "Scontrino fiscale del 01/01/2024",
            &DocexConfig::default(),
            timestamp(),
        );

        assert_eq!(record.document_type, DocumentType::Unrecognized);
        assert!(record.fields.is_empty());
        assert!(is_empty_extraction(&record));
    }
}
