//! Keyword-frequency document classification.

use tracing::debug;

use crate::models::{ClassifierConfig, DocumentType};

/// Classify a text blob with the default keyword sets.
pub fn classify(text: &str) -> DocumentType {
    classify_with(text, &ClassifierConfig::default())
}

/// Classify a text blob as one of the known document types.
///
/// Counts how many distinct keywords from each set occur anywhere in the
/// lower-cased text. Keyword sets must be lowercase themselves; the built-in
/// defaults are, and configurations loaded from a file are normalized on
/// load. A type matches once its count reaches the threshold; company
/// extracts are checked first, so a text reaching both thresholds is a
/// CompanyFiling. Total and deterministic: always returns a value.
pub fn classify_with(text: &str, config: &ClassifierConfig) -> DocumentType {
    let lower = text.to_lowercase();

    let company_hits = count_keywords(&lower, &config.company_keywords);
    if company_hits >= config.threshold {
        debug!(company_hits, "classified as company filing");
        return DocumentType::CompanyFiling;
    }

    let identity_hits = count_keywords(&lower, &config.identity_keywords);
    if identity_hits >= config.threshold {
        debug!(identity_hits, "classified as personal identity document");
        return DocumentType::PersonalIdentity;
    }

    debug!(company_hits, identity_hits, "document not recognized");
    DocumentType::Unrecognized
}

fn count_keywords(lower_text: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|k| lower_text.contains(k.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_company_keywords_classify_as_company() {
        // "camera di commercio" + "partita iva", zero identity keywords
        let text = "CAMERA DI COMMERCIO DI MILANO\nPartita IVA: 12345678901";
        assert_eq!(classify(text), DocumentType::CompanyFiling);
    }

    #[test]
    fn test_one_keyword_is_not_enough() {
        assert_eq!(classify("visura ordinaria"), DocumentType::Unrecognized);
    }

    #[test]
    fn test_identity_document() {
        let text = "CARTA IDENTITA\nRilasciato dal Comune di Roma";
        assert_eq!(classify(text), DocumentType::PersonalIdentity);
    }

    #[test]
    fn test_company_checked_first_on_tie() {
        // Reaches both thresholds; evaluation order decides.
        let text = "camera di commercio visura patente passaporto";
        assert_eq!(classify(text), DocumentType::CompanyFiling);
    }

    #[test]
    fn test_deterministic() {
        let text = "documento rilasciato dal comune";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_uppercase_keyword_sets_match_after_normalization() {
        let mut config = ClassifierConfig {
            company_keywords: vec!["VISURA".to_string(), "Camera di Commercio".to_string()],
            ..ClassifierConfig::default()
        };
        config.normalize();

        let text = "camera di commercio di milano\nvisura ordinaria";
        assert_eq!(classify_with(text, &config), DocumentType::CompanyFiling);
    }

    #[test]
    fn test_distinct_keywords_counted_once() {
        // The same keyword repeated still counts as one distinct hit.
        let text = "visura visura visura";
        assert_eq!(classify(text), DocumentType::Unrecognized);
    }
}
