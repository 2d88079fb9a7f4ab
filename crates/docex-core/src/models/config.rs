//! Configuration structures for the extraction pipeline.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocexError, Result};

/// Main configuration for the docex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocexConfig {
    /// Document classifier configuration.
    pub classifier: ClassifierConfig,

    /// Value cleaner configuration.
    pub cleaner: CleanerConfig,

    /// Batch matcher configuration.
    pub matcher: MatcherConfig,

    /// Ordered output schema columns for the template mapper.
    pub schema: Vec<String>,
}

/// Keyword sets and threshold for document classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Keywords marking a company registry extract.
    pub company_keywords: Vec<String>,

    /// Keywords marking a personal identity document.
    pub identity_keywords: Vec<String>,

    /// Number of distinct keywords required for a type to match.
    pub threshold: usize,
}

impl ClassifierConfig {
    /// Lowercase both keyword sets. The classifier compares keywords against
    /// lowercased text without re-lowercasing them per call, so sets coming
    /// from outside the built-in defaults go through here first.
    pub fn normalize(&mut self) {
        for keyword in self
            .company_keywords
            .iter_mut()
            .chain(self.identity_keywords.iter_mut())
        {
            *keyword = keyword.to_lowercase();
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            company_keywords: [
                "camera di commercio",
                "visura",
                "rea",
                "partita iva",
                "codice fiscale",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            identity_keywords: [
                "carta identita",
                "identity card",
                "patente",
                "passaporto",
                "documento",
                "rilasciato",
                "luogo di nascita",
                "data di nascita",
                "residenza",
                "comune di",
                "cittadinanza",
                "codice fiscale",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            threshold: 2,
        }
    }
}

/// Value cleaner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Per-field maximum lengths for free-text fields, overriding the
    /// limit declared on the rule.
    pub free_text_limits: HashMap<String, usize>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        let mut free_text_limits = HashMap::new();
        free_text_limits.insert("Oggetto_Sociale".to_string(), 300);
        Self { free_text_limits }
    }
}

/// Batch matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Enable the positional zip fallback (strategy 3). When remaining
    /// unmatched company and person counts happen to coincide, positional
    /// pairing can silently join unrelated documents; disable it to force
    /// singleton pairs instead.
    pub positional_fallback: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            positional_fallback: true,
        }
    }
}

impl DocexConfig {
    /// Configuration with the built-in output schema filled in.
    pub fn with_default_schema() -> Self {
        Self {
            schema: crate::template::default_schema(),
            ..Self::default()
        }
    }

    /// Effective schema: the configured column list, or the built-in one
    /// when the configuration leaves it empty.
    pub fn effective_schema(&self) -> Vec<String> {
        if self.schema.is_empty() {
            crate::template::default_schema()
        } else {
            self.schema.clone()
        }
    }

    /// Load configuration from a JSON file. Classifier keyword sets are
    /// lowercased on load.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| DocexError::Config(format!("{}: {}", path.display(), e)))?;
        config.classifier.normalize();
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DocexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let config = ClassifierConfig::default();
        assert_eq!(config.threshold, 2);
        assert!(config.company_keywords.contains(&"partita iva".to_string()));
    }

    #[test]
    fn test_default_keywords_are_lowercase() {
        let config = ClassifierConfig::default();
        for keyword in config.company_keywords.iter().chain(&config.identity_keywords) {
            assert_eq!(keyword, &keyword.to_lowercase());
        }
    }

    #[test]
    fn test_from_file_lowercases_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docex.json");
        std::fs::write(
            &path,
            r#"{"classifier": {"company_keywords": ["VISURA", "Camera di Commercio"]}}"#,
        )
        .unwrap();

        let config = DocexConfig::from_file(&path).unwrap();
        assert_eq!(
            config.classifier.company_keywords,
            vec!["visura".to_string(), "camera di commercio".to_string()]
        );
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = DocexConfig::with_default_schema();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DocexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.schema, config.schema);
        assert!(parsed.matcher.positional_fallback);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: DocexConfig =
            serde_json::from_str(r#"{"matcher": {"positional_fallback": false}}"#).unwrap();
        assert!(!parsed.matcher.positional_fallback);
        assert_eq!(parsed.classifier.threshold, 2);
    }
}
