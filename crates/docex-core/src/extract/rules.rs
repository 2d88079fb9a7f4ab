//! Declarative extraction rules: ordered pattern lists per document type.

use regex::{Regex, RegexBuilder};

use super::normalize::NormalizedText;
use super::patterns;
use crate::error::RuleError;
use crate::models::DocumentType;

/// Which capture groups carry the value of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStrategy {
    /// Use one designated capture group.
    Single(usize),
    /// Scan all capture groups left to right and take the first non-empty
    /// one. Used when a pattern has alternative sub-captures for the same
    /// concept.
    FirstNonEmpty,
}

/// Which normalized text variant a pattern matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// Line-break-preserving text, for line-anchored patterns.
    Lines,
    /// Flattened text, for patterns that must match across a line boundary.
    Flat,
}

/// How a rule walks its pattern list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// The first pattern that matches decides the rule, even when its
    /// capture is empty; later patterns are never consulted.
    FirstPattern,
    /// Keep walking the list past matching-but-empty patterns and take the
    /// first match that yields a value anywhere in the list.
    TryAllPatterns,
}

/// Shape tag driving the value cleaner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain text, whitespace-collapsed only.
    Text,
    /// Free-form name or place: also strips trailing punctuation left by
    /// greedy pattern boundaries.
    Name,
    /// Date: separators canonicalized, 2-digit years expanded.
    Date,
    /// Fixed-length identifier; values outside the set are dropped.
    Identifier { allowed_lengths: Vec<usize> },
    /// Descriptive free text, truncated to a maximum length.
    FreeText { max_len: usize },
}

/// One pattern specification inside a rule's ordered list.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    regex: Regex,
    groups: GroupStrategy,
    target: MatchTarget,
}

/// What evaluating one pattern against a text produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternOutcome {
    /// The pattern did not match.
    NoMatch,
    /// The pattern matched but the selected capture was empty.
    MatchedEmpty,
    /// The pattern matched and captured a value.
    Value(String),
}

impl PatternSpec {
    /// Compile a caller-supplied pattern. Patterns are matched
    /// case-insensitively and multi-line-aware.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()?;
        Ok(Self::from_regex(regex))
    }

    /// Wrap an already-compiled regex. Defaults to capture group 1 against
    /// the line-preserving text.
    pub fn from_regex(regex: Regex) -> Self {
        Self {
            regex,
            groups: GroupStrategy::Single(1),
            target: MatchTarget::Lines,
        }
    }

    /// Set the capture-group convention.
    pub fn with_groups(mut self, groups: GroupStrategy) -> Self {
        self.groups = groups;
        self
    }

    /// Set the text variant this pattern matches against.
    pub fn with_target(mut self, target: MatchTarget) -> Self {
        self.target = target;
        self
    }

    /// Check that a designated capture group actually exists.
    fn validate(&self) -> Result<(), RuleError> {
        if let GroupStrategy::Single(n) = self.groups {
            if n == 0 || n >= self.regex.captures_len() {
                return Err(RuleError::MissingGroup {
                    pattern: self.regex.as_str().to_string(),
                    group: n,
                });
            }
        }
        Ok(())
    }

    /// Run the pattern against the chosen text variant.
    pub(crate) fn evaluate(&self, text: &NormalizedText) -> PatternOutcome {
        let haystack = match self.target {
            MatchTarget::Lines => text.lines(),
            MatchTarget::Flat => text.flat(),
        };

        let Some(caps) = self.regex.captures(haystack) else {
            return PatternOutcome::NoMatch;
        };

        let value = match self.groups {
            GroupStrategy::Single(n) => caps.get(n).map(|m| m.as_str()),
            GroupStrategy::FirstNonEmpty => (1..caps.len())
                .filter_map(|i| caps.get(i))
                .map(|m| m.as_str())
                .find(|s| !s.trim().is_empty()),
        };

        match value.map(str::trim) {
            Some(v) if !v.is_empty() => PatternOutcome::Value(v.to_string()),
            _ => PatternOutcome::MatchedEmpty,
        }
    }
}

/// An ordered pattern list extracting one named field.
///
/// Several rules may target the same field name (a direct rule plus a
/// generic fallback); the extractor applies first-writer-wins across them.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field name the rule populates.
    pub field: String,
    /// Shape tag consumed by the value cleaner.
    pub kind: ValueKind,
    /// How the pattern list is walked.
    pub mode: RuleMode,
    /// Ordered pattern list; first pattern yielding a value wins.
    pub patterns: Vec<PatternSpec>,
}

impl FieldRule {
    pub fn new(field: impl Into<String>, kind: ValueKind, patterns: Vec<PatternSpec>) -> Self {
        Self {
            field: field.into(),
            kind,
            mode: RuleMode::TryAllPatterns,
            patterns,
        }
    }

    pub fn with_mode(mut self, mode: RuleMode) -> Self {
        self.mode = mode;
        self
    }

    fn validate(&self) -> Result<(), RuleError> {
        for spec in &self.patterns {
            spec.validate()?;
        }
        Ok(())
    }
}

/// The full registry of extraction rules, keyed by document type.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    company: Vec<FieldRule>,
    person: Vec<FieldRule>,
}

impl RuleSet {
    /// A rule set with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a rule for company registry extracts. Fails when the rule
    /// references a capture group its pattern does not define.
    pub fn add_company_rule(&mut self, rule: FieldRule) -> Result<(), RuleError> {
        rule.validate()?;
        self.company.push(rule);
        Ok(())
    }

    /// Register a rule for personal identity documents.
    pub fn add_person_rule(&mut self, rule: FieldRule) -> Result<(), RuleError> {
        rule.validate()?;
        self.person.push(rule);
        Ok(())
    }

    /// Rules registered for a document type. Unrecognized documents have
    /// none: their field record stays empty.
    pub fn rules_for(&self, document_type: DocumentType) -> &[FieldRule] {
        match document_type {
            DocumentType::CompanyFiling => &self.company,
            DocumentType::PersonalIdentity => &self.person,
            DocumentType::Unrecognized => &[],
        }
    }

    /// The built-in Italian rule tables for visure camerali and identity
    /// documents.
    pub fn italian_defaults() -> Self {
        let identifier = |lengths: &[usize]| ValueKind::Identifier {
            allowed_lengths: lengths.to_vec(),
        };

        let company = vec![
            FieldRule::new(
                "Denominazione",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::DENOMINAZIONE.clone())],
            ),
            FieldRule::new(
                "Partita_IVA",
                identifier(&[11]),
                vec![PatternSpec::from_regex(patterns::PARTITA_IVA_LABELED.clone())],
            ),
            // Generic positional fallback for the same field: only fills in
            // when the labeled rule above found nothing.
            FieldRule::new(
                "Partita_IVA",
                identifier(&[11]),
                vec![PatternSpec::from_regex(
                    patterns::PARTITA_IVA_STANDALONE.clone(),
                )],
            )
            .with_mode(RuleMode::FirstPattern),
            FieldRule::new(
                "Codice_Fiscale",
                identifier(&[11, 16]),
                vec![PatternSpec::from_regex(patterns::CODICE_FISCALE.clone())],
            ),
            FieldRule::new(
                "Numero_REA",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::NUMERO_REA.clone())],
            ),
            FieldRule::new(
                "Forma_Giuridica",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::FORMA_GIURIDICA.clone())],
            ),
            FieldRule::new(
                "Sede_Legale",
                ValueKind::Name,
                vec![
                    PatternSpec::from_regex(patterns::SEDE_LEGALE.clone()),
                    PatternSpec::from_regex(patterns::SEDE_LEGALE.clone())
                        .with_target(MatchTarget::Flat),
                ],
            ),
            FieldRule::new(
                "CAP",
                identifier(&[5]),
                vec![PatternSpec::from_regex(patterns::CAP.clone())],
            ),
            FieldRule::new(
                "Comune",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::COMUNE.clone())],
            ),
            FieldRule::new(
                "Provincia",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::PROVINCIA.clone())
                    .with_groups(GroupStrategy::FirstNonEmpty)],
            ),
            FieldRule::new(
                "Data_Costituzione",
                ValueKind::Date,
                vec![PatternSpec::from_regex(patterns::DATA_COSTITUZIONE.clone())],
            ),
            FieldRule::new(
                "Capitale_Sociale",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::CAPITALE_SOCIALE.clone())],
            ),
            FieldRule::new(
                "Stato_Attivita",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::STATO_ATTIVITA.clone())],
            ),
            FieldRule::new(
                "Amministratore_Unico",
                ValueKind::Name,
                vec![PatternSpec::from_regex(
                    patterns::AMMINISTRATORE_UNICO.clone(),
                )],
            ),
            FieldRule::new(
                "Oggetto_Sociale",
                ValueKind::FreeText { max_len: 300 },
                vec![PatternSpec::from_regex(patterns::OGGETTO_SOCIALE.clone())],
            ),
        ];

        let person = vec![
            FieldRule::new(
                "Cognome",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::COGNOME.clone())],
            ),
            FieldRule::new(
                "Nome",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::NOME.clone())],
            ),
            FieldRule::new(
                "Luogo_Nascita",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::LUOGO_NASCITA.clone())],
            ),
            FieldRule::new(
                "Provincia_Nascita",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::PROVINCIA_NASCITA.clone())],
            ),
            FieldRule::new(
                "Data_Nascita",
                ValueKind::Date,
                vec![PatternSpec::from_regex(patterns::DATA_NASCITA.clone())],
            ),
            FieldRule::new(
                "Sesso",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::SESSO.clone())],
            ),
            FieldRule::new(
                "Statura",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::STATURA.clone())],
            ),
            FieldRule::new(
                "Cittadinanza",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::CITTADINANZA.clone())],
            ),
            FieldRule::new(
                "Residenza",
                ValueKind::Name,
                vec![
                    PatternSpec::from_regex(patterns::RESIDENZA.clone()),
                    PatternSpec::from_regex(patterns::RESIDENZA.clone())
                        .with_target(MatchTarget::Flat),
                ],
            ),
            FieldRule::new(
                "Comune_Residenza",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::COMUNE_RESIDENZA.clone())],
            ),
            FieldRule::new(
                "CF_Persona",
                identifier(&[16]),
                vec![PatternSpec::from_regex(patterns::CF_PERSONA.clone())],
            ),
            FieldRule::new(
                "Numero_Documento",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::NUMERO_DOCUMENTO.clone())],
            ),
            FieldRule::new(
                "Data_Rilascio",
                ValueKind::Date,
                vec![PatternSpec::from_regex(patterns::DATA_RILASCIO.clone())],
            ),
            FieldRule::new(
                "Data_Scadenza",
                ValueKind::Date,
                vec![PatternSpec::from_regex(patterns::DATA_SCADENZA.clone())],
            ),
            FieldRule::new(
                "Comune_Rilascio",
                ValueKind::Name,
                vec![PatternSpec::from_regex(patterns::COMUNE_RILASCIO.clone())],
            ),
            FieldRule::new(
                "Tipo_Documento",
                ValueKind::Text,
                vec![PatternSpec::from_regex(patterns::TIPO_DOCUMENTO.clone())
                    .with_target(MatchTarget::Flat)],
            ),
        ];

        Self { company, person }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_spec_invalid_regex() {
        assert!(PatternSpec::new(r"(\d{11").is_err());
    }

    #[test]
    fn test_missing_group_rejected() {
        let spec = PatternSpec::new(r"\d{11}").unwrap().with_groups(GroupStrategy::Single(2));
        let rule = FieldRule::new("X", ValueKind::Text, vec![spec]);

        let mut rules = RuleSet::empty();
        assert!(rules.add_company_rule(rule).is_err());
    }

    #[test]
    fn test_first_non_empty_group() {
        let spec = PatternSpec::new(r"(?:Prov:\s*([A-Z]{2}))|\(([A-Z]{2})\)")
            .unwrap()
            .with_groups(GroupStrategy::FirstNonEmpty);

        let text = NormalizedText::new("MILANO (MI)");
        assert_eq!(spec.evaluate(&text), PatternOutcome::Value("MI".to_string()));
    }

    #[test]
    fn test_matched_empty_outcome() {
        let spec = PatternSpec::new(r"Stato:(\s*)").unwrap();
        let text = NormalizedText::new("Stato: ");
        assert_eq!(spec.evaluate(&text), PatternOutcome::MatchedEmpty);
    }

    #[test]
    fn test_defaults_cover_both_types() {
        let rules = RuleSet::italian_defaults();
        assert!(!rules.rules_for(DocumentType::CompanyFiling).is_empty());
        assert!(!rules.rules_for(DocumentType::PersonalIdentity).is_empty());
        assert!(rules.rules_for(DocumentType::Unrecognized).is_empty());
    }
}
