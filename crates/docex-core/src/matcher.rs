//! Batch pairing of company records with person records.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::models::{DocumentType, MatchPair, MatchStrategy, MatcherConfig, Record, UnmatchedRecord};

/// Reason attached to records that failed classification.
pub const REASON_UNRECOGNIZED: &str = "tipo documento non riconosciuto";

/// Pair company records with person records.
///
/// Unrecognized records go straight to the unmatched list. Three strategies
/// run in order over the not-yet-matched records, each recording what it
/// consumed in an explicit index set passed along the cascade:
///
/// 1. identifier equality (sole proprietorships registered under the
///    person's own fiscal code),
/// 2. company identifier appearing in the person file's name,
/// 3. positional zip, only when the remaining counts are exactly equal and
///    the fallback is enabled in the configuration.
///
/// Every leftover becomes a singleton pair, never silently dropped: the
/// occupied pair sides plus the unmatched list always add up to the input
/// count, and no record appears twice.
pub fn match_batch(
    records: Vec<Record>,
    config: &MatcherConfig,
) -> (Vec<MatchPair>, Vec<UnmatchedRecord>) {
    let mut companies: Vec<Record> = Vec::new();
    let mut persons: Vec<Record> = Vec::new();
    let mut unmatched: Vec<UnmatchedRecord> = Vec::new();

    for record in records {
        match record.document_type {
            DocumentType::CompanyFiling => companies.push(record),
            DocumentType::PersonalIdentity => persons.push(record),
            DocumentType::Unrecognized => unmatched.push(UnmatchedRecord {
                record,
                reason: REASON_UNRECOGNIZED.to_string(),
            }),
        }
    }

    info!(
        companies = companies.len(),
        persons = persons.len(),
        unmatched = unmatched.len(),
        "matching batch"
    );

    let mut used_companies: HashSet<usize> = HashSet::new();
    let mut used_persons: HashSet<usize> = HashSet::new();
    let mut matched: Vec<(usize, usize, MatchStrategy)> = Vec::new();

    match_by_identifier(&companies, &persons, &mut used_companies, &mut used_persons, &mut matched);
    match_by_filename(&companies, &persons, &mut used_companies, &mut used_persons, &mut matched);
    if config.positional_fallback {
        match_by_position(&companies, &persons, &mut used_companies, &mut used_persons, &mut matched);
    }

    // Stable output: pairs in company order, then company singletons, then
    // person singletons.
    matched.sort_by_key(|(company_idx, _, _)| *company_idx);

    let mut companies: Vec<Option<Record>> = companies.into_iter().map(Some).collect();
    let mut persons: Vec<Option<Record>> = persons.into_iter().map(Some).collect();

    let mut pairs = Vec::with_capacity(companies.len().max(persons.len()));
    for (company_idx, person_idx, matched_by) in matched {
        pairs.push(MatchPair {
            company: companies[company_idx].take(),
            person: persons[person_idx].take(),
            matched_by,
        });
    }
    for company in companies.into_iter().flatten() {
        pairs.push(MatchPair {
            company: Some(company),
            person: None,
            matched_by: MatchStrategy::Unpaired,
        });
    }
    for person in persons.into_iter().flatten() {
        pairs.push(MatchPair {
            company: None,
            person: Some(person),
            matched_by: MatchStrategy::Unpaired,
        });
    }

    (pairs, unmatched)
}

/// Strategy 1: the company's tax/registry identifier equals the person's
/// fiscal code.
fn match_by_identifier(
    companies: &[Record],
    persons: &[Record],
    used_companies: &mut HashSet<usize>,
    used_persons: &mut HashSet<usize>,
    matched: &mut Vec<(usize, usize, MatchStrategy)>,
) {
    for (company_idx, company) in companies.iter().enumerate() {
        if used_companies.contains(&company_idx) {
            continue;
        }
        let Some(identifier) = company.company_identifier() else {
            continue;
        };

        for (person_idx, person) in persons.iter().enumerate() {
            if used_persons.contains(&person_idx) {
                continue;
            }
            if person.field("CF_Persona") == Some(identifier) {
                debug!(identifier, "paired by identifier");
                used_companies.insert(company_idx);
                used_persons.insert(person_idx);
                matched.push((company_idx, person_idx, MatchStrategy::Identifier));
                break;
            }
        }
    }
}

/// Strategy 2: the company identifier literally appears in the person
/// record's source filename.
fn match_by_filename(
    companies: &[Record],
    persons: &[Record],
    used_companies: &mut HashSet<usize>,
    used_persons: &mut HashSet<usize>,
    matched: &mut Vec<(usize, usize, MatchStrategy)>,
) {
    for (company_idx, company) in companies.iter().enumerate() {
        if used_companies.contains(&company_idx) {
            continue;
        }
        let Some(identifier) = company.company_identifier() else {
            continue;
        };

        for (person_idx, person) in persons.iter().enumerate() {
            if used_persons.contains(&person_idx) {
                continue;
            }
            if person.source_name.contains(identifier) {
                debug!(identifier, source = %person.source_name, "paired by filename hint");
                used_companies.insert(company_idx);
                used_persons.insert(person_idx);
                matched.push((company_idx, person_idx, MatchStrategy::FilenameHint));
                break;
            }
        }
    }
}

/// Strategy 3: zip the remainders by original relative order, but only when
/// their counts coincide exactly. Unequal counts leave every remainder a
/// singleton.
fn match_by_position(
    companies: &[Record],
    persons: &[Record],
    used_companies: &mut HashSet<usize>,
    used_persons: &mut HashSet<usize>,
    matched: &mut Vec<(usize, usize, MatchStrategy)>,
) {
    let remaining_companies: Vec<usize> = (0..companies.len())
        .filter(|i| !used_companies.contains(i))
        .collect();
    let remaining_persons: Vec<usize> = (0..persons.len())
        .filter(|i| !used_persons.contains(i))
        .collect();

    if remaining_companies.len() != remaining_persons.len() {
        debug!(
            companies = remaining_companies.len(),
            persons = remaining_persons.len(),
            "positional fallback skipped, counts differ"
        );
        return;
    }

    for (&company_idx, &person_idx) in remaining_companies.iter().zip(remaining_persons.iter()) {
        used_companies.insert(company_idx);
        used_persons.insert(person_idx);
        matched.push((company_idx, person_idx, MatchStrategy::Positional));
    }
}
