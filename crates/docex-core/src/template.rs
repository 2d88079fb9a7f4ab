//! Projection of a (company, person) record pair onto the output schema.

use tracing::debug;

use crate::models::{OutputRow, Record};

/// Company-side correspondence: extracted field name to schema column.
const COMPANY_COLUMNS: &[(&str, &str)] = &[
    ("Denominazione", "Ragione_Sociale"),
    ("Partita_IVA", "Partita_IVA"),
    ("Codice_Fiscale", "Codice_Fiscale_Azienda"),
    ("Numero_REA", "Numero_REA"),
    ("Forma_Giuridica", "Forma_Giuridica"),
    ("Sede_Legale", "Sede_Legale"),
    ("CAP", "CAP_Sede"),
    ("Comune", "Comune_Sede"),
    ("Provincia", "Provincia_Sede"),
    ("Data_Costituzione", "Data_Costituzione"),
    ("Capitale_Sociale", "Capitale_Sociale"),
    ("Stato_Attivita", "Stato_Attivita"),
    ("Oggetto_Sociale", "Oggetto_Sociale"),
];

/// Person-side correspondence: extracted field name to the representative
/// column and its duplicated primary-holder (titolare) column. The schema
/// carries the same person twice for downstream compatibility; keeping both
/// targets in one table means the two groups are always written from the
/// same value and can never drift apart.
const PERSON_COLUMNS: &[(&str, &str, &str)] = &[
    ("Cognome", "Cognome_Rappresentante", "Cognome_Titolare"),
    ("Nome", "Nome_Rappresentante", "Nome_Titolare"),
    ("Data_Nascita", "Data_Nascita_Rappresentante", "Data_Nascita_Titolare"),
    ("Luogo_Nascita", "Luogo_Nascita_Rappresentante", "Luogo_Nascita_Titolare"),
    ("Provincia_Nascita", "Provincia_Nascita_Rappresentante", "Provincia_Nascita_Titolare"),
    ("CF_Persona", "Codice_Fiscale_Rappresentante", "Codice_Fiscale_Titolare"),
    ("Residenza", "Residenza_Rappresentante", "Residenza_Titolare"),
    ("Numero_Documento", "Numero_Documento_Rappresentante", "Numero_Documento_Titolare"),
    ("Data_Rilascio", "Data_Rilascio_Rappresentante", "Data_Rilascio_Titolare"),
    ("Data_Scadenza", "Data_Scadenza_Rappresentante", "Data_Scadenza_Titolare"),
    ("Tipo_Documento", "Tipo_Documento_Rappresentante", "Tipo_Documento_Titolare"),
];

const NOMINATIVO_COLUMNS: (&str, &str) = ("Nominativo_Rappresentante", "Nominativo_Titolare");

const TIPO_SOGGETTO_COLUMN: &str = "Tipo_Soggetto";
const RUOLO_COLUMN: &str = "Ruolo_Persona";
const FILE_VISURA_COLUMN: &str = "Nome_File_Visura";
const FILE_DOCUMENTO_COLUMN: &str = "Nome_File_Documento";

/// Role column value when the person side comes from an identity document.
pub const RUOLO_TITOLARE: &str = "Titolare Documento";
/// Role column value when the person side falls back to the company's
/// extracted sole-administrator name.
pub const RUOLO_AMMINISTRATORE: &str = "Amministratore Unico";

const TIPO_PERSONA_GIURIDICA: &str = "Persona Giuridica";
const TIPO_PERSONA_FISICA: &str = "Persona Fisica";

/// The built-in output schema, in column order.
pub fn default_schema() -> Vec<String> {
    let mut schema: Vec<String> = COMPANY_COLUMNS.iter().map(|(_, c)| c.to_string()).collect();
    schema.push(TIPO_SOGGETTO_COLUMN.to_string());

    schema.push(NOMINATIVO_COLUMNS.0.to_string());
    for (_, rappresentante, _) in PERSON_COLUMNS {
        schema.push(rappresentante.to_string());
    }
    schema.push(NOMINATIVO_COLUMNS.1.to_string());
    for (_, _, titolare) in PERSON_COLUMNS {
        schema.push(titolare.to_string());
    }

    schema.push(RUOLO_COLUMN.to_string());
    schema.push(FILE_VISURA_COLUMN.to_string());
    schema.push(FILE_DOCUMENTO_COLUMN.to_string());
    schema
}

/// Project a record pair onto the supplied schema columns.
///
/// Always returns exactly one row with exactly the schema's columns in
/// order; absent inputs simply leave more columns at their empty default.
/// Extracted field names without a schema correspondence are dropped.
pub fn map_to_schema(
    company: Option<&Record>,
    person: Option<&Record>,
    schema: &[String],
) -> OutputRow {
    let mut row = OutputRow::with_columns(schema);

    if let Some(company) = company {
        for (field, column) in COMPANY_COLUMNS {
            if let Some(value) = company.field(field) {
                row.set(column, value);
            }
        }

        let tipo = if company.field("Denominazione").is_some() {
            TIPO_PERSONA_GIURIDICA
        } else {
            TIPO_PERSONA_FISICA
        };
        row.set(TIPO_SOGGETTO_COLUMN, tipo);
        row.set(FILE_VISURA_COLUMN, company.source_name.as_str());
    }

    if let Some(person) = person {
        // One copy step writes both person column groups from each value.
        for (field, rappresentante, titolare) in PERSON_COLUMNS {
            if let Some(value) = person.field(field) {
                row.set(rappresentante, value);
                row.set(titolare, value);
            }
        }

        if let Some(nominativo) = full_name(person) {
            row.set(NOMINATIVO_COLUMNS.0, nominativo.as_str());
            row.set(NOMINATIVO_COLUMNS.1, nominativo.as_str());
        }

        row.set(RUOLO_COLUMN, RUOLO_TITOLARE);
        row.set(FILE_DOCUMENTO_COLUMN, person.source_name.as_str());
    } else if let Some(admin) = company.and_then(|c| c.field("Amministratore_Unico")) {
        // No identity document, but the registry extract names a sole
        // administrator: the person side is populated from that name.
        debug!(admin, "person side populated from sole administrator");
        row.set(NOMINATIVO_COLUMNS.0, admin);
        row.set(NOMINATIVO_COLUMNS.1, admin);
        row.set(RUOLO_COLUMN, RUOLO_AMMINISTRATORE);
    }

    row
}

fn full_name(person: &Record) -> Option<String> {
    let parts: Vec<&str> = ["Cognome", "Nome"]
        .iter()
        .filter_map(|f| person.field(f))
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, FieldRecord};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(document_type: DocumentType, fields: &[(&str, &str)]) -> Record {
        let mut map = FieldRecord::new();
        for (k, v) in fields {
            map.insert(k.to_string(), v.to_string());
        }
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Record::assemble(map, "source.txt", document_type, ts)
    }

    #[test]
    fn test_row_covers_exactly_the_schema() {
        let schema = default_schema();
        let row = map_to_schema(None, None, &schema);

        assert_eq!(row.columns().collect::<Vec<_>>(), schema.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(row.values().all(str::is_empty));
    }

    #[test]
    fn test_company_columns_populated() {
        let company = record(
            DocumentType::CompanyFiling,
            &[("Denominazione", "ACME SRL"), ("Partita_IVA", "12345678901")],
        );
        let row = map_to_schema(Some(&company), None, &default_schema());

        assert_eq!(row.get("Ragione_Sociale"), Some("ACME SRL"));
        assert_eq!(row.get("Partita_IVA"), Some("12345678901"));
        assert_eq!(row.get("Tipo_Soggetto"), Some("Persona Giuridica"));
        assert_eq!(row.get("Nome_File_Visura"), Some("source.txt"));
    }

    #[test]
    fn test_person_groups_are_identical() {
        let person = record(
            DocumentType::PersonalIdentity,
            &[
                ("Cognome", "ROSSI"),
                ("Nome", "MARIO"),
                ("CF_Persona", "RSSMRA80A01H501U"),
                ("Data_Nascita", "01/01/1980"),
            ],
        );
        let row = map_to_schema(None, Some(&person), &default_schema());

        for (_, rappresentante, titolare) in PERSON_COLUMNS {
            assert_eq!(row.get(rappresentante), row.get(titolare));
        }
        assert_eq!(row.get("Cognome_Titolare"), Some("ROSSI"));
        assert_eq!(row.get("Nominativo_Rappresentante"), Some("ROSSI MARIO"));
        assert_eq!(row.get("Nominativo_Titolare"), Some("ROSSI MARIO"));
        assert_eq!(row.get("Ruolo_Persona"), Some(RUOLO_TITOLARE));
    }

    #[test]
    fn test_sole_administrator_fallback() {
        let company = record(
            DocumentType::CompanyFiling,
            &[
                ("Denominazione", "ACME SRL"),
                ("Amministratore_Unico", "MARIO ROSSI"),
            ],
        );
        let row = map_to_schema(Some(&company), None, &default_schema());

        assert_eq!(row.get("Nominativo_Rappresentante"), Some("MARIO ROSSI"));
        assert_eq!(row.get("Nominativo_Titolare"), Some("MARIO ROSSI"));
        assert_eq!(row.get("Ruolo_Persona"), Some(RUOLO_AMMINISTRATORE));
        // per-field person columns stay at their defaults
        assert_eq!(row.get("Cognome_Rappresentante"), Some(""));
    }

    #[test]
    fn test_person_record_beats_administrator_fallback() {
        let company = record(
            DocumentType::CompanyFiling,
            &[("Amministratore_Unico", "LUIGI BIANCHI")],
        );
        let person = record(DocumentType::PersonalIdentity, &[("Cognome", "ROSSI")]);
        let row = map_to_schema(Some(&company), Some(&person), &default_schema());

        assert_eq!(row.get("Ruolo_Persona"), Some(RUOLO_TITOLARE));
        assert_eq!(row.get("Nominativo_Titolare"), Some("ROSSI"));
    }

    #[test]
    fn test_unknown_fields_and_narrow_schemas_drop_silently() {
        let company = record(
            DocumentType::CompanyFiling,
            &[("Denominazione", "ACME SRL"), ("Sesso", "M")],
        );
        let schema = vec!["Ragione_Sociale".to_string()];
        let row = map_to_schema(Some(&company), None, &schema);

        assert_eq!(row.len(), 1);
        assert_eq!(row.get("Ragione_Sociale"), Some("ACME SRL"));
    }
}
