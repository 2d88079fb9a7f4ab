//! Common regex patterns for Italian document extraction.
//!
//! All matching patterns are compiled case-insensitive and multi-line via an
//! inline `(?im)` so the rule loop can treat every pattern uniformly.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // --- Company registry extract (visura camerale) ---

    pub static ref DENOMINAZIONE: Regex = Regex::new(
        r"(?im)(?:Denominazione|Ragione\s+sociale)[:\s]*\n?\s*([A-Z][^\n]+)"
    ).unwrap();

    // Partita IVA: labeled form first, bare 11-digit run as fallback
    pub static ref PARTITA_IVA_LABELED: Regex = Regex::new(
        r"(?im)(?:P\.?\s*IVA|Partita\s+IVA)[:\s]*\n?\s*(\d{11})\b"
    ).unwrap();

    pub static ref PARTITA_IVA_STANDALONE: Regex = Regex::new(
        r"(?im)\b(\d{11})\b"
    ).unwrap();

    pub static ref CODICE_FISCALE: Regex = Regex::new(
        r"(?im)(?:Codice\s+Fiscale|C\.?\s*F\.?)[:\s]*\n?\s*([A-Z0-9]{11,16})\b"
    ).unwrap();

    pub static ref NUMERO_REA: Regex = Regex::new(
        r"(?im)(?:N\.?\s*REA|Numero\s+REA|REA)[:\s]*\n?\s*([A-Z]{2}[\s\-]?\d+)"
    ).unwrap();

    pub static ref FORMA_GIURIDICA: Regex = Regex::new(
        r"(?im)(?:Forma\s+giuridica|Natura\s+giuridica)[:\s]*\n?\s*([^\n]+)"
    ).unwrap();

    pub static ref SEDE_LEGALE: Regex = Regex::new(
        r"(?im)(?:Sede\s+legale|Indirizzo)[:\s]*\n?\s*([^\n]+?)(?:\s*\d{5}|\n)"
    ).unwrap();

    pub static ref CAP: Regex = Regex::new(
        r"(?im)(?:^|\s|-)(\d{5})(?:\s+[A-Z]|\s*-|\s*\()"
    ).unwrap();

    pub static ref COMUNE: Regex = Regex::new(
        r"(?im)(?:\d{5}\s*[-,]?\s*|Comune[:\s]+)([A-Z][A-Za-z][A-Za-z\s'\.]+?)(?:\s*[\(\-]|,?\s*(?:Provincia|Prov\.?)\s*[:\(]|\s+[A-Z]{2}\s*[\)\-])"
    ).unwrap();

    // Two alternative captures for the same concept: labeled sigla or a
    // bare parenthesized pair of letters.
    pub static ref PROVINCIA: Regex = Regex::new(
        r"(?im)(?:Provincia|Prov\.?|Sigla)[:\s]*\(?\s*([A-Z]{2})\s*\)?|(?:^|\s)\(([A-Z]{2})\)"
    ).unwrap();

    pub static ref DATA_COSTITUZIONE: Regex = Regex::new(
        r"(?im)(?:Data\s+costituzione|Costituita\s+il|Data\s+iscrizione)[:\s]*\n?\s*(\d{1,2}[/\.\-]\d{1,2}[/\.\-](?:\d{4}|\d{2}))"
    ).unwrap();

    pub static ref CAPITALE_SOCIALE: Regex = Regex::new(
        r"(?im)(?:Capitale\s+sociale|Capitale)[:\s]*\n?\s*(?:€|EUR|Euro)?\s*([\d\.,]+)"
    ).unwrap();

    pub static ref STATO_ATTIVITA: Regex = Regex::new(
        r"(?im)(?:Stato)[:\s]*\n?\s*(ATTIVA|ATTIVO|CESSATA|CESSATO|SOSPESA|SOSPESO)"
    ).unwrap();

    pub static ref AMMINISTRATORE_UNICO: Regex = Regex::new(
        r"(?im)(?:Amministratore\s+Unico|Titolare\s+firmatario|Socio\s+unico\s+amministratore)[:\s]*\n?\s*([A-Z][A-Z\s']+?)(?:\n|,|$)"
    ).unwrap();

    pub static ref OGGETTO_SOCIALE: Regex = Regex::new(
        r"(?im)(?:Oggetto\s+sociale|Attivit[aà]\s+esercitata)[:\s]*\n?\s*([^\n]+)"
    ).unwrap();

    // --- Personal identity documents ---

    pub static ref COGNOME: Regex = Regex::new(
        r"(?im)(?:Cognome|Surname)[:\s]*\n?\s*([A-Z\s]+?)(?:\n|Nome|$)"
    ).unwrap();

    // Word boundary keeps this from firing inside "COGNOME"
    pub static ref NOME: Regex = Regex::new(
        r"(?im)\b(?:Nome|Name)[:\s]*\n?\s*([A-Z][A-Za-z\s]+?)(?:\n|Luogo|Nat|Data|$)"
    ).unwrap();

    pub static ref LUOGO_NASCITA: Regex = Regex::new(
        r"(?im)(?:Luogo\s*di\s*nascita|Nat[oa]\s*a|Place\s*of\s*birth)[:\s]*\n?\s*([A-Z][A-Za-z\s']+?)(?:\s*\(|,|\n|il|$)"
    ).unwrap();

    pub static ref PROVINCIA_NASCITA: Regex = Regex::new(
        r"(?im)(?:Luogo\s*di\s*nascita|Nat[oa]\s*a)[:\s]*[^(\n]*\(([A-Z]{2})\)"
    ).unwrap();

    pub static ref DATA_NASCITA: Regex = Regex::new(
        r"(?im)(?:Data\s*di\s*nascita|Nat[oa]\s*il|Date\s*of\s*birth)[:\s]*\n?\s*(\d{1,2}[/\.\-\s]\d{1,2}[/\.\-\s](?:\d{4}|\d{2}))"
    ).unwrap();

    pub static ref SESSO: Regex = Regex::new(
        r"(?im)(?:Sesso|Sex)[:\s]*\n?\s*([MF])\b"
    ).unwrap();

    pub static ref STATURA: Regex = Regex::new(
        r"(?im)(?:Statura|Height)[:\s]*\n?\s*(\d+[\.,]?\d*)\s*(?:cm|m)?"
    ).unwrap();

    pub static ref CITTADINANZA: Regex = Regex::new(
        r"(?im)(?:Cittadinanza|Citizenship)[:\s]*\n?\s*([A-Z][A-Za-z]+)"
    ).unwrap();

    pub static ref RESIDENZA: Regex = Regex::new(
        r"(?im)(?:Residenza|Residence|Indirizzo)[:\s]*\n?\s*([A-Z][A-Za-z0-9\s,\.']+?)(?:\n\n|\n[A-Z]{2}\d{7}|Rilascia|\n)"
    ).unwrap();

    pub static ref COMUNE_RESIDENZA: Regex = Regex::new(
        r"(?im)(?:Comune|Municipality)[:\s]*\n?\s*([A-Z][A-Za-z\s]+?)(?:\s*\(|,|\n|$)"
    ).unwrap();

    // Italian personal fiscal code: fixed 16-character shape, unlabeled
    pub static ref CF_PERSONA: Regex = Regex::new(
        r"(?im)\b([A-Z]{6}\d{2}[A-Z]\d{2}[A-Z]\d{3}[A-Z])\b"
    ).unwrap();

    pub static ref NUMERO_DOCUMENTO: Regex = Regex::new(
        r"(?im)(?:Carta\s*d[i']?\s*identit[aà]\s*n|Numero|N\.|Document\s*no)[:\.]?\s*\n?\s*([A-Z]{2}\s*\d{7}[A-Z]?|[A-Z0-9]{6,10})"
    ).unwrap();

    pub static ref DATA_RILASCIO: Regex = Regex::new(
        r"(?im)(?:Rilasciat[oa]|Emess[oa]|Data\s*di\s*rilascio|Date\s*of\s*issue)[:\s]*\n?\s*(?:il\s*)?(\d{1,2}[/\.\-\s]\d{1,2}[/\.\-\s](?:\d{4}|\d{2}))"
    ).unwrap();

    pub static ref DATA_SCADENZA: Regex = Regex::new(
        r"(?im)(?:Scadenza|Valid[oa]\s*fino\s*al|Date\s*of\s*expiry)[:\s]*\n?\s*(\d{1,2}[/\.\-\s]\d{1,2}[/\.\-\s](?:\d{4}|\d{2}))"
    ).unwrap();

    pub static ref COMUNE_RILASCIO: Regex = Regex::new(
        r"(?im)(?:Comune\s*di|Rilasciat[oa]\s*da|Issued\s*by)[:\s]*\n?\s*([A-Z][A-Za-z\s]+?)(?:\s*\(|,|\n|$)"
    ).unwrap();

    pub static ref TIPO_DOCUMENTO: Regex = Regex::new(
        r"(?im)(CARTA\s*D[I']?\s*IDENTIT[AÀ]|PATENTE|PASSAPORTO|IDENTITY\s*CARD)"
    ).unwrap();

    // --- Cleaner helpers ---

    /// Any run of accepted date separators.
    pub static ref DATE_SEPARATORS: Regex = Regex::new(r"[/\.\-\s]+").unwrap();

    /// Trailing punctuation left behind by greedy pattern boundaries.
    pub static ref TRAILING_PUNCT: Regex = Regex::new(r"[,\-\.\s]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partita_iva_labeled() {
        let caps = PARTITA_IVA_LABELED.captures("P.IVA: 12345678901").unwrap();
        assert_eq!(&caps[1], "12345678901");
    }

    #[test]
    fn test_partita_iva_labeled_rejects_short_runs() {
        assert!(PARTITA_IVA_LABELED.captures("P.IVA: 1234567").is_none());
    }

    #[test]
    fn test_cf_persona_shape() {
        let caps = CF_PERSONA.captures("CF RSSMRA80A01H501U emesso").unwrap();
        assert_eq!(&caps[1], "RSSMRA80A01H501U");
    }

    #[test]
    fn test_provincia_alternative_groups() {
        let caps = PROVINCIA.captures("MILANO (MI)").unwrap();
        assert!(caps.get(1).is_none());
        assert_eq!(caps.get(2).unwrap().as_str(), "MI");
    }

    #[test]
    fn test_date_with_mixed_separators() {
        let caps = DATA_NASCITA.captures("Data di nascita: 01.02-1980").unwrap();
        assert_eq!(&caps[1], "01.02-1980");
    }
}
