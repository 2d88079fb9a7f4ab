//! Text normalization applied before pattern matching.

/// Raw text prepared for pattern matching, in two variants.
///
/// Line-anchored rules need line breaks preserved; rules that must match
/// across a wrapped line need them folded away. Both variants are built up
/// front so every rule can pick the one it was written against.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    lines: String,
    flat: String,
}

impl NormalizedText {
    /// Normalize raw document text. Horizontal whitespace runs collapse to a
    /// single space within each line; the flat variant additionally folds
    /// line breaks to spaces.
    pub fn new(raw: &str) -> Self {
        let lines = raw
            .lines()
            .map(collapse_spaces)
            .collect::<Vec<_>>()
            .join("\n");

        let flat = collapse_spaces(&lines.replace('\n', " "));

        Self { lines, flat }
    }

    /// Line-break-preserving variant.
    pub fn lines(&self) -> &str {
        &self.lines
    }

    /// Flattened variant with line breaks folded to spaces.
    pub fn flat(&self) -> &str {
        &self.flat
    }
}

/// Collapse runs of spaces and tabs to a single space and trim the ends.
pub fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for c in s.trim().chars() {
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(collapse_spaces("  a \t b  c "), "a b c");
        assert_eq!(collapse_spaces(""), "");
    }

    #[test]
    fn test_lines_variant_preserves_breaks() {
        let text = NormalizedText::new("Denominazione:   ACME\nP.IVA:\t12345678901\n");
        assert_eq!(text.lines(), "Denominazione: ACME\nP.IVA: 12345678901");
    }

    #[test]
    fn test_flat_variant_folds_breaks() {
        let text = NormalizedText::new("Sede legale:\nVIA ROMA 1");
        assert_eq!(text.flat(), "Sede legale: VIA ROMA 1");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = NormalizedText::new("a  b\n\nc");
        let twice = NormalizedText::new(once.lines());
        assert_eq!(once.lines(), twice.lines());
        assert_eq!(once.flat(), twice.flat());
    }
}
