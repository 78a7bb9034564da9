use regex::Regex;

use crate::error::RestoreError;

/// One quoted substring in a detokenized string. Byte offsets; `text` keeps
/// the quotation symbols so a substitution swaps content, never delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Scanner for quotation-delimited substrings: a quotation symbol, optional
/// space, non-quote content, optional space, quotation symbol. Detokenizers
/// sometimes float a space inside the markers; the optional `\s?` absorbs it.
#[derive(Debug, Clone)]
pub struct QuotedScanner {
    pattern: Regex,
}

impl QuotedScanner {
    pub fn new(symbols: &[char]) -> Result<Self, RestoreError> {
        let class: String = symbols
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let pattern = Regex::new(&format!(r"[{class}]\s?[^{class}]*?\s?[{class}]"))
            .map_err(|e| RestoreError::invalid_input(format!("quoted-content pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// All quoted substrings in left-to-right order of appearance.
    pub fn find_all(&self, text: &str) -> Vec<QuotedMatch> {
        self.pattern
            .find_iter(text)
            .map(|m| QuotedMatch {
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_quoted_substrings_in_order() {
        let scanner = QuotedScanner::new(&['"']).unwrap();
        let matches = scanner.find_all(r#"set alarm "7" at "home" now"#);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "\"7\"");
        assert_eq!(matches[1].text, "\"home\"");
        assert!(matches[0].start < matches[1].start);
    }

    #[test]
    fn match_offsets_slice_the_original_string() {
        let scanner = QuotedScanner::new(&['"']).unwrap();
        let text = r#"the name is "John" ."#;
        let matches = scanner.find_all(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(&text[matches[0].start..matches[0].end], "\"John\"");
    }

    #[test]
    fn optional_inner_spaces_are_part_of_the_match() {
        let scanner = QuotedScanner::new(&['"']).unwrap();
        let matches = scanner.find_all(r#"play " hey jude " now"#);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "\" hey jude \"");
    }

    #[test]
    fn mixed_symbol_class_matches_guillemets() {
        let scanner = QuotedScanner::new(&['"', '«', '»']).unwrap();
        let matches = scanner.find_all("имя «Джон» и \"Анна\"");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "«Джон»");
        assert_eq!(matches[1].text, "\"Анна\"");
    }

    #[test]
    fn no_quotes_means_no_matches() {
        let scanner = QuotedScanner::new(&['"']).unwrap();
        assert!(scanner.find_all("nothing to see here").is_empty());
    }

    #[test]
    fn empty_quotation_is_matched() {
        let scanner = QuotedScanner::new(&['"']).unwrap();
        let matches = scanner.find_all(r#"an "" empty one"#);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "\"\"");
    }
}
