use crate::alignment::quoted_text::QuotedScanner;
use crate::error::{RestoreError, Side};
use crate::types::Span;

/// Quotation markers are exclusively used to wrap parameters, so a token is a
/// marker if any symbol occurs anywhere inside it (subword pieces may carry
/// surrounding characters).
pub fn quotation_symbols(lang: &str) -> Vec<char> {
    let mut symbols = vec!['"'];
    if lang == "ru" {
        symbols.extend(['«', '»']);
    }
    symbols
}

/// Spans plus the marker token indices they were derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanExtraction {
    pub spans: Vec<Span>,
    pub marker_indices: Vec<usize>,
}

pub fn marker_indices(tokens: &[String], symbols: &[char]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| symbols.iter().any(|&symbol| token.contains(symbol)))
        .map(|(index, _)| index)
        .collect()
}

/// Consecutive marker pairs become spans with the markers themselves excluded.
pub fn spans_from_markers(markers: &[usize]) -> Vec<Span> {
    markers
        .chunks_exact(2)
        .map(|pair| Span {
            start: pair[0] + 1,
            end: pair[1].saturating_sub(1),
        })
        .collect()
}

pub fn extract_spans(
    tokens: &[String],
    symbols: &[char],
    side: Side,
) -> Result<SpanExtraction, RestoreError> {
    let markers = marker_indices(tokens, symbols);
    if markers.len() % 2 != 0 {
        return Err(RestoreError::MalformedSpan {
            side,
            marker_count: markers.len(),
        });
    }
    Ok(SpanExtraction {
        spans: spans_from_markers(&markers),
        marker_indices: markers,
    })
}

/// Per-side quotation conventions: the symbol set and the compiled scanner
/// for quoted substrings in detokenized text.
#[derive(Debug, Clone)]
pub struct QuoteConventions {
    symbols: Vec<char>,
    scanner: QuotedScanner,
}

impl QuoteConventions {
    /// Source sequences always quote with `"` regardless of language.
    pub fn base() -> Result<Self, RestoreError> {
        Self::from_symbols(vec!['"'])
    }

    pub fn for_language(lang: &str) -> Result<Self, RestoreError> {
        Self::from_symbols(quotation_symbols(lang))
    }

    fn from_symbols(symbols: Vec<char>) -> Result<Self, RestoreError> {
        let scanner = QuotedScanner::new(&symbols)?;
        Ok(Self { symbols, scanner })
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn scanner(&self) -> &QuotedScanner {
        &self.scanner
    }
}
