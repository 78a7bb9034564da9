use std::collections::HashSet;

use crate::alignment::spans::{extract_spans, QuoteConventions};
use crate::error::{RestoreError, Side};
use crate::types::{AttentionMatrix, Span};

/// Strict span alignment and character-level literal substitution.
///
/// Requires the same number of quoted spans on both sides and succeeds or
/// fails as a unit. Soft failures (`MalformedSpan`, `SpanCountMismatch`,
/// `UnresolvedSpan`) are returned as errors here; the pipeline runtime
/// downgrades them to an unchanged-output result.
pub fn align_strict(
    src_tokens: &[String],
    tgt_tokens: &[String],
    attention: &AttentionMatrix,
    src_string: &str,
    tgt_string: &str,
    src_quotes: &QuoteConventions,
    tgt_quotes: &QuoteConventions,
) -> Result<String, RestoreError> {
    let src = extract_spans(src_tokens, src_quotes.symbols(), Side::Source)?;
    let tgt = extract_spans(tgt_tokens, tgt_quotes.symbols(), Side::Target)?;
    if src.spans.len() != tgt.spans.len() {
        return Err(RestoreError::SpanCountMismatch {
            source_count: src.spans.len(),
            target_count: tgt.spans.len(),
        });
    }

    let mapping = map_spans(&src.spans, &tgt.spans, attention)?;
    substitute_characters(
        src_string,
        tgt_string,
        &mapping,
        src_quotes,
        tgt_quotes,
        src.spans.len(),
    )
}

/// Walks each source span left to right and claims the first unclaimed target
/// span containing the attention argmax of any of its token positions.
/// At-most-one-to-one: a claimed target span leaves candidacy for good.
fn map_spans(
    src_spans: &[Span],
    tgt_spans: &[Span],
    attention: &AttentionMatrix,
) -> Result<Vec<(usize, usize)>, RestoreError> {
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut mapping = Vec::with_capacity(src_spans.len());

    for (src_idx, span) in src_spans.iter().enumerate() {
        let mut matched = None;
        // An empty quotation has start == end + 1; the range is empty and the
        // span falls straight through to UnresolvedSpan.
        for position in span.start..=span.end {
            let att_idx = attention.argmax_target(position).ok_or_else(|| {
                RestoreError::invalid_input(format!(
                    "attention matrix has no row for source position {position}"
                ))
            })?;
            matched = tgt_spans
                .iter()
                .enumerate()
                .find(|(tgt_idx, tgt_span)| {
                    tgt_span.contains(att_idx) && !claimed.contains(tgt_idx)
                })
                .map(|(tgt_idx, _)| tgt_idx);
            if let Some(tgt_idx) = matched {
                claimed.insert(tgt_idx);
                mapping.push((src_idx, tgt_idx));
                tracing::debug!(
                    src_span = src_idx,
                    tgt_span = tgt_idx,
                    position,
                    att_idx,
                    "strict: source span claimed target span"
                );
                break;
            }
            // argmax landed outside every unclaimed span; try the next piece
        }
        if matched.is_none() {
            return Err(RestoreError::UnresolvedSpan {
                start: span.start,
                end: span.end,
            });
        }
    }
    Ok(mapping)
}

/// Rebuilds the target string in character space: unquoted target text is
/// copied byte-for-byte, and each quoted target substring is replaced by the
/// whole quoted source substring (markers included) of its mapped span.
fn substitute_characters(
    src_string: &str,
    tgt_string: &str,
    mapping: &[(usize, usize)],
    src_quotes: &QuoteConventions,
    tgt_quotes: &QuoteConventions,
    span_count: usize,
) -> Result<String, RestoreError> {
    let src_matches = src_quotes.scanner().find_all(src_string);
    let tgt_matches = tgt_quotes.scanner().find_all(tgt_string);
    if src_matches.len() != span_count || tgt_matches.len() != span_count {
        return Err(RestoreError::corrupted(format!(
            "token-level span count {span_count} disagrees with string-level matches \
             ({} source, {} target): [{src_string}] / [{tgt_string}]",
            src_matches.len(),
            tgt_matches.len()
        )));
    }

    let mut tgt_to_src: Vec<Option<usize>> = vec![None; span_count];
    for &(src_idx, tgt_idx) in mapping {
        tgt_to_src[tgt_idx] = Some(src_idx);
    }

    let mut out = String::with_capacity(tgt_string.len());
    let mut curr = 0usize;
    for (pos, tgt_match) in tgt_matches.iter().enumerate() {
        if tgt_match.start > curr {
            out.push_str(&tgt_string[curr..tgt_match.start]);
        }
        let src_idx = tgt_to_src[pos].ok_or_else(|| {
            RestoreError::corrupted(format!("target match {pos} has no mapped source span"))
        })?;
        out.push_str(&src_matches[src_idx].text);
        curr = tgt_match.end;
    }
    if curr < tgt_string.len() {
        out.push_str(&tgt_string[curr..]);
    }
    Ok(out)
}
