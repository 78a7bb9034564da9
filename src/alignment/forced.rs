use crate::alignment::spans::{marker_indices, spans_from_markers, QuoteConventions};
use crate::error::{RestoreError, Side};
use crate::pipeline::traits::{Detokenizer, Tokenizer};
use crate::types::{AttentionMatrix, Span};

/// Best-effort span alignment with word-level substitution.
///
/// Only span boundaries are attention-mapped, span counts may mismatch, and
/// the output is always produced. The sole failure surfaces are
/// `CorruptedAlignment` (attention index escaping the tokenized target) and
/// `MalformedSpan` when the single source auto-repair attempt is not enough.
pub fn align_forced(
    src_tokens: &[String],
    tgt_tokens: &[String],
    attention: &AttentionMatrix,
    detok: &dyn Detokenizer,
    tokenizer: &dyn Tokenizer,
    src_quotes: &QuoteConventions,
) -> Result<String, RestoreError> {
    let src_tokens = repair_source_markers(src_tokens, tokenizer, src_quotes)?;
    let markers = marker_indices(&src_tokens, src_quotes.symbols());
    let src_spans = spans_from_markers(&markers);

    let piece_to_word = piece_to_word_map(tgt_tokens, detok);
    let word_count = piece_to_word.last().map(|&w| w + 1).unwrap_or(0).max(0);

    let mut ranges = Vec::with_capacity(src_spans.len());
    for span in &src_spans {
        ranges.push(word_range_for_span(
            span,
            attention,
            tgt_tokens.len(),
            &piece_to_word,
            word_count,
        )?);
    }

    let src_string = detok.detokenize(&src_tokens);
    let tgt_string = detok.detokenize(tgt_tokens);
    let src_matches = src_quotes.scanner().find_all(&src_string);
    if src_matches.len() < src_spans.len() {
        return Err(RestoreError::corrupted(format!(
            "{} quoted source spans but only {} quoted substrings in [{src_string}]",
            src_spans.len(),
            src_matches.len()
        )));
    }

    let replacements: Vec<&str> = src_matches.iter().map(|m| m.text.as_str()).collect();
    Ok(substitute_words(&tgt_string, &ranges, &replacements))
}

/// Tolerant auto-repair for a single missing trailing quote: append one
/// synthetic quote token and rescan once. Target sequences are never repaired.
fn repair_source_markers(
    src_tokens: &[String],
    tokenizer: &dyn Tokenizer,
    src_quotes: &QuoteConventions,
) -> Result<Vec<String>, RestoreError> {
    let mut tokens = src_tokens.to_vec();
    let markers = marker_indices(&tokens, src_quotes.symbols());
    if markers.len() % 2 == 0 {
        return Ok(tokens);
    }

    tracing::warn!(
        marker_count = markers.len(),
        "odd quotation marker count in source; appending synthetic closing quote"
    );
    tokens.extend(tokenizer.tokenize("\""));
    let repaired = marker_indices(&tokens, src_quotes.symbols());
    if repaired.len() % 2 != 0 {
        return Err(RestoreError::MalformedSpan {
            side: Side::Source,
            marker_count: repaired.len(),
        });
    }
    Ok(tokens)
}

/// Word index of every target piece. A piece that starts a new word bumps the
/// counter; continuations inherit it. Pieces before the first word start carry
/// -1, absorbed later by the widening clamp.
fn piece_to_word_map(tokens: &[String], detok: &dyn Detokenizer) -> Vec<isize> {
    let mut word = -1isize;
    tokens
        .iter()
        .map(|token| {
            if detok.starts_word(token) {
                word += 1;
            }
            word
        })
        .collect()
}

/// Maps one source span's boundary argmaxes to a half-open target word range,
/// widened by one word on each side to absorb partial-word boundary noise.
fn word_range_for_span(
    span: &Span,
    attention: &AttentionMatrix,
    tgt_len: usize,
    piece_to_word: &[isize],
    word_count: isize,
) -> Result<(usize, usize), RestoreError> {
    let s1 = attention.argmax_target(span.start).ok_or_else(|| {
        RestoreError::corrupted(format!(
            "no attention row for source span boundary {}",
            span.start
        ))
    })?;
    let s2 = attention.argmax_target(span.end).ok_or_else(|| {
        RestoreError::corrupted(format!(
            "no attention row for source span boundary {}",
            span.end
        ))
    })?;

    let s1 = s1.min(tgt_len.saturating_sub(1));
    let s2 = s2.min(tgt_len.saturating_sub(1));

    let w1 = piece_to_word.get(s1).copied().ok_or_else(|| {
        RestoreError::corrupted(format!("attention index {s1} outside tokenized target"))
    })?;
    let w2 = piece_to_word.get(s2).copied().ok_or_else(|| {
        RestoreError::corrupted(format!("attention index {s2} outside tokenized target"))
    })?;

    let start = (w1 - 1).max(0) as usize;
    let end = (w2 + 1).min(word_count).max(0) as usize;
    tracing::debug!(
        span_start = span.start,
        span_end = span.end,
        s1,
        s2,
        word_start = start,
        word_end = end,
        "forced: span boundary mapped to word range"
    );
    Ok((start, end))
}

/// Splices the source literals over the target word list. Ranges are applied
/// in span order with no overlap reconciliation: `curr` jumps to each range's
/// end unconditionally, so a later overlapping range consumes whatever words
/// remain at that position.
fn substitute_words(tgt_string: &str, ranges: &[(usize, usize)], replacements: &[&str]) -> String {
    let words: Vec<&str> = tgt_string.split(' ').collect();
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    let mut curr = 0usize;
    for (i, &(start, end)) in ranges.iter().enumerate() {
        if start > curr {
            let from = curr.min(words.len());
            let to = start.min(words.len());
            out.extend(words[from..to].iter().map(|w| w.to_string()));
        }
        out.push(replacements[i].to_string());
        curr = end;
    }
    if curr < words.len() {
        out.extend(words[curr..].iter().map(|w| w.to_string()));
    }
    out.join(" ")
}
