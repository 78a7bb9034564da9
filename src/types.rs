use crate::error::RestoreError;

/// Inclusive token-index range of quoted content, quotation markers excluded.
///
/// An empty quotation (two adjacent markers) yields `start == end + 1`; such a
/// span contains no token index and can never claim an attention argmax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// Pooled cross-attention weights, one scalar per (source token, target token)
/// pair. Pooling across heads/layers happens upstream; only the relative
/// ordering of weights within a row matters here.
#[derive(Debug, Clone)]
pub struct AttentionMatrix {
    weights: Vec<Vec<f32>>,
    target_len: usize,
}

impl AttentionMatrix {
    /// Builds a matrix from `[source_len][target_len]` rows. Rows must be
    /// rectangular and every weight finite.
    pub fn new(weights: Vec<Vec<f32>>) -> Result<Self, RestoreError> {
        let target_len = weights.first().map(Vec::len).unwrap_or(0);
        for (row_idx, row) in weights.iter().enumerate() {
            if row.len() != target_len {
                return Err(RestoreError::invalid_input(format!(
                    "attention matrix is ragged: row {row_idx} has {} columns, expected {target_len}",
                    row.len()
                )));
            }
            if let Some(col_idx) = row.iter().position(|w| !w.is_finite()) {
                return Err(RestoreError::invalid_input(format!(
                    "attention weight at ({row_idx}, {col_idx}) is not finite"
                )));
            }
        }
        Ok(Self {
            weights,
            target_len,
        })
    }

    pub fn source_len(&self) -> usize {
        self.weights.len()
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Index of the strongest-attended target token for one source position.
    /// `None` when the source index has no row or the matrix has no columns.
    pub fn argmax_target(&self, source_index: usize) -> Option<usize> {
        let row = self.weights.get(source_index)?;
        let mut best: Option<(usize, f32)> = None;
        for (idx, &w) in row.iter().enumerate() {
            match best {
                Some((_, best_w)) if w <= best_w => {}
                _ => best = Some((idx, w)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// One restoration call: both token sequences plus the pooled attention slice
/// for this sentence pair.
#[derive(Debug, Clone)]
pub struct RestoreInput {
    pub src_tokens: Vec<String>,
    pub tgt_tokens: Vec<String>,
    pub attention: AttentionMatrix,
}

/// Result of one restoration call. `restored` is false only in strict mode,
/// when alignment soft-failed and `text` is the translation unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restoration {
    pub text: String,
    pub restored: bool,
}
