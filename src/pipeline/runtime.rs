use crate::alignment::spans::QuoteConventions;
use crate::alignment::{forced, strict};
use crate::config::AlignmentMode;
use crate::error::RestoreError;
use crate::pipeline::traits::{Detokenizer, Tokenizer};
use crate::types::{Restoration, RestoreInput};

/// Restores quoted source literals into translated output. Stateless across
/// calls; immutable after build and shareable across threads.
pub struct QuoteRestorer {
    mode: AlignmentMode,
    src_quotes: QuoteConventions,
    tgt_quotes: QuoteConventions,
    detokenizer: Box<dyn Detokenizer>,
    tokenizer: Box<dyn Tokenizer>,
}

pub(crate) struct QuoteRestorerParts {
    pub mode: AlignmentMode,
    pub src_quotes: QuoteConventions,
    pub tgt_quotes: QuoteConventions,
    pub detokenizer: Box<dyn Detokenizer>,
    pub tokenizer: Box<dyn Tokenizer>,
}

impl QuoteRestorer {
    pub(crate) fn from_parts(parts: QuoteRestorerParts) -> Self {
        Self {
            mode: parts.mode,
            src_quotes: parts.src_quotes,
            tgt_quotes: parts.tgt_quotes,
            detokenizer: parts.detokenizer,
            tokenizer: parts.tokenizer,
        }
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Runs the configured alignment mode on one sentence pair.
    pub fn restore(&self, input: &RestoreInput) -> Result<Restoration, RestoreError> {
        match self.mode {
            AlignmentMode::Strict => self.restore_strict(input),
            AlignmentMode::Forced => self.restore_forced(input),
        }
    }

    /// Strict alignment. Soft failures return the detokenized target
    /// unchanged with `restored == false`; structural failures propagate.
    pub fn restore_strict(&self, input: &RestoreInput) -> Result<Restoration, RestoreError> {
        self.validate(input)?;
        let src_string = self.detokenizer.detokenize(&input.src_tokens);
        let tgt_string = self.detokenizer.detokenize(&input.tgt_tokens);

        match strict::align_strict(
            &input.src_tokens,
            &input.tgt_tokens,
            &input.attention,
            &src_string,
            &tgt_string,
            &self.src_quotes,
            &self.tgt_quotes,
        ) {
            Ok(text) => Ok(Restoration {
                text,
                restored: true,
            }),
            Err(err) if err.is_soft_alignment_failure() => {
                tracing::warn!(
                    error = %err,
                    src = %src_string,
                    tgt = %tgt_string,
                    "strict alignment failed; outputting translation without restoring parameters"
                );
                Ok(Restoration {
                    text: tgt_string,
                    restored: false,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Forced best-effort alignment; always restores, word granularity.
    pub fn restore_forced(&self, input: &RestoreInput) -> Result<Restoration, RestoreError> {
        self.validate(input)?;
        let text = forced::align_forced(
            &input.src_tokens,
            &input.tgt_tokens,
            &input.attention,
            self.detokenizer.as_ref(),
            self.tokenizer.as_ref(),
            &self.src_quotes,
        )?;
        Ok(Restoration {
            text,
            restored: true,
        })
    }

    /// The matrix needs one row per source token. Columns may exceed the
    /// target length (padded matrices); clamping and span containment absorb
    /// the excess downstream.
    fn validate(&self, input: &RestoreInput) -> Result<(), RestoreError> {
        if input.attention.source_len() < input.src_tokens.len() {
            return Err(RestoreError::invalid_input(format!(
                "attention matrix has {} rows for {} source tokens",
                input.attention.source_len(),
                input.src_tokens.len()
            )));
        }
        Ok(())
    }
}
