use crate::alignment::spans::QuoteConventions;
use crate::config::RestoreConfig;
use crate::error::RestoreError;
use crate::pipeline::defaults::{
    SentencePieceDetokenizer, SentencePieceTokenizer, WordPieceDetokenizer, WordPieceTokenizer,
};
use crate::pipeline::runtime::{QuoteRestorer, QuoteRestorerParts};
use crate::pipeline::traits::{Detokenizer, Tokenizer, TokenizerVariant};

pub struct QuoteRestorerBuilder {
    config: RestoreConfig,
    detokenizer: Option<Box<dyn Detokenizer>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
}

impl QuoteRestorerBuilder {
    pub fn new(config: RestoreConfig) -> Self {
        Self {
            config,
            detokenizer: None,
            tokenizer: None,
        }
    }

    pub fn with_detokenizer(mut self, detokenizer: Box<dyn Detokenizer>) -> Self {
        self.detokenizer = Some(detokenizer);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn build(self) -> Result<QuoteRestorer, RestoreError> {
        let src_quotes = QuoteConventions::base()?;
        let tgt_quotes = QuoteConventions::for_language(&self.config.tgt_lang)?;

        let detokenizer = self.detokenizer.unwrap_or_else(|| {
            match self.config.tokenizer_variant {
                TokenizerVariant::WordPiece => Box::new(WordPieceDetokenizer),
                TokenizerVariant::SentencePiece => Box::new(SentencePieceDetokenizer),
            }
        });
        let tokenizer = self.tokenizer.unwrap_or_else(|| {
            match self.config.tokenizer_variant {
                TokenizerVariant::WordPiece => Box::new(WordPieceTokenizer),
                TokenizerVariant::SentencePiece => Box::new(SentencePieceTokenizer),
            }
        });

        Ok(QuoteRestorer::from_parts(QuoteRestorerParts {
            mode: self.config.mode,
            src_quotes,
            tgt_quotes,
            detokenizer,
            tokenizer,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlignmentMode;
    use crate::types::{AttentionMatrix, RestoreInput};

    #[test]
    fn builder_defaults_build_a_strict_restorer() {
        let restorer = QuoteRestorerBuilder::new(RestoreConfig::default())
            .build()
            .expect("build should succeed");
        assert_eq!(restorer.mode(), AlignmentMode::Strict);
    }

    #[test]
    fn builder_honors_forced_mode() {
        let config = RestoreConfig {
            mode: AlignmentMode::Forced,
            ..RestoreConfig::default()
        };
        let restorer = QuoteRestorerBuilder::new(config).build().unwrap();
        assert_eq!(restorer.mode(), AlignmentMode::Forced);
    }

    #[test]
    fn custom_detokenizer_is_used() {
        struct UpperDetokenizer;
        impl Detokenizer for UpperDetokenizer {
            fn detokenize(&self, tokens: &[String]) -> String {
                tokens.join(" ").to_uppercase()
            }
            fn starts_word(&self, _token: &str) -> bool {
                true
            }
        }

        let restorer = QuoteRestorerBuilder::new(RestoreConfig::default())
            .with_detokenizer(Box::new(UpperDetokenizer))
            .build()
            .unwrap();
        let input = RestoreInput {
            src_tokens: vec!["hi".to_string()],
            tgt_tokens: vec!["hola".to_string()],
            attention: AttentionMatrix::new(vec![vec![1.0]]).unwrap(),
        };
        let out = restorer.restore_strict(&input).unwrap();
        assert_eq!(out.text, "HOLA");
        assert!(out.restored);
    }
}
