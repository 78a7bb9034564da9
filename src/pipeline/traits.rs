/// Reconstructs natural text from subword tokens and exposes the
/// piece-boundary convention the forced aligner needs.
pub trait Detokenizer: Send + Sync {
    fn detokenize(&self, tokens: &[String]) -> String;

    /// Whether this token starts a new natural-language word (as opposed to
    /// continuing the previous one).
    fn starts_word(&self, token: &str) -> bool;
}

/// Text-to-token capability. Only the forced-mode auto-repair uses it, to
/// synthesize a single closing-quote token in the active convention.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Closed set of subword reconstruction conventions. `WordPiece` is the
/// generic convert-tokens-to-string convention; `SentencePiece` is the
/// piece-decoding convention of the Marian model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerVariant {
    #[default]
    WordPiece,
    SentencePiece,
}
