use crate::pipeline::traits::{Detokenizer, Tokenizer};

/// SentencePiece word-boundary marker (U+2581, "lower one eighth block").
pub const SPIECE_UNDERLINE: char = '\u{2581}';

/// Generic convert-tokens-to-string convention: tokens join on spaces and
/// `##`-prefixed pieces merge into the previous token.
pub struct WordPieceDetokenizer;

impl Detokenizer for WordPieceDetokenizer {
    fn detokenize(&self, tokens: &[String]) -> String {
        let mut out = String::new();
        for token in tokens {
            if let Some(rest) = token.strip_prefix("##") {
                out.push_str(rest);
            } else {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(token);
            }
        }
        out
    }

    fn starts_word(&self, token: &str) -> bool {
        !token.starts_with("##")
    }
}

/// Whitespace tokenization in the word-piece convention. Real subword models
/// plug in through the `Tokenizer` trait; this default is only exercised by
/// the forced-mode auto-repair, which tokenizes a lone quotation mark.
pub struct WordPieceTokenizer;

impl Tokenizer for WordPieceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(|t| t.to_string()).collect()
    }
}

/// SentencePiece piece decoding: pieces concatenate, the `▁` marker becomes a
/// space, and the leading space from the first piece is trimmed.
pub struct SentencePieceDetokenizer;

impl Detokenizer for SentencePieceDetokenizer {
    fn detokenize(&self, tokens: &[String]) -> String {
        let joined: String = tokens.concat();
        let spaced = joined.replace(SPIECE_UNDERLINE, " ");
        spaced.trim_start().to_string()
    }

    fn starts_word(&self, token: &str) -> bool {
        token.starts_with(SPIECE_UNDERLINE)
    }
}

/// SentencePiece-style tokenization: every whitespace-split word becomes one
/// `▁`-prefixed piece.
pub struct SentencePieceTokenizer;

impl Tokenizer for SentencePieceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|t| format!("{SPIECE_UNDERLINE}{t}"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn wordpiece_joins_and_merges_continuations() {
        let detok = WordPieceDetokenizer;
        let toks = tokens(&["set", "al", "##arm", "\"", "7", "\""]);
        assert_eq!(detok.detokenize(&toks), "set alarm \" 7 \"");
    }

    #[test]
    fn wordpiece_word_starts() {
        let detok = WordPieceDetokenizer;
        assert!(detok.starts_word("alarm"));
        assert!(!detok.starts_word("##arm"));
    }

    #[test]
    fn sentencepiece_decodes_pieces() {
        let detok = SentencePieceDetokenizer;
        let toks = tokens(&["▁set", "▁al", "arm", "▁\"", "▁7", "▁\""]);
        assert_eq!(detok.detokenize(&toks), "set alarm \" 7 \"");
    }

    #[test]
    fn sentencepiece_word_starts() {
        let detok = SentencePieceDetokenizer;
        assert!(detok.starts_word("▁set"));
        assert!(!detok.starts_word("arm"));
    }

    #[test]
    fn sentencepiece_tokenize_prefixes_each_word() {
        let tok = SentencePieceTokenizer;
        assert_eq!(tok.tokenize("\""), tokens(&["▁\""]));
        assert_eq!(tok.tokenize("a b"), tokens(&["▁a", "▁b"]));
    }

    #[test]
    fn wordpiece_tokenize_splits_on_whitespace() {
        let tok = WordPieceTokenizer;
        assert_eq!(tok.tokenize("\""), tokens(&["\""]));
    }

    #[test]
    fn empty_sequences_decode_to_empty_strings() {
        assert_eq!(WordPieceDetokenizer.detokenize(&[]), "");
        assert_eq!(SentencePieceDetokenizer.detokenize(&[]), "");
    }
}
