use std::path::Path;

use crate::error::RestoreError;
use crate::pipeline::traits::TokenizerVariant;

/// Alignment strategy selected per restorer.
///
/// Strict requires equal span counts and succeeds or fails as a unit; forced
/// is best-effort, tolerates mismatched counts, and substitutes at word
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    #[default]
    Strict,
    Forced,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RestoreConfig {
    /// Target language code; selects the target-side quotation symbol set.
    #[serde(default = "default_tgt_lang")]
    pub tgt_lang: String,
    #[serde(default)]
    pub tokenizer_variant: TokenizerVariant,
    #[serde(default)]
    pub mode: AlignmentMode,
}

impl RestoreConfig {
    pub const DEFAULT_TGT_LANG: &'static str = "en";

    pub fn load(path: &Path) -> Result<Self, RestoreError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| RestoreError::io("read config", e))?;
        serde_json::from_str(&data).map_err(|e| RestoreError::json("parse config", e))
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            tgt_lang: Self::DEFAULT_TGT_LANG.to_string(),
            tokenizer_variant: TokenizerVariant::default(),
            mode: AlignmentMode::default(),
        }
    }
}

fn default_tgt_lang() -> String {
    RestoreConfig::DEFAULT_TGT_LANG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_strict_wordpiece_english() {
        let config = RestoreConfig::default();
        assert_eq!(config.tgt_lang, "en");
        assert_eq!(config.tokenizer_variant, TokenizerVariant::WordPiece);
        assert_eq!(config.mode, AlignmentMode::Strict);
    }

    #[test]
    fn config_parses_from_json_with_defaults() {
        let config: RestoreConfig = serde_json::from_str(r#"{"tgt_lang": "ru"}"#).unwrap();
        assert_eq!(config.tgt_lang, "ru");
        assert_eq!(config.mode, AlignmentMode::Strict);
    }

    #[test]
    fn config_parses_forced_sentencepiece() {
        let config: RestoreConfig = serde_json::from_str(
            r#"{"tgt_lang": "es", "tokenizer_variant": "sentencepiece", "mode": "forced"}"#,
        )
        .unwrap();
        assert_eq!(config.tokenizer_variant, TokenizerVariant::SentencePiece);
        assert_eq!(config.mode, AlignmentMode::Forced);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let err = RestoreConfig::load(Path::new("/nonexistent/restore.json")).unwrap_err();
        assert!(matches!(err, RestoreError::Io { .. }));
    }
}
