use serde::Serialize;

use crate::error::RestoreError;
use crate::types::Restoration;

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub schema_version: u32,
    pub meta: ReportMeta,
    pub sentences: Vec<SentenceOutcome>,
    pub aggregates: Aggregates,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub generated_at: String,
    pub mode: String,
    pub tokenizer_variant: String,
    pub tgt_lang: String,
    pub case_count: usize,
}

/// Outcome of one sentence. `restored == false` is a strict-mode soft
/// failure; `error` is set when a fatal error aborted the sentence.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceOutcome {
    pub id: String,
    pub restored: bool,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    pub quote_marker_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub restored_count: u32,
    pub unchanged_count: u32,
    pub failed_count: u32,
    pub restored_ratio: f32,
}

pub fn sentence_outcome(
    id: &str,
    restoration: &Restoration,
    original_target: &str,
    symbols: &[char],
) -> SentenceOutcome {
    SentenceOutcome {
        id: id.to_string(),
        restored: restoration.restored,
        changed: restoration.text != original_target,
        quote_marker_count: count_quote_markers(&restoration.text, symbols),
        output_text: Some(restoration.text.clone()),
        error: None,
    }
}

/// A fatal error aborts only the sentence being processed, never the batch.
pub fn failed_outcome(id: &str, err: &RestoreError) -> SentenceOutcome {
    SentenceOutcome {
        id: id.to_string(),
        restored: false,
        changed: false,
        quote_marker_count: 0,
        output_text: None,
        error: Some(err.to_string()),
    }
}

pub fn aggregate_outcomes(outcomes: &[SentenceOutcome]) -> Aggregates {
    let mut restored_count = 0u32;
    let mut unchanged_count = 0u32;
    let mut failed_count = 0u32;
    for outcome in outcomes {
        if outcome.error.is_some() {
            failed_count += 1;
        } else if outcome.restored {
            restored_count += 1;
        } else {
            unchanged_count += 1;
        }
    }
    let restored_ratio = if outcomes.is_empty() {
        0.0
    } else {
        restored_count as f32 / outcomes.len() as f32
    };
    Aggregates {
        restored_count,
        unchanged_count,
        failed_count,
        restored_ratio,
    }
}

fn count_quote_markers(text: &str, symbols: &[char]) -> u32 {
    text.chars().filter(|c| symbols.contains(c)).count() as u32
}
