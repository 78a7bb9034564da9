pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use config::{AlignmentMode, RestoreConfig};
pub use error::{RestoreError, Side};
pub use pipeline::builder::QuoteRestorerBuilder;
pub use pipeline::runtime::QuoteRestorer;
pub use pipeline::traits::{Detokenizer, Tokenizer, TokenizerVariant};
pub use types::{AttentionMatrix, Restoration, RestoreInput, Span};

pub use alignment::report::{
    aggregate_outcomes, failed_outcome, sentence_outcome, Aggregates, BatchReport, ReportMeta,
    SentenceOutcome,
};
pub use alignment::spans::quotation_symbols;
