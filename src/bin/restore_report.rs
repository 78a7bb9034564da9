use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use quote_align::pipeline::defaults::{SentencePieceDetokenizer, WordPieceDetokenizer};
use quote_align::{
    aggregate_outcomes, failed_outcome, quotation_symbols, sentence_outcome, AlignmentMode,
    AttentionMatrix, BatchReport, Detokenizer, QuoteRestorer, QuoteRestorerBuilder, ReportMeta,
    RestoreConfig, RestoreInput, SentenceOutcome, TokenizerVariant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeChoice {
    Strict,
    Forced,
}

impl ModeChoice {
    fn mode(self) -> AlignmentMode {
        match self {
            Self::Strict => AlignmentMode::Strict,
            Self::Forced => AlignmentMode::Forced,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Forced => "forced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TokenizerChoice {
    Wordpiece,
    Sentencepiece,
}

impl TokenizerChoice {
    fn variant(self) -> TokenizerVariant {
        match self {
            Self::Wordpiece => TokenizerVariant::WordPiece,
            Self::Sentencepiece => TokenizerVariant::SentencePiece,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Wordpiece => "wordpiece",
            Self::Sentencepiece => "sentencepiece",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "restore_report")]
#[command(about = "Generate quoted-parameter restoration reports over translated batches")]
struct Args {
    /// JSONL file of case records: {id, src_tokens, tgt_tokens, attention}.
    #[arg(long, env = "QUOTE_ALIGN_REPORT_CASES")]
    cases: PathBuf,
    #[arg(long, env = "QUOTE_ALIGN_REPORT_OUT")]
    out: Option<PathBuf>,
    #[arg(long, env = "QUOTE_ALIGN_REPORT_MODE", value_enum, default_value_t = ModeChoice::Strict)]
    mode: ModeChoice,
    #[arg(
        long,
        env = "QUOTE_ALIGN_REPORT_TOKENIZER",
        value_enum,
        default_value_t = TokenizerChoice::Wordpiece
    )]
    tokenizer: TokenizerChoice,
    #[arg(long, env = "QUOTE_ALIGN_REPORT_TGT_LANG", default_value = "en")]
    tgt_lang: String,
    #[arg(long, env = "QUOTE_ALIGN_REPORT_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "QUOTE_ALIGN_REPORT_OFFSET", default_value_t = 0)]
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct CaseRecord {
    id: String,
    src_tokens: Vec<String>,
    tgt_tokens: Vec<String>,
    attention: Vec<Vec<f32>>,
}

fn main() {
    if run().is_err() {
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let mut cases = load_cases(&args.cases)?;
    if args.offset > 0 {
        cases = cases.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }
    if cases.is_empty() {
        return Err("No cases selected after applying offset/limit.".to_string());
    }

    let config = RestoreConfig {
        tgt_lang: args.tgt_lang.clone(),
        tokenizer_variant: args.tokenizer.variant(),
        mode: args.mode.mode(),
    };
    let restorer = QuoteRestorerBuilder::new(config)
        .build()
        .map_err(|e| format!("failed to build restorer: {e}"))?;
    let detok: Box<dyn Detokenizer> = match args.tokenizer.variant() {
        TokenizerVariant::WordPiece => Box::new(WordPieceDetokenizer),
        TokenizerVariant::SentencePiece => Box::new(SentencePieceDetokenizer),
    };
    let symbols = quotation_symbols(&args.tgt_lang);

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .map_err(|e| format!("progress template: {e}"))?,
    );

    let mut sentences: Vec<SentenceOutcome> = Vec::with_capacity(cases.len());
    for case in &cases {
        progress.set_message(case.id.clone());
        sentences.push(run_case(case, &restorer, detok.as_ref(), &symbols));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let aggregates = aggregate_outcomes(&sentences);
    let report = BatchReport {
        schema_version: 1,
        meta: ReportMeta {
            generated_at: Utc::now().to_rfc3339(),
            mode: args.mode.as_str().to_string(),
            tokenizer_variant: args.tokenizer.as_str().to_string(),
            tgt_lang: args.tgt_lang.clone(),
            case_count: sentences.len(),
        },
        sentences,
        aggregates,
    };

    let rendered =
        serde_json::to_string_pretty(&report).map_err(|e| format!("serialize report: {e}"))?;
    match &args.out {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| format!("write {}: {e}", path.display()))?;
            println!(
                "Wrote report for {} cases to {} ({} restored, {} unchanged, {} failed).",
                report.meta.case_count,
                path.display(),
                report.aggregates.restored_count,
                report.aggregates.unchanged_count,
                report.aggregates.failed_count
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_case(
    case: &CaseRecord,
    restorer: &QuoteRestorer,
    detok: &dyn Detokenizer,
    symbols: &[char],
) -> SentenceOutcome {
    let attention = match AttentionMatrix::new(case.attention.clone()) {
        Ok(attention) => attention,
        Err(err) => return failed_outcome(&case.id, &err),
    };
    let input = RestoreInput {
        src_tokens: case.src_tokens.clone(),
        tgt_tokens: case.tgt_tokens.clone(),
        attention,
    };
    let original_target = detok.detokenize(&case.tgt_tokens);
    match restorer.restore(&input) {
        Ok(restoration) => sentence_outcome(&case.id, &restoration, &original_target, symbols),
        Err(err) => failed_outcome(&case.id, &err),
    }
}

fn load_cases(path: &PathBuf) -> Result<Vec<CaseRecord>, String> {
    let data = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    let mut cases = Vec::new();
    for (line_no, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: CaseRecord = serde_json::from_str(line)
            .map_err(|e| format!("{}:{}: {e}", path.display(), line_no + 1))?;
        cases.push(record);
    }
    Ok(cases)
}
