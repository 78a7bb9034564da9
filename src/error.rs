use thiserror::Error;

/// Which token sequence a span error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RestoreError {
    /// Odd number of quotation markers in one of the token sequences.
    #[error("malformed quoted span in {side} sequence: {marker_count} quotation markers")]
    MalformedSpan { side: Side, marker_count: usize },
    /// Strict mode requires the same number of quoted spans on both sides.
    #[error("span counts differ between source and target: {source_count} vs {target_count}")]
    SpanCountMismatch {
        source_count: usize,
        target_count: usize,
    },
    /// No token of the source span attention-aligned into an unclaimed target span.
    #[error("no target span aligned for source span ({start}, {end})")]
    UnresolvedSpan { start: usize, end: usize },
    /// An internal index computation escaped the tokenized target even after
    /// clamping; the attention matrix and token sequences disagree upstream.
    #[error("corrupted alignment: {message}")]
    CorruptedAlignment { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl RestoreError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn corrupted(message: impl Into<String>) -> Self {
        Self::CorruptedAlignment {
            message: message.into(),
        }
    }

    /// Strict mode reports these through `Restoration::restored` instead of
    /// propagating; everything else is a structural failure.
    pub fn is_soft_alignment_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedSpan { .. } | Self::SpanCountMismatch { .. } | Self::UnresolvedSpan { .. }
        )
    }
}
