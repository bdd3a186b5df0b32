use thiserror::Error;

/// Minimum number of distinct UTC calendar days in an uploaded load history
pub const MIN_HISTORY_DAYS: usize = 8;

/// Failures of the reconciliation pipeline. Every variant aborts the run;
/// no partial report is produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("insufficient historical data: {found_days} distinct days, at least {min} are required", min = MIN_HISTORY_DAYS)]
    InsufficientHistory { found_days: usize },

    #[error("malformed {source_name} payload: {reason}")]
    MalformedPayload {
        source_name: &'static str,
        reason: String,
    },

    #[error("flex pricing enabled but no total_price for interval at {timestamp}")]
    MissingDynamicPrice { timestamp: String },
}

impl PipelineError {
    pub(crate) fn malformed(source_name: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::MalformedPayload {
            source_name,
            reason: reason.into(),
        }
    }
}
