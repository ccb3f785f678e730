use thiserror::Error;

/// Failures of a parse as a whole.
///
/// Individual lines never fail: unmatched lines are skipped and unusable line
/// numbers fall back to the sentinel. Only the input source can fail.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read log: {0}")]
    Input(#[from] std::io::Error),
}
