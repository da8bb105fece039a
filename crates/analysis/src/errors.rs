#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("unparseable timestamp {value:?} in {dataset} row {row}")]
    InvalidTimestamp {
        dataset: &'static str,
        row: usize,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
