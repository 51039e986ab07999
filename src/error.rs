use thiserror::Error;

/// Errors raised while turning game records into dataset rows.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal move '{san}' at ply {ply} in position {fen}")]
    IllegalMove { san: String, ply: usize, fen: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = DatasetError> = std::result::Result<T, E>;
