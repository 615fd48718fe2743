use crate::core::position::Position;

/// Structured errors returned by board decoding, expansion and the search tasks.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    /// A raw cell code outside the piece set reached decoding. This is a programming error.
    #[error("unknown piece code {code}")]
    UnknownPiece { code: u8 },
    /// A symbol outside the compact text alphabet.
    #[error("unknown piece symbol {symbol:?}")]
    UnknownSymbol { symbol: char },
    /// A stored state places a piece beyond its own board size.
    #[error("piece at {position} lies outside a {size}x{size} board")]
    OffBoard { position: Position, size: u8 },
    /// Configuration rejected before the search starts.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
    /// The group was cancelled before `task` produced its result.
    #[error("{task} was cancelled")]
    Cancelled { task: &'static str },
    /// A queue disconnected while a task still needed it.
    #[error("{queue} queue closed unexpectedly")]
    QueueClosed { queue: &'static str },
    /// Reading a config file or writing a summary failed.
    #[error("io error at {stage} for {path}: {source}")]
    Io {
        stage: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A config or summary could not be decoded or encoded as JSON.
    #[error("json error at {stage}: {source}")]
    Json {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
