//! Error types for the wordle-rl crate

use thiserror::Error;

/// Main error type for the wordle-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("'{word}' is not a valid {expected}-letter word")]
    InvalidWord { word: String, expected: usize },

    #[error("secret '{word}' is not in the answer list")]
    InvalidSecret { word: String },

    #[error("guess '{word}' is not in the allowed-word list")]
    InvalidGuess { word: String },

    #[error("no active episode: call reset() before step()")]
    NoActiveEpisode,

    #[error("episode already terminated")]
    EpisodeTerminated,

    #[error("no candidate words remain consistent with accumulated feedback")]
    NoCandidates,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid hyperparameter {name}={value} (expected {expected})")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("{partition} partition of the answer list is empty")]
    EmptyPartition { partition: &'static str },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
