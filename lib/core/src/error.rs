use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Record not found: {0}")]
    RecordNotFound(usize),

    #[error("Field '{0}' is not a column of the input")]
    UnknownField(String),

    #[error("Engine has not been trained")]
    NotTrained,

    #[error("Training needs at least one match and one distinct example (got {matches} match, {distinct} distinct)")]
    EmptyTraining { matches: usize, distinct: usize },

    #[error("Labeling oracle error: {0}")]
    Oracle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
