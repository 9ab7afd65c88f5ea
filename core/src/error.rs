use thiserror::Error;

/// Feil som kan boble opp fra kjernen.
///
/// Datafeil (manglende felt, tomme serier, deling på null) blir aldri en
/// `CoreError` – de degraderes til `None`/tomme resultater. Denne typen
/// dekker I/O, parsing av hele dokumenter og ugyldig konfigurasjon.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON-feil med sti til feltet som feilet (serde_path_to_error).
    #[error("json at {path}: {message}")]
    JsonPath { path: String, message: String },

    #[error("http: {0}")]
    Http(String),

    #[error("metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for CoreError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        CoreError::JsonPath {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
