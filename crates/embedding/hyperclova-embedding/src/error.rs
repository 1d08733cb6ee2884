use thiserror::Error;

/// Errors raised by the HyperCLOVA X embedding client.
#[derive(Error, Debug)]
pub enum HyperClovaError {
    /// Missing credential or unrecognized model. Raised at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input was neither a string nor an object with a string `text` member.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider answered with a status code other than the success code.
    #[error("HyperCLOVA X embedding API error ({}): {body}", .code.as_deref().unwrap_or("no status code"))]
    Provider { code: Option<String>, body: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not JSON, or a success response lacked `result.embedding`.
    #[error("Malformed embedding response: {source}; body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, HyperClovaError>;
