use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtyCalcError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for RealtyCalcError {
    fn from(e: serde_json::Error) -> Self {
        RealtyCalcError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for RealtyCalcError {
    fn from(e: std::io::Error) -> Self {
        RealtyCalcError::Storage(e.to_string())
    }
}
