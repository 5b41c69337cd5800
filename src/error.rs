use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinancingError>;

#[derive(Debug, Error, PartialEq)]
pub enum FinancingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown payment frequency '{0}'")]
    UnknownFrequency(String),

    #[error("Due date out of range for installment {installment}")]
    DateOutOfRange { installment: u32 },
}

impl FinancingError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FinancingError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
