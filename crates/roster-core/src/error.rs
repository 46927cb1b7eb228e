use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("email is required")]
    EmptyEmail,
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),
    #[error("email or phone parameter required")]
    EmptyLookupQuery,
    #[error("invalid payment status: {0}")]
    InvalidPaymentStatus(String),
    #[error("invalid payment amount: {0}")]
    InvalidPaymentAmount(String),
}
