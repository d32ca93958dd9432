use crypto_core::{PasswordError, TokenError};
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown username or wrong password; the two causes are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Laptop already exists: {0}")]
    LaptopAlreadyExists(String),

    #[error("Laptop not found: {0}")]
    LaptopNotFound(String),

    #[error("Image too large: {size} bytes exceeds {max}")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            ServiceError::InvalidCredentials => {
                Status::new(Code::Unauthenticated, "incorrect username/password")
            }
            ServiceError::UsernameAlreadyExists(_) => {
                Status::new(Code::AlreadyExists, "Username already exists")
            }
            ServiceError::LaptopAlreadyExists(id) => Status::new(
                Code::AlreadyExists,
                format!("laptop with id {} already exists", id),
            ),
            ServiceError::LaptopNotFound(id) => {
                Status::new(Code::NotFound, format!("laptop {} is not found", id))
            }
            ServiceError::ImageTooLarge { size, max } => Status::new(
                Code::InvalidArgument,
                format!("image is too large: {} > {}", size, max),
            ),
            ServiceError::InvalidArgument(msg) => Status::new(Code::InvalidArgument, msg.clone()),
            ServiceError::Signing(_) | ServiceError::PasswordHash(_) | ServiceError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "Internal server error")
            }
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        tracing::error!(error = %err, "Token signing error");
        ServiceError::Signing(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "Password hash error");
        ServiceError::PasswordHash(err.to_string())
    }
}

// gRPC Status conversion
impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        err.to_status()
    }
}
