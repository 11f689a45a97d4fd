use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("database credentials not provided")]
    CredentialsMissing,

    #[error("cannot connect to database: {0}")]
    ConnectionFailed(String),

    #[error("external database connection not provided")]
    ExternalConnectionMissing,

    #[error("invalid character set name: {0:?}")]
    InvalidEncoding(String),

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for RegistryError {
    fn from(e: figment::Error) -> Self {
        RegistryError::Config(Box::new(e))
    }
}

impl RegistryError {
    /// Errors raised before any I/O was attempted.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RegistryError::CredentialsMissing
                | RegistryError::ExternalConnectionMissing
                | RegistryError::InvalidEncoding(_)
        )
    }
}
