use thiserror::Error;

/// Closed set of outcome tags a boundary layer maps onto transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidFormat,
    InvalidSuffix,
    LimitExceeded,
    DuplicateCardNumber,
    InvalidIdentity,
    TransportFailure,
    NotFound,
    Validation,
    Internal,
}

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Card number must have 16 digits, got {digits}")]
    InvalidFormat { digits: usize },

    #[error("Card number must end with '{required}'")]
    InvalidSuffix { required: String },

    #[error("Customer {customer_id} already holds the maximum of {max} cards")]
    LimitExceeded { customer_id: String, max: usize },

    #[error("Card number {card_number} is already registered")]
    DuplicateCardNumber { card_number: String },

    #[error("Identity service rejected customer {customer_id}")]
    InvalidIdentity { customer_id: String },

    #[error("Identity service unreachable: {message}")]
    TransportFailure { message: String },

    #[error("Card not found: {target}")]
    NotFound { target: String },

    #[error("Invalid field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Card store error: {message}")]
    Store { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

impl CardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CardError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            CardError::InvalidSuffix { .. } => ErrorKind::InvalidSuffix,
            CardError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            CardError::DuplicateCardNumber { .. } => ErrorKind::DuplicateCardNumber,
            CardError::InvalidIdentity { .. } => ErrorKind::InvalidIdentity,
            CardError::TransportFailure { .. } => ErrorKind::TransportFailure,
            CardError::NotFound { .. } => ErrorKind::NotFound,
            CardError::Validation { .. } => ErrorKind::Validation,
            CardError::Store { .. }
            | CardError::IoError(_)
            | CardError::SerializationError(_)
            | CardError::ConfigError { .. }
            | CardError::InvalidConfigValueError { .. }
            | CardError::MissingConfigError { .. } => ErrorKind::Internal,
        }
    }

    /// True for rejections caused by the application itself, as opposed to
    /// faults in the service or its collaborators.
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidFormat
                | ErrorKind::InvalidSuffix
                | ErrorKind::LimitExceeded
                | ErrorKind::DuplicateCardNumber
                | ErrorKind::InvalidIdentity
                | ErrorKind::Validation
        )
    }

    /// HTTP status for the issue endpoint. Only the card limit gets its own
    /// status; every other business rejection is reported as 500, matching
    /// the deployed service's contract.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::LimitExceeded => 403,
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            _ => 500,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::TransportFailure => 3,
            ErrorKind::Internal => 4,
            ErrorKind::NotFound => 5,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_exceeded_maps_to_forbidden() {
        let err = CardError::LimitExceeded {
            customer_id: "11111111111".to_string(),
            max: 2,
        };
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
        assert_eq!(err.status_code(), 403);
        assert!(err.is_business_rejection());
    }

    #[test]
    fn test_other_business_rejections_map_to_server_error() {
        let errors = [
            CardError::InvalidFormat { digits: 4 },
            CardError::InvalidSuffix {
                required: "1234".to_string(),
            },
            CardError::DuplicateCardNumber {
                card_number: "5200 1211 1435 1234".to_string(),
            },
            CardError::InvalidIdentity {
                customer_id: "11111111111".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.status_code(), 500, "{err}");
            assert!(err.is_business_rejection());
        }
    }

    #[test]
    fn test_transport_failure_is_not_a_rejection() {
        let err = CardError::TransportFailure {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(!err.is_business_rejection());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.exit_code(), 3);
    }
}
