use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooManyRecipients { max: usize, actual: usize },
    InvalidPhoneNumber { input: String },
    InvalidUrl { field: &'static str, input: String },
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        actual: u32,
    },
    ZeroInterval { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidUrl { field, input } => write!(f, "{field} is not a valid URL: {input}"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(f, "{field} out of range: {actual} (expected {min}..={max})")
            }
            Self::ZeroInterval { field } => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty {
            field: "senderAddress",
        };
        assert_eq!(err.to_string(), "senderAddress must not be empty");

        let err = ValidationError::TooManyRecipients { max: 2, actual: 3 };
        assert_eq!(err.to_string(), "too many recipients: 3 (max 2)");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::InvalidUrl {
            field: "notifyURL",
            input: "nope".to_owned(),
        };
        assert_eq!(err.to_string(), "notifyURL is not a valid URL: nope");

        let err = ValidationError::OutOfRange {
            field: "pageSize",
            min: 1,
            max: 100,
            actual: 101,
        };
        assert_eq!(
            err.to_string(),
            "pageSize out of range: 101 (expected 1..=100)"
        );

        let err = ValidationError::ZeroInterval {
            field: "dlrRetrievingInterval",
        };
        assert_eq!(
            err.to_string(),
            "dlrRetrievingInterval must be greater than zero"
        );
    }
}
