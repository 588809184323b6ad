//! Error types for the codec.
//!
//! Callers can tell a damaged container ([`HuffmanError::Format`]) apart from a
//! failing source or sink ([`HuffmanError::Io`]) and from resource exhaustion
//! ([`HuffmanError::AllocationFailure`]).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Node arena or a working buffer could not be reserved.
    #[error("allocation failed: requested {requested} slots")]
    AllocationFailure { requested: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed input is not a valid container.
    #[error("invalid container: {0}")]
    Format(#[from] FormatError),

    /// Symbol frequencies so skewed that a code would exceed 64 bits.
    #[error("code for byte {byte} is longer than 64 bits")]
    CodeTooLong { byte: u8 },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Ways a container can be malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("truncated header: {0}")]
    TruncatedHeader(&'static str),

    #[error("malformed varint at frequency slot {slot}")]
    MalformedVarint { slot: usize },

    #[error("frequency table sums to {actual}, header declares {declared}")]
    FrequencyMismatch { declared: u64, actual: u64 },

    #[error("frequency table sum overflows u64")]
    FrequencyOverflow,

    #[error("payload ended after {decoded} of {declared} symbols")]
    TruncatedPayload { declared: u64, decoded: u64 },

    #[error("bit pattern reached a placeholder leaf")]
    UnreachableLeaf,
}

impl HuffmanError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn allocation(requested: usize) -> Self {
        Self::AllocationFailure { requested }
    }

    /// True when the error is caused by the input bytes rather than the
    /// environment.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_are_distinguishable_from_io() {
        let format: HuffmanError = FormatError::UnreachableLeaf.into();
        let io: HuffmanError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(format.is_format());
        assert!(!io.is_format());
        assert!(!HuffmanError::allocation(512).is_format());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = HuffmanError::from(FormatError::FrequencyMismatch {
            declared: 10,
            actual: 9,
        });
        assert_eq!(
            err.to_string(),
            "invalid container: frequency table sums to 9, header declares 10"
        );
    }
}
