//! Error types for coefficient-domain embedding and extraction.
//!
//! [`OutguessError`] is what the buffer-level functions return. The file-level
//! API flattens it into an [`ErrorCode`] plus a message on the result records.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for outguess operations.
pub type Result<T> = std::result::Result<T, OutguessError>;

/// Errors that can occur while hiding or unveiling a payload.
#[derive(Error)]
pub enum OutguessError {
    /// A caller-supplied argument is out of range or empty.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The carrier file could not be opened.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The carrier file exists but does not hold a coefficient buffer.
    #[error("invalid carrier format: {reason}")]
    InvalidFormat { reason: String },

    /// The payload is larger than the estimated capacity. Raised before any coefficient is touched.
    #[error("message too large: {required} bytes requested but capacity is {available} bytes")]
    MessageTooLarge { required: usize, available: usize },

    /// The embedding sequence ran out before the framed payload was fully written.
    #[error("insufficient coefficients: wrote {written_bits} of {required_bits} bits")]
    InsufficientCoefficients {
        written_bits: usize,
        required_bits: usize,
    },

    /// Re-extracting the freshly written frame did not reproduce it.
    #[error("embedding verification failed at byte {offset}")]
    VerificationFailed { offset: usize },

    /// Writing the modified carrier failed.
    #[error("failed to encode output carrier")]
    EncodeFailed(#[source] std::io::Error),

    /// The sequence ran out before the requested number of bytes was read.
    #[error("short read: expected {expected} bytes but only {available} could be extracted")]
    ShortRead { expected: usize, available: usize },

    /// The frame header declares an implausible payload length.
    #[error("invalid message length {length} (maximum is {max})")]
    DeclaredLengthTooLarge { length: usize, max: usize },

    /// The CRC32 stored in the frame header does not match the payload.
    #[error("message integrity check failed: stored crc {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// Anything that escaped the regular error paths, e.g. a caught panic.
    #[error("internal failure: {0}")]
    Internal(String),

    /// I/O error while reading or writing a carrier.
    #[error("carrier I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl fmt::Debug for OutguessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")
    }
}

impl OutguessError {
    /// The public error code this error is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::FileNotFound { .. } => ErrorCode::FileNotFound,
            Self::InvalidFormat { .. } | Self::Io(_) => ErrorCode::InvalidFormat,
            Self::MessageTooLarge { .. } => ErrorCode::MessageTooLarge,
            Self::InsufficientCoefficients { .. }
            | Self::VerificationFailed { .. }
            | Self::EncodeFailed(_) => ErrorCode::EmbeddingFailed,
            Self::ShortRead { .. }
            | Self::DeclaredLengthTooLarge { .. }
            | Self::ChecksumMismatch { .. } => ErrorCode::ExtractionFailed,
            Self::Internal(_) => ErrorCode::AllocationFailure,
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }
}

/// Error codes reported on the result records.
///
/// The numeric values are stable and match what bindings expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    #[default]
    Success,
    InvalidInput,
    FileNotFound,
    InvalidFormat,
    MessageTooLarge,
    EmbeddingFailed,
    ExtractionFailed,
    AllocationFailure,
    /// Reserved: the keyed stream transform cannot fail, so nothing reports this today.
    CryptoFailure,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidInput => -1,
            Self::FileNotFound => -2,
            Self::InvalidFormat => -3,
            Self::MessageTooLarge => -4,
            Self::EmbeddingFailed => -5,
            Self::ExtractionFailed => -6,
            Self::AllocationFailure => -7,
            Self::CryptoFailure => -8,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InvalidInput => "Invalid input",
            Self::FileNotFound => "File not found",
            Self::InvalidFormat => "Invalid image format",
            Self::MessageTooLarge => "Message too large",
            Self::EmbeddingFailed => "Embedding failed",
            Self::ExtractionFailed => "Extraction failed",
            Self::AllocationFailure => "Memory allocation failed",
            Self::CryptoFailure => "Cryptographic operation failed",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Success,
            -1 => Self::InvalidInput,
            -2 => Self::FileNotFound,
            -3 => Self::InvalidFormat,
            -4 => Self::MessageTooLarge,
            -5 => Self::EmbeddingFailed,
            -6 => Self::ExtractionFailed,
            -7 => Self::AllocationFailure,
            -8 => Self::CryptoFailure,
            other => return Err(other),
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
