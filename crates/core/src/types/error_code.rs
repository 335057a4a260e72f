//! Error taxonomy for API responses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable error codes carried in error envelopes.
///
/// The taxonomy is a closed enumeration: handlers map every failure to one
/// of these codes, and clients can branch on them without parsing messages.
/// Wire form is `SCREAMING_SNAKE_CASE`.
///
/// ## Examples
///
/// ```
/// use hemera_core::ErrorCode;
///
/// assert_eq!(ErrorCode::NotFound.default_status(), 404);
/// assert_eq!(
///     serde_json::to_string(&ErrorCode::CourseFull).unwrap(),
///     "\"COURSE_FULL\""
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & authorization
    Unauthorized,
    Forbidden,
    InvalidToken,

    // Validation
    ValidationError,
    InvalidInput,
    MissingField,

    // Resource state
    NotFound,
    AlreadyExists,
    Conflict,

    // Server side
    InternalError,
    DatabaseError,
    ExternalServiceError,

    // Rate limiting
    RateLimited,
    TooManyRequests,

    // Business logic
    InsufficientFunds,
    CourseFull,
    BookingFailed,
    PaymentFailed,
}

impl ErrorCode {
    /// The wire-format name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::MissingField => "MISSING_FIELD",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            Self::RateLimited => "RATE_LIMITED",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::CourseFull => "COURSE_FULL",
            Self::BookingFailed => "BOOKING_FAILED",
            Self::PaymentFailed => "PAYMENT_FAILED",
        }
    }

    /// The HTTP status this code maps to when a handler does not override it.
    ///
    /// Returned as a plain `u16` so this crate stays free of HTTP framework
    /// types.
    #[must_use]
    pub const fn default_status(self) -> u16 {
        match self {
            Self::Unauthorized | Self::InvalidToken => 401,
            Self::InsufficientFunds | Self::PaymentFailed => 402,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::AlreadyExists | Self::Conflict | Self::CourseFull => 409,
            Self::ValidationError => 422,
            Self::InvalidInput | Self::MissingField | Self::BookingFailed => 400,
            Self::RateLimited | Self::TooManyRequests => 429,
            Self::InternalError => 500,
            Self::ExternalServiceError => 502,
            Self::DatabaseError => 503,
        }
    }

    /// True for codes representing server-side faults (5xx).
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.default_status() >= 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
