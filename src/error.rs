use thiserror::Error;
use warp::http::StatusCode;

#[derive(Debug, Error)]
pub enum AuthError {
    // Key errors
    #[error("Signing keys unavailable: {0}")]
    KeysUnavailable(String),
    #[error("{0} key not loaded")]
    KeysNotLoaded(&'static str),
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    // Token errors
    #[error("Token signing unavailable: {0}")]
    SigningUnavailable(String),
    #[error("No token provided")]
    MissingToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Malformed token: {0}")]
    TokenMalformed(String),
    #[error("Invalid token signature")]
    SignatureInvalid,

    // Authorization errors
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Requires one of: {}", .required.join(", "))]
    InsufficientRole { required: Vec<String> },
    #[error("Missing permission: {resource}:{action}")]
    MissingPermission { resource: String, action: String },

    // Collaborator errors
    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    // Account flow errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Email already exists")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP status the request pipeline renders for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingToken
            | Self::TokenExpired
            | Self::TokenMalformed(_)
            | Self::SignatureInvalid
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotAuthenticated
            | Self::InsufficientRole { .. }
            | Self::MissingPermission { .. } => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::KeysUnavailable(_)
            | Self::KeysNotLoaded(_)
            | Self::KeyGeneration(_)
            | Self::SigningUnavailable(_)
            | Self::DirectoryUnavailable(_)
            | Self::Hashing(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for the `error` field of a response body.
    pub fn label(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::BAD_REQUEST => "Validation Error",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::CONFLICT => "Conflict",
            _ => "Internal Server Error",
        }
    }

    /// Message safe to show to a client. Internal failures never leak details.
    pub fn public_message(&self) -> String {
        match self {
            Self::TokenMalformed(_) => "Malformed token".to_string(),
            Self::DirectoryUnavailable(_) => "User directory unavailable".to_string(),
            Self::KeysUnavailable(_)
            | Self::KeysNotLoaded(_)
            | Self::KeyGeneration(_)
            | Self::SigningUnavailable(_)
            | Self::Hashing(_)
            | Self::Config(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            // Anything but RS256 in the header is treated as a forged signature
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidKeyFormat => AuthError::SignatureInvalid,
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::TokenMalformed(format!("missing required claim '{}'", claim))
            }
            _ => AuthError::TokenMalformed(err.to_string()),
        }
    }
}

impl warp::reject::Reject for AuthError {}

pub type Result<T> = std::result::Result<T, AuthError>;
