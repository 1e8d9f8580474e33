//! Error types for the Google Photos provider

use thiserror::Error;

/// Google Photos provider errors
#[derive(Error, Debug)]
pub enum GooglePhotosError {
    /// Credential acquisition or refresh failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(#[from] core_auth::AuthError),

    /// API request returned an error status
    #[error("Google Photos API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response body
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// A response parsed but is missing a field the pipeline requires
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// Transport error
    #[error(transparent)]
    BridgeError(bridge_traits::error::BridgeError),
}

/// Result type for Google Photos operations
pub type Result<T> = std::result::Result<T, GooglePhotosError>;

impl From<GooglePhotosError> for bridge_traits::error::BridgeError {
    fn from(error: GooglePhotosError) -> Self {
        match error {
            GooglePhotosError::AuthenticationFailed(e) => {
                bridge_traits::error::BridgeError::AuthenticationFailed(e.to_string())
            }
            GooglePhotosError::ApiError {
                status_code,
                message,
            } => bridge_traits::error::BridgeError::OperationFailed(format!(
                "API error (status {}): {}",
                status_code, message
            )),
            GooglePhotosError::ParseError(msg) => {
                bridge_traits::error::BridgeError::MalformedResponse(msg)
            }
            GooglePhotosError::MalformedResponse(msg) => {
                bridge_traits::error::BridgeError::MalformedResponse(msg)
            }
            GooglePhotosError::BridgeError(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GooglePhotosError::ApiError {
            status_code: 404,
            message: "Album not found".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Google Photos API error (status 404): Album not found"
        );
    }

    #[test]
    fn test_malformed_response_maps_to_bridge_variant() {
        let error = GooglePhotosError::MalformedResponse(
            "batch-create result without media item".to_string(),
        );
        let bridge_error: bridge_traits::error::BridgeError = error.into();

        assert!(matches!(
            bridge_error,
            bridge_traits::error::BridgeError::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_auth_error_maps_to_authentication_failed() {
        let error = GooglePhotosError::AuthenticationFailed(
            core_auth::AuthError::TokenRefreshFailed("expired refresh token".to_string()),
        );
        let bridge_error: bridge_traits::error::BridgeError = error.into();

        assert!(matches!(
            bridge_error,
            bridge_traits::error::BridgeError::AuthenticationFailed(_)
        ));
    }
}
