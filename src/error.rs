//! Error types for the Perpus client

use thiserror::Error;
use validator::ValidationErrors;

/// Shown for any failure to reach the API
pub const NETWORK_ERROR_MESSAGE: &str =
    "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.";

/// Shown by the top-level boundary when a command crashes
pub const FATAL_ERROR_MESSAGE: &str = "Terjadi kesalahan, silakan muat ulang aplikasi.";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-side validation failure; never sent to the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request rejected by the server with a structured message
    #[error("Server rejected request: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Operation not allowed for the current role
    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A submission from the same form is already in flight
    #[error("A request is already in progress")]
    Busy,

    #[error("Request cancelled")]
    Cancelled,
}

impl AppError {
    /// Text to show to the user for this error
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Authorization(msg) => msg.clone(),
            AppError::Server { message, .. } => message.clone(),
            AppError::Network(e) => {
                tracing::warn!("Network error: {}", e);
                NETWORK_ERROR_MESSAGE.to_string()
            }
            AppError::Busy => "Permintaan sedang diproses, mohon tunggu.".to_string(),
            AppError::Cancelled => "Permintaan dibatalkan.".to_string(),
            AppError::Storage(_) | AppError::Serialization(_) | AppError::Config(_) => {
                tracing::error!("Internal error: {}", self);
                FATAL_ERROR_MESSAGE.to_string()
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} tidak valid", field))
                })
            })
            .collect();

        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_verbatim() {
        let err = AppError::Server {
            status: 409,
            message: "Email sudah terdaftar".to_string(),
        };
        assert_eq!(err.user_message(), "Email sudah terdaftar");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = AppError::Validation("Password minimal 6 karakter".to_string());
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Password minimal 6 karakter");
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err = AppError::Storage("disk full".to_string());
        assert_eq!(err.user_message(), FATAL_ERROR_MESSAGE);
    }
}
