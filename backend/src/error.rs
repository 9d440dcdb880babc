//! Error handling for the Temperature Anomaly Detector
//!
//! Provides consistent error responses in English and Russian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::PipelineError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Pipeline errors
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_ru: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Dataset errors
    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ru: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Pipeline(PipelineError::InvalidInputFormat { .. }) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(PipelineError::InvalidParameter { .. }) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(PipelineError::MissingBounds { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Io(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Pipeline(PipelineError::InvalidInputFormat { message, .. }) => ErrorDetail {
                code: "INVALID_INPUT_FORMAT".to_string(),
                message_en: self.to_string(),
                message_ru: format!("Передан неверный формат данных: {}", message),
                field: None,
            },
            AppError::Pipeline(PipelineError::MissingBounds { city, season }) => ErrorDetail {
                code: "MISSING_BOUNDS".to_string(),
                message_en: format!(
                    "Not enough history to compute bounds for {} in {}",
                    city, season
                ),
                message_ru: format!(
                    "Недостаточно исторических данных для города {}, сезон {}",
                    city, season
                ),
                field: None,
            },
            AppError::Pipeline(PipelineError::InvalidParameter { name, reason }) => ErrorDetail {
                code: "INVALID_PARAMETER".to_string(),
                message_en: self.to_string(),
                message_ru: format!("Некорректный параметр {}: {}", name, reason),
                field: Some(name.clone()),
            },
            AppError::Validation {
                field,
                message,
                message_ru,
            } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message_en: message.clone(),
                message_ru: message_ru.clone(),
                field: Some(field.clone()),
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message_en: format!("{} not found", resource),
                message_ru: format!("{} не найден", resource),
                field: None,
            },
            AppError::Io(_) => ErrorDetail {
                code: "DATASET_IO_ERROR".to_string(),
                message_en: "The historical dataset could not be read".to_string(),
                message_ru: "Не удалось прочитать файл с историческими данными".to_string(),
                field: None,
            },
            AppError::Configuration(msg) => ErrorDetail {
                code: "CONFIGURATION_ERROR".to_string(),
                message_en: format!("Configuration error: {}", msg),
                message_ru: format!("Ошибка конфигурации: {}", msg),
                field: None,
            },
            AppError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message_en: msg.clone(),
                message_ru: "Внутренняя ошибка сервера".to_string(),
                field: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = self.detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
