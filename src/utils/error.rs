use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    #[error("Insufficient data: fewer than 2 regular grades for {subject} in semester {semester}")]
    InsufficientData { subject: String, semester: u8 },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl GradeError {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        GradeError::InvalidPayload {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        GradeError::NotFound {
            message: message.into(),
        }
    }

    /// HTTP 狀態碼 (400 驗證錯誤 / 404 找不到 / 500 其他)
    pub fn status_code(&self) -> u16 {
        match self {
            GradeError::InvalidPayload { .. } | GradeError::InsufficientData { .. } => 400,
            GradeError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// 回傳給客戶端 `{error}` 欄位的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            GradeError::InvalidPayload { message } | GradeError::NotFound { message } => {
                message.clone()
            }
            GradeError::InsufficientData { .. } => {
                "need at least 2 regular grades for this subject and semester".to_string()
            }
            GradeError::IoError(_) | GradeError::SerializationError(_) => {
                "failed to persist grades".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

pub type Result<T> = std::result::Result<T, GradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GradeError::invalid_payload("invalid grade").status_code(), 400);
        assert_eq!(
            GradeError::InsufficientData {
                subject: "Math".to_string(),
                semester: 1
            }
            .status_code(),
            400
        );
        assert_eq!(GradeError::not_found("missing").status_code(), 404);
        let io = GradeError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.status_code(), 500);
        assert!(!io.is_client_error());
    }

    #[test]
    fn test_user_friendly_message() {
        assert_eq!(
            GradeError::invalid_payload("subject required").user_friendly_message(),
            "subject required"
        );
        assert_eq!(
            GradeError::InsufficientData {
                subject: "Math".to_string(),
                semester: 2
            }
            .user_friendly_message(),
            "need at least 2 regular grades for this subject and semester"
        );
    }
}
