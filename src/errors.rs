use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum AfflinkError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    Storage(String),
    NotFound(String),
    InvalidInput(String),
    InvalidSource(String),
    DuplicateLink(String),
    CodeSpaceExhausted(String),
    Serialization(String),
    DateParse(String),
}

impl AfflinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AfflinkError::DatabaseConfig(_) => "E001",
            AfflinkError::DatabaseConnection(_) => "E002",
            AfflinkError::Storage(_) => "E003",
            AfflinkError::NotFound(_) => "E004",
            AfflinkError::InvalidInput(_) => "E005",
            AfflinkError::InvalidSource(_) => "E006",
            AfflinkError::DuplicateLink(_) => "E007",
            AfflinkError::CodeSpaceExhausted(_) => "E008",
            AfflinkError::Serialization(_) => "E009",
            AfflinkError::DateParse(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AfflinkError::DatabaseConfig(_) => "Database Configuration Error",
            AfflinkError::DatabaseConnection(_) => "Database Connection Error",
            AfflinkError::Storage(_) => "Storage Error",
            AfflinkError::NotFound(_) => "Resource Not Found",
            AfflinkError::InvalidInput(_) => "Invalid Input",
            AfflinkError::InvalidSource(_) => "Invalid Source URL",
            AfflinkError::DuplicateLink(_) => "Duplicate Link",
            AfflinkError::CodeSpaceExhausted(_) => "Code Space Exhausted",
            AfflinkError::Serialization(_) => "Serialization Error",
            AfflinkError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AfflinkError::DatabaseConfig(msg)
            | AfflinkError::DatabaseConnection(msg)
            | AfflinkError::Storage(msg)
            | AfflinkError::NotFound(msg)
            | AfflinkError::InvalidInput(msg)
            | AfflinkError::InvalidSource(msg)
            | AfflinkError::DuplicateLink(msg)
            | AfflinkError::CodeSpaceExhausted(msg)
            | AfflinkError::Serialization(msg)
            | AfflinkError::DateParse(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码（API 层统一使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            AfflinkError::NotFound(_) => StatusCode::NOT_FOUND,
            AfflinkError::InvalidInput(_)
            | AfflinkError::InvalidSource(_)
            | AfflinkError::DateParse(_) => StatusCode::BAD_REQUEST,
            AfflinkError::DuplicateLink(_) => StatusCode::CONFLICT,
            AfflinkError::CodeSpaceExhausted(_)
            | AfflinkError::Storage(_)
            | AfflinkError::DatabaseConfig(_)
            | AfflinkError::DatabaseConnection(_)
            | AfflinkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 调用方是否值得带退避重试（只有存储类错误是暂时性的）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AfflinkError::Storage(_) | AfflinkError::DatabaseConnection(_)
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AfflinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AfflinkError {}

// 便捷的构造函数
impl AfflinkError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AfflinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AfflinkError::DatabaseConnection(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        AfflinkError::Storage(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AfflinkError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        AfflinkError::InvalidInput(msg.into())
    }

    pub fn invalid_source<T: Into<String>>(msg: T) -> Self {
        AfflinkError::InvalidSource(msg.into())
    }

    pub fn duplicate_link<T: Into<String>>(msg: T) -> Self {
        AfflinkError::DuplicateLink(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        AfflinkError::CodeSpaceExhausted(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AfflinkError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        AfflinkError::DateParse(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AfflinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        AfflinkError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for AfflinkError {
    fn from(err: std::io::Error) -> Self {
        AfflinkError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AfflinkError {
    fn from(err: serde_json::Error) -> Self {
        AfflinkError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AfflinkError {
    fn from(err: chrono::ParseError) -> Self {
        AfflinkError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AfflinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AfflinkError::not_found("x").code(), "E004");
        assert_eq!(AfflinkError::duplicate_link("x").code(), "E007");
        assert_eq!(AfflinkError::code_space_exhausted("x").code(), "E008");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            AfflinkError::not_found("gone").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AfflinkError::invalid_input("empty name").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AfflinkError::duplicate_link("pair exists").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AfflinkError::storage("db down").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_only_storage_errors_are_retryable() {
        assert!(AfflinkError::storage("timeout").is_retryable());
        assert!(AfflinkError::database_connection("lost").is_retryable());
        assert!(!AfflinkError::duplicate_link("pair").is_retryable());
        assert!(!AfflinkError::invalid_input("bad").is_retryable());
        assert!(!AfflinkError::not_found("gone").is_retryable());
    }

    #[test]
    fn test_display_format() {
        let err = AfflinkError::invalid_source("not a shopee URL");
        assert_eq!(err.to_string(), "Invalid Source URL: not a shopee URL");
    }
}
