//! 统一错误处理模块
//!
//! 错误类型由宏生成，每个变体带有稳定的错误代码和类型名称。

use std::fmt;

/// 定义门户错误类型的宏
///
/// 为每个变体生成 `code()` / `error_type()` / `message()`，
/// 以及 snake_case 形式的构造函数（如 `PortalError::not_found("...")`）。
macro_rules! define_portal_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum PortalError {
            $($variant(String),)*
        }

        impl PortalError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(PortalError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PortalError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(PortalError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl PortalError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PortalError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_portal_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Io("E006", "IO Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl PortalError {
    /// 开发环境下的彩色输出
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为数据库唯一约束冲突
    pub fn is_unique_violation(&self) -> bool {
        match self {
            PortalError::Conflict(_) => true,
            PortalError::DatabaseOperation(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("unique") || msg.contains("duplicate")
            }
            _ => false,
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PortalError {}

impl From<sea_orm::DbErr> for PortalError {
    fn from(err: sea_orm::DbErr) -> Self {
        PortalError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        PortalError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PortalError {
    fn from(err: chrono::ParseError) -> Self {
        PortalError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PortalError::cache_connection("test").code(), "E001");
        assert_eq!(PortalError::database_operation("test").code(), "E005");
        assert_eq!(PortalError::validation("test").code(), "E007");
        assert_eq!(PortalError::conflict("test").code(), "E010");
        assert_eq!(PortalError::authorization("test").code(), "E013");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(PortalError::not_found("x").error_type(), "Resource Not Found");
        assert_eq!(PortalError::io("x").error_type(), "IO Error");
    }

    #[test]
    fn test_format_simple() {
        let err = PortalError::validation("Title must not be empty");
        assert_eq!(
            err.format_simple(),
            "Validation Error: Title must not be empty"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(PortalError::conflict("dup").is_unique_violation());
        assert!(
            PortalError::database_operation("UNIQUE constraint failed: users.email")
                .is_unique_violation()
        );
        assert!(
            PortalError::database_operation("Duplicate entry 'a@b.c' for key 'email'")
                .is_unique_violation()
        );
        assert!(!PortalError::database_operation("connection reset").is_unique_violation());
        assert!(!PortalError::validation("unique").is_unique_violation());
    }

    #[test]
    fn test_from_serde_error() {
        let err: PortalError = serde_json::from_str::<i32>("nope").unwrap_err().into();
        assert_eq!(err.code(), "E009");
    }
}
