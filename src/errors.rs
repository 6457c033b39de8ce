//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tracker_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AbsenceTrackerError {
            $($variant(String),)*
        }

        impl AbsenceTrackerError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AbsenceTrackerError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AbsenceTrackerError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AbsenceTrackerError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AbsenceTrackerError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AbsenceTrackerError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tracker_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    DateParse("E005", "Date Parse Error"),
    Authentication("E006", "Authentication Error"),
    Authorization("E007", "Authorization Error"),
    Conflict("E008", "Concurrency Conflict"),
}

impl AbsenceTrackerError {
    /// 格式化为简洁输出，带错误代码
    pub fn format_simple(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }
}

impl fmt::Display for AbsenceTrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AbsenceTrackerError {}

pub type Result<T> = std::result::Result<T, AbsenceTrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AbsenceTrackerError::database_config("test").code(), "E001");
        assert_eq!(AbsenceTrackerError::validation("test").code(), "E004");
        assert_eq!(AbsenceTrackerError::authentication("test").code(), "E006");
        assert_eq!(AbsenceTrackerError::conflict("test").code(), "E008");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AbsenceTrackerError::conflict("test").error_type(),
            "Concurrency Conflict"
        );
        assert_eq!(
            AbsenceTrackerError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AbsenceTrackerError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = AbsenceTrackerError::validation("Invalid session");
        let formatted = err.format_simple();
        assert!(formatted.starts_with("[E004] Validation Error"));
        assert!(formatted.contains("Invalid session"));
    }
}
