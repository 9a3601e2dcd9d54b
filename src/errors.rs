//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 审核流程中的预期结果（校验失败、不存在、并发冲突）同样以错误变体返回，
//! 调用方按变体分支处理；只有持久化失败属于真正的异常。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradebookError {
            $($variant(String),)*
        }

        impl GradebookError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradebookError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Conflict("E006", "Conflict Error"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
}

impl GradebookError {
    /// 是否为调用方应当自行处理的预期结果（而非系统故障）
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            GradebookError::Validation(_) | GradebookError::NotFound(_) | GradebookError::Conflict(_)
        )
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradebookError {
    fn from(err: sea_orm::DbErr) -> Self {
        GradebookError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GradebookError {
    fn from(err: chrono::ParseError) -> Self {
        GradebookError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;
