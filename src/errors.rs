use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortkeyError {
    StoreOpen(String),
    StoreOperation(String),
    WriterTimeout(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    Config(String),
}

impl ShortkeyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortkeyError::StoreOpen(_) => "E001",
            ShortkeyError::StoreOperation(_) => "E002",
            ShortkeyError::WriterTimeout(_) => "E003",
            ShortkeyError::FileOperation(_) => "E004",
            ShortkeyError::Validation(_) => "E005",
            ShortkeyError::NotFound(_) => "E006",
            ShortkeyError::Serialization(_) => "E007",
            ShortkeyError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortkeyError::StoreOpen(_) => "Store Open Error",
            ShortkeyError::StoreOperation(_) => "Store Operation Error",
            ShortkeyError::WriterTimeout(_) => "Writer Timeout",
            ShortkeyError::FileOperation(_) => "File Operation Error",
            ShortkeyError::Validation(_) => "Validation Error",
            ShortkeyError::NotFound(_) => "Resource Not Found",
            ShortkeyError::Serialization(_) => "Serialization Error",
            ShortkeyError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortkeyError::StoreOpen(msg) => msg,
            ShortkeyError::StoreOperation(msg) => msg,
            ShortkeyError::WriterTimeout(msg) => msg,
            ShortkeyError::FileOperation(msg) => msg,
            ShortkeyError::Validation(msg) => msg,
            ShortkeyError::NotFound(msg) => msg,
            ShortkeyError::Serialization(msg) => msg,
            ShortkeyError::Config(msg) => msg,
        }
    }

    /// Whether the failure is the server's fault (store, file system) rather
    /// than the caller's input.
    pub fn is_server_fault(&self) -> bool {
        !matches!(
            self,
            ShortkeyError::Validation(_) | ShortkeyError::NotFound(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortkeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortkeyError {}

// 便捷的构造函数
impl ShortkeyError {
    pub fn store_open<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::StoreOpen(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::StoreOperation(msg.into())
    }

    pub fn writer_timeout<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::WriterTimeout(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Config(msg.into())
    }
}

// redb 的错误类型按阶段区分，这里统一归到存储错误
impl From<redb::DatabaseError> for ShortkeyError {
    fn from(err: redb::DatabaseError) -> Self {
        ShortkeyError::StoreOpen(err.to_string())
    }
}

impl From<redb::TransactionError> for ShortkeyError {
    fn from(err: redb::TransactionError) -> Self {
        ShortkeyError::StoreOperation(err.to_string())
    }
}

impl From<redb::TableError> for ShortkeyError {
    fn from(err: redb::TableError) -> Self {
        ShortkeyError::StoreOperation(err.to_string())
    }
}

impl From<redb::StorageError> for ShortkeyError {
    fn from(err: redb::StorageError) -> Self {
        ShortkeyError::StoreOperation(err.to_string())
    }
}

impl From<redb::CommitError> for ShortkeyError {
    fn from(err: redb::CommitError) -> Self {
        ShortkeyError::StoreOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShortkeyError {
    fn from(err: std::io::Error) -> Self {
        ShortkeyError::FileOperation(err.to_string())
    }
}

impl From<csv::Error> for ShortkeyError {
    fn from(err: csv::Error) -> Self {
        ShortkeyError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ShortkeyError {
    fn from(err: toml::ser::Error) -> Self {
        ShortkeyError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortkeyError>;
