//! 错误类型定义
//!
//! 定义了语句解析和批量执行过程中可能出现的所有错误类型。

use std::path::PathBuf;
use thiserror::Error;

/// 解析错误类型
///
/// 语句解析器唯一会以错误形式上报的情况：缓冲区在语句累积期间耗尽。
/// 注释、空行以及格式错误的 `SET` 指令都不会产生 `ParseError`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// 语句在缓冲区结束前没有遇到 `;` 结尾的行
    #[error("incomplete statement starting at line {start_line}: '{partial}'")]
    IncompleteStatement {
        /// 语句起始行号（从 1 开始）
        start_line: usize,
        /// 已经累积的部分文本
        partial: String,
    },
}

/// 运行错误类型
///
/// 包含了配置加载、文件读取以及远程引擎执行过程中可能遇到的所有错误情况。
/// 除 `Parse` 之外，任何一个错误都会中止整个批量运行。
#[derive(Debug, Error)]
pub enum RunnerError {
    /// 文件或目录无法读取
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// 出错的路径
        path: PathBuf,
        /// 底层 I/O 错误
        #[source]
        source: std::io::Error,
    },

    /// 配置文件加载或反序列化失败
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// 配置内容语义不合法
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP 请求失败（连接、超时等）
    #[error("request to ksqlDB failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 引擎拒绝了语句
    #[error("ksqlDB rejected statement (status {status}): {message}\n\n{statement}\n")]
    Engine {
        /// 被拒绝的语句文本
        statement: String,
        /// HTTP 状态码
        status: u16,
        /// 引擎返回的错误消息
        message: String,
    },

    /// 引擎响应无法解码
    #[error("failed to decode ksqlDB response: {0}")]
    Decode(String),

    /// 语句解析失败
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl RunnerError {
    /// 构造带路径的 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
