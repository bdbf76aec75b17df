//! 语句执行器
//!
//! 批量运行器把每条解析出的语句连同属性快照交给 `StatementExecutor`。
//! 执行器必须按顺序执行，任何错误都会中止整个运行。

use crate::error::RunnerError;
use crate::statement::{PropertyMap, Statement};
use log::info;
use serde::Deserialize;
use std::fmt;

/// 远程引擎中一个流的描述
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub name: String,
    pub topic: String,
    #[serde(default)]
    pub key_format: String,
    #[serde(default)]
    pub value_format: String,
    #[serde(default)]
    pub is_windowed: bool,
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.name, self.topic, self.key_format, self.value_format, self.is_windowed
        )
    }
}

/// 单条语句的执行结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    /// 持久查询的 ID（`CREATE ... AS SELECT` 等语句）
    pub query_id: Option<String>,
    /// 命令状态，例如 `SUCCESS`
    pub status: Option<String>,
    /// 命令状态附带的消息
    pub message: Option<String>,
    /// 引擎返回的原始实体
    pub entities: Vec<serde_json::Value>,
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecutionResult{{queryId={}, status={}, message={}}}",
            self.query_id.as_deref().unwrap_or("-"),
            self.status.as_deref().unwrap_or("-"),
            self.message.as_deref().unwrap_or("-"),
        )
    }
}

/// 语句执行器
///
/// 对应远程引擎的一次会话。实现者按调用顺序执行语句，
/// 返回 `Err` 表示致命错误，调用方不再提交任何后续语句。
pub trait StatementExecutor {
    /// 执行一条语句
    fn execute(
        &mut self,
        statement: &Statement,
        properties: &PropertyMap,
    ) -> Result<ExecutionResult, RunnerError>;

    /// 列出引擎中的流
    fn list_streams(&mut self) -> Result<Vec<StreamInfo>, RunnerError>;
}

impl<E: StatementExecutor + ?Sized> StatementExecutor for &mut E {
    fn execute(
        &mut self,
        statement: &Statement,
        properties: &PropertyMap,
    ) -> Result<ExecutionResult, RunnerError> {
        (**self).execute(statement, properties)
    }

    fn list_streams(&mut self) -> Result<Vec<StreamInfo>, RunnerError> {
        (**self).list_streams()
    }
}

/// 不连接引擎的执行器
///
/// 只记录并打印收到的语句，用于检查语句文件能否被正确切分。
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    executed: Vec<(Statement, PropertyMap)>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已经“执行”过的语句及其属性快照
    pub fn executed(&self) -> &[(Statement, PropertyMap)] {
        &self.executed
    }
}

impl StatementExecutor for DryRunExecutor {
    fn execute(
        &mut self,
        statement: &Statement,
        properties: &PropertyMap,
    ) -> Result<ExecutionResult, RunnerError> {
        let location = if statement.is_multiline() {
            format!("lines {}-{}", statement.start_line, statement.end_line)
        } else {
            format!("line {}", statement.start_line)
        };
        let properties_text = properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "[dry-run] {} with properties {{{}}}:\n{}",
            location, properties_text, statement.text
        );
        self.executed.push((statement.clone(), properties.clone()));
        Ok(ExecutionResult {
            status: Some("DRY_RUN".to_string()),
            ..ExecutionResult::default()
        })
    }

    fn list_streams(&mut self) -> Result<Vec<StreamInfo>, RunnerError> {
        Ok(Vec::new())
    }
}
