//! 批量运行
//!
//! 把单个文件或一个目录下的全部文件依次交给解析器和执行器。
//! 每个文件使用新的解析器和空的属性表，属性不会在文件之间传递。

use crate::error::RunnerError;
use crate::executor::{ExecutionResult, StatementExecutor, StreamInfo};
use crate::parser::{StatementParser, Termination, read_statement_file};
use crate::statement::Statement;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 批量运行的输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInput {
    /// 单个语句文件
    File(PathBuf),
    /// 目录：直接子文件按文件名排序后依次执行（不递归，跳过子目录）
    Directory(PathBuf),
}

/// 何时列出引擎中的流
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListStreams {
    Never,
    #[default]
    Before,
    After,
    Both,
}

impl ListStreams {
    fn before(self) -> bool {
        matches!(self, ListStreams::Before | ListStreams::Both)
    }

    fn after(self) -> bool {
        matches!(self, ListStreams::After | ListStreams::Both)
    }
}

/// 单个文件的运行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    /// 成功执行的语句数
    pub executed: usize,
    /// 解析结束的原因
    pub termination: Termination,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.termination.is_clean()
    }
}

/// 整个批量运行的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// 运行前列出的流
    pub streams_before: Vec<StreamInfo>,
    /// 运行后列出的流
    pub streams_after: Vec<StreamInfo>,
}

impl BatchReport {
    pub fn statements_executed(&self) -> usize {
        self.files.iter().map(|f| f.executed).sum()
    }

    /// 所有文件都正常读完（没有格式错误的指令或未结束的语句）
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(FileReport::is_clean)
    }
}

/// 将输入解析为按顺序执行的文件列表
///
/// # 返回
///
/// * 文件输入 - 只包含该文件
/// * 目录输入 - 目录下的直接子文件（跳过子目录），按文件名升序
pub fn resolve_input_files(input: &BatchInput) -> Result<Vec<PathBuf>, RunnerError> {
    match input {
        BatchInput::File(path) => Ok(vec![path.clone()]),
        BatchInput::Directory(dir) => {
            let entries = fs::read_dir(dir).map_err(|e| RunnerError::io(dir, e))?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| RunnerError::io(dir, e))?;
                let file_type = entry.file_type().map_err(|e| RunnerError::io(entry.path(), e))?;
                if file_type.is_dir() {
                    continue;
                }
                files.push(entry.path());
            }
            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            Ok(files)
        }
    }
}

/// 批量运行器
///
/// 语句严格按解析顺序提交；执行器返回的任何错误都会中止整个运行，
/// 已经执行的语句不会回滚。
pub struct BatchRunner<E: StatementExecutor> {
    executor: E,
    list_streams: ListStreams,
    on_result: Option<Box<dyn FnMut(&Statement, &ExecutionResult)>>,
    on_streams: Option<Box<dyn FnMut(&[StreamInfo])>>,
}

impl<E: StatementExecutor> BatchRunner<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            list_streams: ListStreams::Never,
            on_result: None,
            on_streams: None,
        }
    }

    pub fn with_list_streams(mut self, list_streams: ListStreams) -> Self {
        self.list_streams = list_streams;
        self
    }

    /// 每条语句执行成功后的回调（命令行用于打印结果）
    pub fn on_result<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Statement, &ExecutionResult) + 'static,
    {
        self.on_result = Some(Box::new(callback));
        self
    }

    /// 列出流之后的回调
    pub fn on_streams<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[StreamInfo]) + 'static,
    {
        self.on_streams = Some(Box::new(callback));
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// 运行整个批次
    pub fn run(&mut self, input: &BatchInput) -> Result<BatchReport, RunnerError> {
        let mut report = BatchReport::default();

        if self.list_streams.before() {
            report.streams_before = self.list_streams()?;
        }

        for path in resolve_input_files(input)? {
            let file_report = self.run_file(&path)?;
            report.files.push(file_report);
        }

        if self.list_streams.after() {
            report.streams_after = self.list_streams()?;
        }

        info!(
            "Executed {} statements from {} files",
            report.statements_executed(),
            report.files.len()
        );
        Ok(report)
    }

    fn list_streams(&mut self) -> Result<Vec<StreamInfo>, RunnerError> {
        let streams = self.executor.list_streams()?;
        info!("Engine reports {} streams", streams.len());
        if let Some(callback) = self.on_streams.as_mut() {
            callback(&streams);
        }
        Ok(streams)
    }

    /// 运行单个文件
    pub fn run_file(&mut self, path: &Path) -> Result<FileReport, RunnerError> {
        info!("Processing {}", path.display());
        let content = read_statement_file(path)?;
        self.run_buffer(path, &content)
    }

    /// 运行一段已经读入内存的语句文本
    pub fn run_buffer(&mut self, path: &Path, content: &str) -> Result<FileReport, RunnerError> {
        let mut parser = StatementParser::new(content);
        let mut executed = 0;

        for item in parser.by_ref() {
            // 解析错误由解析器记录在 termination 中，这里只结束当前文件
            let Ok(parsed) = item else { break };

            let result = self
                .executor
                .execute(&parsed.statement, &parsed.properties)
                .inspect_err(|e| {
                    error!(
                        "Encountered error while executing {}:{}:\n\n{}\n\n{}",
                        path.display(),
                        parsed.statement.start_line,
                        parsed.statement.text,
                        e
                    )
                })?;
            executed += 1;

            if let Some(callback) = self.on_result.as_mut() {
                callback(&parsed.statement, &result);
            }
        }

        let termination = parser
            .termination()
            .cloned()
            .unwrap_or(Termination::Exhausted);
        if !termination.is_clean() {
            warn!(
                "{} stopped early after {} statements: {:?}",
                path.display(),
                executed,
                termination
            );
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            executed,
            termination,
        })
    }
}
