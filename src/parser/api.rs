//! 便捷 API 函数
//!
//! 提供了一组方便使用的高层 API，用于一次性解析字符串或文件中的全部语句。

use crate::error::RunnerError;
use crate::parser::statement_parser::{StatementParser, Termination};
use crate::statement::ParsedStatement;
use std::fs;
use std::path::Path;

/// 读取语句文件的全部内容
///
/// # 参数
///
/// * `path` - 语句文件路径
///
/// # 返回
///
/// * `Ok(String)` - 文件内容
/// * `Err(RunnerError::Io)` - 文件无法读取或不是合法的 UTF-8
pub fn read_statement_file<P>(path: P) -> Result<String, RunnerError>
where
    P: AsRef<Path>,
{
    let path_ref = path.as_ref();
    fs::read_to_string(path_ref).map_err(|e| RunnerError::io(path_ref, e))
}

/// 解析字符串中的全部语句
///
/// 解析在第一个终止条件处停止：缓冲区读完、格式错误的 `SET` 指令或未结束的语句。
///
/// # 返回
///
/// 返回 `(语句列表, 结束原因)`，每条语句都附带解析到它时的属性快照。
///
/// # 示例
///
/// ```
/// use ksql_runner::parse_statements_from_string;
///
/// let content = "SET 'auto.offset.reset' = 'earliest';\nINSERT INTO x\nVALUES (1,2);";
/// let (statements, termination) = parse_statements_from_string(content);
///
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].statement.text, "INSERT INTO x\nVALUES (1,2);");
/// assert!(termination.unwrap().is_clean());
/// ```
pub fn parse_statements_from_string(content: &str) -> (Vec<ParsedStatement>, Option<Termination>) {
    let mut parser = StatementParser::new(content);
    let statements: Vec<ParsedStatement> = parser.by_ref().filter_map(Result::ok).collect();
    (statements, parser.termination().cloned())
}

/// 从文件读取并解析全部语句
///
/// # 参数
///
/// * `path` - 语句文件路径
///
/// # 返回
///
/// * `Ok((Vec<ParsedStatement>, Option<Termination>))` - 解析出的语句和结束原因
/// * `Err(RunnerError)` - 文件读取错误
pub fn parse_statements_from_file<P>(
    path: P,
) -> Result<(Vec<ParsedStatement>, Option<Termination>), RunnerError>
where
    P: AsRef<Path>,
{
    let content = read_statement_file(path)?;
    Ok(parse_statements_from_string(&content))
}
