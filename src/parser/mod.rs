//! Parser 模块 - 解析 ksqlDB 语句文件
//!
//! 此模块提供了完整的语句解析功能,包括:
//! - 行游标和行分类
//! - `SET` 指令解析
//! - 逐条解析语句的状态机
//! - 便捷 API 函数

mod api;
mod constants;
pub mod directive;
pub mod line_cursor;
pub mod statement_parser;

pub use api::{parse_statements_from_file, parse_statements_from_string, read_statement_file};
pub use directive::{Directive, parse_directive};
pub use line_cursor::LineCursor;
pub use statement_parser::{ParseOutcome, ParserState, StatementParser, Termination};
