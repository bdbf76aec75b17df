//! # ksql-runner
//!
//! 读取 ksqlDB 语句文件并逐条提交到远程流式 SQL 引擎的批量运行器。
//!
//! ## 功能特性
//!
//! - **增量解析**: 逐行解析语句文件，支持注释、空行、`SET` 指令和跨行语句
//! - **会话属性**: `SET '<key>' = '<value>';` 指令累积成属性表，随后的每条语句都携带当前快照
//! - **严格顺序**: 语句按文件中的顺序逐条执行，任何执行错误都会中止整个运行
//! - **批量输入**: 支持单个文件或目录（按文件名排序，每个文件独立的属性表）
//!
//! ## 快速开始
//!
//! ### 解析语句
//!
//! ```rust
//! use ksql_runner::{ParseOutcome, StatementParser};
//!
//! let content = r#"
//! -- 从最早的 offset 开始读取
//! SET 'auto.offset.reset' = 'earliest';
//! CREATE STREAM pageviews_enriched AS
//!   SELECT * FROM pageviews;
//! "#;
//!
//! let mut parser = StatementParser::new(content);
//! while let ParseOutcome::Statement(statement) = parser.advance() {
//!     println!("语句: {}", statement);
//!     println!("属性: {:?}", parser.properties());
//! }
//! ```
//!
//! ### 批量执行
//!
//! ```rust,no_run
//! use ksql_runner::{BatchInput, BatchRunner, KsqlRestClient, ListStreams, load_connection_config};
//!
//! let config = load_connection_config("ksqldb.properties")?;
//! let client = KsqlRestClient::new(&config)?;
//!
//! let mut runner = BatchRunner::new(client).with_list_streams(ListStreams::Before);
//! let report = runner.run(&BatchInput::Directory("statements/".into()))?;
//! println!("执行了 {} 条语句", report.statements_executed());
//! # Ok::<(), ksql_runner::RunnerError>(())
//! ```
//!
//! ## 语句文件格式
//!
//! ```text
//! -- 注释行与空行会被跳过
//! SET 'auto.offset.reset' = 'earliest';
//! CREATE STREAM s (id INT) WITH (kafka_topic='s', value_format='JSON');
//! INSERT INTO s
//!   VALUES (1);
//! ```

pub mod batch;
pub mod connection;
pub mod error;
pub mod executor;
pub mod ksql_client;
pub mod parser;
pub mod statement;
pub mod tools;

pub use batch::{BatchInput, BatchReport, BatchRunner, FileReport, ListStreams, resolve_input_files};
pub use connection::{ConnectionConfig, Credentials, Loader, load_connection_config};
pub use error::{ParseError, RunnerError};
pub use executor::{DryRunExecutor, ExecutionResult, StatementExecutor, StreamInfo};
pub use ksql_client::KsqlRestClient;
pub use parser::{
    ParseOutcome, ParserState, StatementParser, Termination, parse_statements_from_file,
    parse_statements_from_string, read_statement_file,
};
pub use statement::{ParsedStatement, PropertyMap, Statement};
