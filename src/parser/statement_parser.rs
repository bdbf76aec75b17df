//! StatementParser - 从缓冲区逐条解析 ksqlDB 语句
//!
//! 解析器是一个三状态的状态机：
//!
//! ```text
//! Idle ──(未结束的语句行)──> Accumulating ──(以 ; 结尾的行)──> Idle
//!   │                            │
//!   └──(缓冲区耗尽 / SET 格式错误)─┴──(缓冲区耗尽)──> Done
//! ```
//!
//! `Done` 是吸收态，进入后每次 `advance()` 都返回 `ParseOutcome::End`。

use crate::error::ParseError;
use crate::parser::constants::LINE_JOINER;
use crate::parser::directive::parse_directive;
use crate::parser::line_cursor::LineCursor;
use crate::statement::{ParsedStatement, PropertyMap, Statement};
use crate::tools::{LineKind, classify_line, ends_statement, trim_line};
use log::{debug, error, trace, warn};

/// 解析器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// 等待下一条语句
    Idle,
    /// 正在累积多行语句
    Accumulating,
    /// 已结束，不再产生语句
    Done,
}

/// 解析器进入 `Done` 的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// 缓冲区正常读完
    Exhausted,
    /// 遇到不符合语法的 `SET` 指令，剩余内容全部放弃
    MalformedDirective {
        /// 指令所在行号
        line_number: usize,
        /// 指令行内容（已去除空白）
        line: String,
    },
    /// 语句在缓冲区结束前未遇到 `;`
    IncompleteStatement {
        /// 语句起始行号
        start_line: usize,
        /// 已累积的部分文本
        partial: String,
    },
}

impl Termination {
    /// 是否为正常结束
    pub fn is_clean(&self) -> bool {
        matches!(self, Termination::Exhausted)
    }
}

/// 单次 `advance()` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// 一条完整的语句
    Statement(Statement),
    /// 没有更多语句
    End,
    /// 输入格式错误（语句未结束）
    Error(ParseError),
}

impl ParseOutcome {
    pub fn into_statement(self) -> Option<Statement> {
        match self {
            ParseOutcome::Statement(statement) => Some(statement),
            _ => None,
        }
    }
}

/// 从内存缓冲区中逐条解析语句的解析器
///
/// 每个解析器绑定一个缓冲区，拥有自己的属性表；不同解析器之间不共享状态。
///
/// # 示例
///
/// ```
/// use ksql_runner::parser::{ParseOutcome, StatementParser};
///
/// let mut parser = StatementParser::new(
///     "SET 'auto.offset.reset' = 'earliest';\nCREATE STREAM x AS SELECT * FROM y;",
/// );
///
/// let statement = parser.advance().into_statement().unwrap();
/// assert_eq!(statement.text, "CREATE STREAM x AS SELECT * FROM y;");
/// assert_eq!(parser.properties().get("auto.offset.reset"), Some("earliest"));
/// assert_eq!(parser.advance(), ParseOutcome::End);
/// ```
#[derive(Debug)]
pub struct StatementParser<'a> {
    cursor: LineCursor<'a>,
    properties: PropertyMap,
    current: Option<Statement>,
    state: ParserState,
    termination: Option<Termination>,
}

impl<'a> StatementParser<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self {
            cursor: LineCursor::new(buffer),
            properties: PropertyMap::new(),
            current: None,
            state: ParserState::Idle,
            termination: None,
        }
    }

    /// 尝试解析下一条语句
    ///
    /// 空行和注释行被跳过；`SET` 指令更新属性表后继续读取；
    /// 其他行开始一条语句，直到遇到以 `;` 结尾的行。
    ///
    /// # 返回
    ///
    /// * `ParseOutcome::Statement` - 一条完整语句
    /// * `ParseOutcome::End` - 缓冲区读完，或遇到格式错误的 `SET` 指令
    /// * `ParseOutcome::Error` - 缓冲区在语句中途结束
    pub fn advance(&mut self) -> ParseOutcome {
        if self.state == ParserState::Done {
            return ParseOutcome::End;
        }

        loop {
            let Some(raw) = self.cursor.next_line() else {
                self.finish(Termination::Exhausted);
                return ParseOutcome::End;
            };
            let line = trim_line(raw);

            match classify_line(line) {
                LineKind::Blank | LineKind::Comment => continue,
                LineKind::Directive => match parse_directive(line) {
                    Some(directive) => {
                        debug!("SET '{}' = '{}'", directive.key, directive.value);
                        self.properties.insert(directive.key, directive.value);
                    }
                    None => {
                        warn!("SET directive did not match '{}'", line);
                        self.finish(Termination::MalformedDirective {
                            line_number: self.cursor.line_number(),
                            line: line.to_string(),
                        });
                        return ParseOutcome::End;
                    }
                },
                LineKind::Text => return self.read_statement(line),
            }
        }
    }

    /// 从首行开始读取一条语句
    fn read_statement(&mut self, first_line: &str) -> ParseOutcome {
        let start_line = self.cursor.line_number();

        if ends_statement(first_line) {
            return self.emit(Statement::new(first_line.to_string(), start_line, start_line));
        }

        self.state = ParserState::Accumulating;
        let mut text = String::from(first_line);

        loop {
            let Some(raw) = self.cursor.next_line() else {
                error!("Incomplete statement '{}'", text);
                let err = ParseError::IncompleteStatement {
                    start_line,
                    partial: text.clone(),
                };
                self.finish(Termination::IncompleteStatement {
                    start_line,
                    partial: text,
                });
                return ParseOutcome::Error(err);
            };
            let line = trim_line(raw);
            trace!("continuation line '{}'", line);

            text.push(LINE_JOINER);
            text.push_str(line);

            if ends_statement(line) {
                break;
            }
        }

        let end_line = self.cursor.line_number();
        self.emit(Statement::new(text, start_line, end_line))
    }

    fn emit(&mut self, statement: Statement) -> ParseOutcome {
        self.state = ParserState::Idle;
        self.current = Some(statement.clone());
        ParseOutcome::Statement(statement)
    }

    fn finish(&mut self, termination: Termination) {
        debug!("parser finished: {:?}", termination);
        self.state = ParserState::Done;
        self.current = None;
        self.termination = Some(termination);
    }

    /// 最近一次解析出的语句
    pub fn current(&self) -> Option<&Statement> {
        self.current.as_ref()
    }

    /// 当前累积的属性表
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn into_properties(self) -> PropertyMap {
        self.properties
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// 解析器结束的原因（尚未结束时为 `None`）
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }
}

impl Iterator for StatementParser<'_> {
    type Item = Result<ParsedStatement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            ParseOutcome::Statement(statement) => Some(Ok(ParsedStatement {
                statement,
                properties: self.properties.clone(),
            })),
            ParseOutcome::End => None,
            ParseOutcome::Error(err) => Some(Err(err)),
        }
    }
}
