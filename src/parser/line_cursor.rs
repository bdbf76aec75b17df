//! LineCursor - 在内存缓冲区上逐行前进的游标
//!
//! 只会向前移动，不支持回退。

use crate::parser::constants::{CARRIAGE_RETURN_BYTE, NEWLINE_BYTE};
use memchr::memchr2;

/// 按行读取缓冲区的游标
///
/// `\n`、`\r` 和 `\r\n` 都视为行结束符，因此 CRLF、LF 与单独 CR 的输入结果一致。
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    buffer: &'a str,
    position: usize,
    line_number: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self {
            buffer,
            position: 0,
            line_number: 0,
        }
    }

    /// 读取下一行（不含行结束符）
    ///
    /// # 返回
    ///
    /// * `Some(line)` - 下一行内容
    /// * `None` - 缓冲区已经读完
    pub fn next_line(&mut self) -> Option<&'a str> {
        if self.position >= self.buffer.len() {
            return None;
        }

        let rest = &self.buffer[self.position..];
        let bytes = rest.as_bytes();
        let (line, consumed) = match memchr2(NEWLINE_BYTE, CARRIAGE_RETURN_BYTE, bytes) {
            Some(idx) if bytes[idx] == CARRIAGE_RETURN_BYTE && bytes.get(idx + 1) == Some(&NEWLINE_BYTE) => {
                (&rest[..idx], idx + 2)
            }
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };

        self.position += consumed;
        self.line_number += 1;
        Some(line)
    }

    /// 最近一次读取的行号（从 1 开始，尚未读取时为 0）
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
