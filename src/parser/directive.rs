//! `SET` 指令解析
//!
//! 指令形如 `SET '<key>' = '<value>';`，匹配成功后写入会话属性表。

use crate::parser::constants::SET_DIRECTIVE_PATTERN;
use once_cell::sync::Lazy;
use regex::Regex;

// 预编译的指令正则，避免每行重新编译
static SET_DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(SET_DIRECTIVE_PATTERN).unwrap_or_else(|e| panic!("invalid SET pattern: {}", e))
});

/// 一条解析成功的 `SET` 指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// 解析 `SET` 指令
///
/// # 参数
///
/// * `trimmed` - 已去除首尾空白、以 `SET` 开头的行
///
/// # 返回
///
/// * `Some(Directive)` - 行中存在符合语法的指令
/// * `None` - 行不符合 `SET '<key>' = '<value>';` 语法
pub fn parse_directive(trimmed: &str) -> Option<Directive<'_>> {
    let caps = SET_DIRECTIVE_RE.captures(trimmed)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    Some(Directive { key, value })
}
