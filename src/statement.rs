use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// 一条完整的 ksqlDB 语句
///
/// 由一行或多行（每行已去除首尾空白）以换行符拼接而成，非空且以 `;` 结尾。
/// 解析器不理解语句内部结构，只负责定界。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// 语句文本（包含内部换行和结尾的 `;`）
    pub text: String,

    /// 语句起始行号（从 1 开始）
    pub start_line: usize,

    /// 语句结束行号（包含 `;` 的那一行）
    pub end_line: usize,
}

impl Statement {
    pub fn new(text: String, start_line: usize, end_line: usize) -> Self {
        Self {
            text,
            start_line,
            end_line,
        }
    }

    /// 语句是否跨越多行
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 会话属性表
///
/// 由 `SET '<key>' = '<value>';` 指令累积而成，随后的每条语句都携带当前快照。
/// 键唯一，后出现的同名指令覆盖先前的值。使用有序 map 使日志和 JSON 输出稳定。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖属性，返回被覆盖的旧值
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 解析结果：语句及其对应的属性快照
///
/// 属性快照反映了该语句结束行之前出现的全部 `SET` 指令。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    pub statement: Statement,
    pub properties: PropertyMap,
}
