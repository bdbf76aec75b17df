//! 解析器使用的常量定义
//!
//! 定义了指令语法、行分隔符等解析过程中使用的常量。

/// `SET` 指令的正则表达式
///
/// 两个捕获组分别为属性键和属性值，均为贪婪匹配，在去除空白后的行中任意位置查找。
pub const SET_DIRECTIVE_PATTERN: &str = r"SET '(.*)'\s*=\s*'(.*)'\s*;";

/// 多行语句拼接时使用的分隔符
pub const LINE_JOINER: char = '\n';

/// 行结束符
pub const NEWLINE_BYTE: u8 = b'\n';

/// Windows 行结束符中的回车
pub const CARRIAGE_RETURN_BYTE: u8 = b'\r';
