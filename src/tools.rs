//! 行分类工具
//!
//! 语句解析器按行工作，每一行在经过 `trim_line` 去除首尾空白后属于以下四类之一。

// 注释标记
const COMMENT_MARKER: &str = "--";
// 指令前缀（大小写敏感，只做前缀判断）
const DIRECTIVE_PREFIX: &str = "SET";
// 语句结束符
const TERMINATOR: char = ';';

/// 行的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// 去除空白后为空
    Blank,
    /// 以 `--` 开头
    Comment,
    /// 以 `SET` 开头
    Directive,
    /// 其他内容，属于语句的一部分
    Text,
}

/// 判断已去除空白的行属于哪一类
///
/// 注意 `SET` 是前缀判断而不是完整单词匹配，`SETTINGS` 同样会被视为指令。
#[inline]
pub fn classify_line(trimmed: &str) -> LineKind {
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with(COMMENT_MARKER) {
        LineKind::Comment
    } else if trimmed.starts_with(DIRECTIVE_PREFIX) {
        LineKind::Directive
    } else {
        LineKind::Text
    }
}

/// 去除行首尾的空白
///
/// 码点不大于 U+0020 的字符（空格、制表符以及 NUL 等控制字符）都视为空白；
/// U+00A0 等 Unicode 空白保留，不会被去除。
#[inline]
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c <= ' ')
}

/// 判断已去除空白的行是否以语句结束符结尾
#[inline]
pub fn ends_statement(trimmed: &str) -> bool {
    trimmed.ends_with(TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classify_tests {
        use super::*;

        #[test]
        fn blank_lines() {
            assert_eq!(classify_line(""), LineKind::Blank);
        }

        #[test]
        fn comment_lines() {
            let cases = ["--", "-- comment", "---- banner ----", "--SET 'a'='b';"];
            for line in &cases {
                assert_eq!(classify_line(line), LineKind::Comment, "line: {}", line);
            }
        }

        #[test]
        fn single_dash_is_text() {
            assert_eq!(classify_line("- not a comment"), LineKind::Text);
        }

        #[test]
        fn directive_lines() {
            let cases = [
                "SET 'auto.offset.reset' = 'earliest';",
                "SET bogus;",
                "SETTINGS are prefix matched",
            ];
            for line in &cases {
                assert_eq!(classify_line(line), LineKind::Directive, "line: {}", line);
            }
        }

        #[test]
        fn directive_prefix_is_case_sensitive() {
            assert_eq!(classify_line("set 'a' = 'b';"), LineKind::Text);
            assert_eq!(classify_line("Set 'a' = 'b';"), LineKind::Text);
        }

        #[test]
        fn text_lines() {
            let cases = [
                "CREATE STREAM x AS SELECT * FROM y;",
                "INSERT INTO x",
                "UNSET 'a';",
                ");",
            ];
            for line in &cases {
                assert_eq!(classify_line(line), LineKind::Text, "line: {}", line);
            }
        }
    }

    mod trim_tests {
        use super::*;

        #[test]
        fn strips_spaces_and_tabs() {
            assert_eq!(trim_line("  \tSELECT 1; \t"), "SELECT 1;");
        }

        #[test]
        fn strips_control_characters() {
            assert_eq!(trim_line("\u{0}SELECT 2;\u{1f}"), "SELECT 2;");
            assert_eq!(trim_line("\u{b}\u{c}"), "");
        }

        #[test]
        fn keeps_unicode_whitespace() {
            assert_eq!(trim_line("\u{a0}SELECT 1;\u{3000}"), "\u{a0}SELECT 1;\u{3000}");
        }

        #[test]
        fn keeps_inner_whitespace() {
            assert_eq!(trim_line(" a \u{0} b "), "a \u{0} b");
        }
    }

    #[test]
    fn terminator_detection() {
        assert!(ends_statement("SELECT 1;"));
        assert!(ends_statement(";"));
        assert!(!ends_statement("SELECT 1"));
        assert!(!ends_statement("SELECT ';' AS x"));
    }
}
