pub mod fountain_constants;

pub use fountain_constants::{FountainConstants, BLOCK_REGEX, TITLE_REGEX};

/// 行中有大写字母且没有小写字母（标点、数字、空白不计）
pub fn is_upper_case_line(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// 去掉行首 BOM
pub fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// 去除段落各行共同的前导缩进（按字符计）
pub fn dedent(lines: &[String]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| l.chars().skip(leading_whitespace(l).min(indent)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_case_line() {
        assert!(is_upper_case_line("JOHN (V.O.)"));
        assert!(is_upper_case_line("MRS. O'BRIEN"));
        assert!(!is_upper_case_line("John"));
        assert!(!is_upper_case_line("1985"));
        assert!(!is_upper_case_line("顾清"));
    }

    #[test]
    fn dedent_keeps_relative_indentation() {
        let lines = vec!["    one".to_string(), "      two".to_string()];
        assert_eq!(dedent(&lines), vec!["one".to_string(), "  two".to_string()]);
    }

    #[test]
    fn dedent_counts_wide_spaces_as_one_character() {
        let lines = vec![
            "\u{3000}\u{3000}一".to_string(),
            "\u{3000}\u{3000}\u{3000}二".to_string(),
            "\u{3000}\u{3000}三".to_string(),
        ];
        assert_eq!(
            dedent(&lines),
            vec!["一".to_string(), "\u{3000}二".to_string(), "三".to_string()]
        );
    }
}
