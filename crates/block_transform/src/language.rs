//! Code language detection heuristic
//!
//! Keyword sniffing over the raw text, checked in a fixed priority order.
//! Deliberately crude - the result only seeds the code block's language
//! field, which the user can change.

/// Detect the probable language of a code snippet
pub fn detect_language(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    if text.contains("function") || text.contains("const ") || text.contains("=>") {
        "javascript"
    } else if text.contains("def ") || text.contains("import ") {
        "python"
    } else if lower.contains("<?php") {
        "php"
    } else if lower.contains("<html") || lower.contains("<div") {
        "html"
    } else if lower.contains("select ") && lower.contains(" from ") {
        "sql"
    } else {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_javascript() {
        assert_eq!(detect_language("const x = () => 1;"), "javascript");
        assert_eq!(detect_language("function add(a, b) { return a + b; }"), "javascript");
    }

    #[test]
    fn test_detects_python() {
        assert_eq!(detect_language("def add(a, b):\n    return a + b"), "python");
        assert_eq!(detect_language("import os"), "python");
    }

    #[test]
    fn test_detects_php_and_html() {
        assert_eq!(detect_language("<?php echo 1; ?>"), "php");
        assert_eq!(detect_language("<div class=\"row\"></div>"), "html");
    }

    #[test]
    fn test_detects_sql() {
        assert_eq!(detect_language("SELECT id FROM users"), "sql");
        assert_eq!(detect_language("select name from people where age > 3"), "sql");
    }

    #[test]
    fn test_falls_back_to_text() {
        assert_eq!(detect_language("just some prose"), "text");
    }
}
