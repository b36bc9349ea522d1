// src/models/ioc_utils.rs

use crate::models::IndicatorRecord;

/// Reduce a raw feed line to an indicator.
///
/// Returns `None` for blank lines and `#` comments. URL-shaped entries are
/// cut down to their host (text after the last `://`, up to the next `/`).
/// Anything else is returned trimmed and otherwise untouched.
pub fn normalize_line(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    if trimmed.contains("://") {
        let rest = trimmed.rsplit("://").next().unwrap_or(trimmed);
        return Some(rest.split('/').next().unwrap_or(rest));
    }

    Some(trimmed)
}

/// Normalize every line of a feed, tagging each indicator with the feed name
pub fn normalize_indicators<S: AsRef<str>>(source: &str, lines: &[S]) -> Vec<IndicatorRecord> {
    lines
        .iter()
        .filter_map(|line| normalize_line(line.as_ref()))
        .map(|indicator| IndicatorRecord::new(indicator, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_tokens_pass_through() {
        assert_eq!(normalize_line("1.2.3.4"), Some("1.2.3.4"));
        assert_eq!(normalize_line("  evil.com\t"), Some("evil.com"));
        assert_eq!(normalize_line("not an ioc at all"), Some("not an ioc at all"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for token in ["10.0.0.1", "bad.example.net", "foo bar"] {
            let once = normalize_line(token).unwrap();
            assert_eq!(normalize_line(once), Some(once));
        }
    }

    #[test]
    fn test_url_reduced_to_host() {
        assert_eq!(normalize_line("http://example.com/path?x=1"), Some("example.com"));
        assert_eq!(normalize_line("https://sub.example.org"), Some("sub.example.org"));
        assert_eq!(normalize_line("http://10.1.1.1:8080/bins/x86"), Some("10.1.1.1:8080"));
    }

    #[test]
    fn test_nested_scheme_uses_last_separator() {
        assert_eq!(
            normalize_line("http://redirect.example/?u=https://target.example/x"),
            Some("target.example")
        );
    }

    #[test]
    fn test_comments_and_blank_lines_dropped() {
        assert_eq!(normalize_line(""), None);
        assert_eq!(normalize_line("   "), None);
        assert_eq!(normalize_line("# header"), None);
        assert_eq!(normalize_line("   # indented comment"), None);
    }

    #[test]
    fn test_normalize_indicators_keeps_order_and_source() {
        let lines = ["# ipsum", "1.2.3.4", "", "http://evil.com/x", "1.2.3.4", "# trailer"];
        let records = normalize_indicators("A", &lines);

        assert_eq!(
            records,
            vec![
                IndicatorRecord::new("1.2.3.4", "A"),
                IndicatorRecord::new("evil.com", "A"),
                IndicatorRecord::new("1.2.3.4", "A"),
            ]
        );
    }
}
