//! Line-oriented parsing for the bracketed-context key-value format: one
//! `[context]` header or `key=value` pair per logical line, `#` starts a
//! trailing comment.

/// One parsed line: either a new context header or a key/value pair.
pub enum Line<'a> {
    Context(&'a str),
    Pair(&'a str, &'a str),
    Empty,
}

/// Strips a trailing `#...` comment and surrounding whitespace from a raw
/// line.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

pub fn parse_line(raw: &str) -> Line<'_> {
    let line = strip_comment(raw);
    if line.is_empty() {
        return Line::Empty;
    }
    if let Some(stripped) = line.strip_prefix('[') {
        if let Some(context) = stripped.strip_suffix(']') {
            return Line::Context(context);
        }
    }
    match line.split_once('=') {
        Some((key, value)) => Line::Pair(key.trim(), value.trim()),
        None => Line::Empty,
    }
}

/// Splits a `--key=value` command-line override, stripping the leading
/// marker. Short options and bare flags are ignored.
pub fn parse_override(arg: &str) -> Option<(&str, &str)> {
    let rest = arg.strip_prefix("--")?;
    rest.split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_context_header() {
        assert!(matches!(parse_line("[display]"), Line::Context("display")));
    }

    #[test]
    fn parses_pair_with_trailing_comment() {
        match parse_line("width=320 # native width") {
            Line::Pair(k, v) => {
                assert_eq!(k, "width");
                assert_eq!(v, "320");
            }
            _ => panic!("expected a pair"),
        }
    }

    #[test]
    fn comment_only_line_is_empty() {
        assert!(matches!(parse_line("# just a comment"), Line::Empty));
    }

    #[test]
    fn override_requires_double_dash_and_equals() {
        assert_eq!(parse_override("--display-width=640"), Some(("display-width", "640")));
        assert_eq!(parse_override("-x=1"), None);
        assert_eq!(parse_override("--no-value"), None);
    }
}
