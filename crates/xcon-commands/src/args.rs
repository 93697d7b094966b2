#![forbid(unsafe_code)]

//! Argument splitting and value conversion.
//!
//! Numbers are parsed and printed in an invariant format: `.` decimal
//! separator, no grouping.

/// Split a command line at the first space or tab into `(name, args)`.
///
/// Both parts are trimmed; `args` is empty when the line has no arguments.
#[must_use]
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.find([' ', '\t']) {
        Some(at) => (&line[..at], line[at..].trim()),
        None => (line, ""),
    }
}

/// First whitespace-separated token, or `None` for blank input.
#[must_use]
pub fn first_arg(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

/// `1`/`on` is true, `0`/`off` is false.
#[must_use]
pub fn parse_bool(arg: &str) -> Option<bool> {
    match arg {
        "1" | "on" => Some(true),
        "0" | "off" => Some(false),
        _ => None,
    }
}

#[must_use]
pub fn parse_int(arg: &str) -> Option<i32> {
    arg.parse().ok()
}

#[must_use]
pub fn parse_float(arg: &str) -> Option<f32> {
    arg.parse::<f32>().ok().filter(|v| v.is_finite())
}

#[must_use]
pub fn format_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Format with at least three and at most six decimals.
#[must_use]
pub fn format_float(value: f32) -> String {
    let mut s = format!("{value:.6}");
    if let Some(dot) = s.find('.') {
        let min_len = dot + 4;
        while s.len() > min_len && s.ends_with('0') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_at_first_blank() {
        assert_eq!(split_command("  set   a b "), ("set", "a b"));
        assert_eq!(split_command("help\tfoo"), ("help", "foo"));
        assert_eq!(split_command("quit"), ("quit", ""));
        assert_eq!(split_command("   "), ("", ""));
    }

    #[test]
    fn first_arg_tokens() {
        assert_eq!(first_arg(" on trailing"), Some("on"));
        assert_eq!(first_arg("   "), None);
    }

    #[test]
    fn bool_words() {
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(format_bool(true), "1");
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("4.2"), None);
        assert_eq!(parse_float("0.5"), Some(0.5));
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("NaN"), None);
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(1.0), "1.000");
        assert_eq!(format_float(0.25), "0.250");
        assert_eq!(format_float(0.123456), "0.123456");
        assert_eq!(format_float(-2.5), "-2.500");
    }
}
