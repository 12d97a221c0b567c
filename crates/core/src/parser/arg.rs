//! Argument shape helpers.

use crate::options::Options;

/// `-f`, `-abc`, but not `-` or `--foo`.
pub(crate) fn is_alias(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'-' && bytes[1] != b'-'
}

/// An alias, or a long option with a name (`--foo`, but not `--`).
pub(crate) fn is_option(arg: &str) -> bool {
    is_alias(arg) || (arg.len() >= 3 && arg.starts_with("--"))
}

pub(crate) fn is_assignable(arg: &str, options: &Options) -> bool {
    options.assign.unwrap_or_else(|| is_option(arg))
}

/// `"Option"` or `"Command"`, by the shape of the raw argument.
pub(crate) fn kind(raw: Option<&str>) -> &'static str {
    match raw {
        Some(raw) if is_option(raw) => "Option",
        _ => "Command",
    }
}

/// `"Option '--foo' "` style prefix for messages, or empty when the node has
/// neither a name nor a raw argument (the root).
pub(crate) fn display_name(raw: Option<&str>, name: Option<&str>) -> String {
    match name.or(raw) {
        Some(name) => format!("{} '{}' ", kind(raw), name),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_shapes() {
        assert!(is_alias("-f"));
        assert!(is_alias("-abc"));
        assert!(!is_alias("-"));
        assert!(!is_alias("--"));
        assert!(!is_alias("--foo"));
        assert!(!is_alias("f"));
    }

    #[test]
    fn option_shapes() {
        assert!(is_option("-f"));
        assert!(is_option("--foo"));
        assert!(is_option("--f"));
        assert!(!is_option("--"));
        assert!(!is_option("-"));
        assert!(!is_option("foo"));
    }

    #[test]
    fn assignable_defaults_to_option_shape() {
        let options = Options::new();
        assert!(is_assignable("--foo", &options));
        assert!(is_assignable("-f", &options));
        assert!(!is_assignable("foo", &options));
        assert!(!is_assignable("--", &options));
        assert!(is_assignable("foo", &Options::new().assign(true)));
        assert!(!is_assignable("--foo", &Options::new().assign(false)));
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name(None, None), "");
        assert_eq!(display_name(None, Some("root")), "Command 'root' ");
        assert_eq!(display_name(Some("--foo"), None), "Option '--foo' ");
        assert_eq!(display_name(Some("--foo"), Some("foo")), "Option 'foo' ");
        assert_eq!(display_name(Some("build"), None), "Command 'build' ");
    }
}
