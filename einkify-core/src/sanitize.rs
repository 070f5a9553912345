//! Flattening of arbitrary relative paths into package-safe file names

use regex::Regex;
use std::sync::OnceLock;

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\-.]").expect("valid regex"))
}

fn hyphen_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("valid regex"))
}

/// Map a relative path to a flat name made of word characters, `-`, `_` and `.`
///
/// Every other character (path separators included) becomes `-` and runs of
/// `-` collapse into one. Distinct inputs may map to the same name.
pub fn sanitize(path: &str) -> String {
    let replaced = disallowed().replace_all(path, "-");
    hyphen_runs().replace_all(&replaced, "-").into_owned()
}

/// Whether `c` may appear in a sanitized name
pub fn is_allowed(c: char) -> bool {
    let mut buf = [0u8; 4];
    !disallowed().is_match(c.encode_utf8(&mut buf))
}
