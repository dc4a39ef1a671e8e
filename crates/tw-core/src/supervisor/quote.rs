//! POSIX shell quoting for the `command` field.
//!
//! Tokens made only of safe characters are left bare; anything else is
//! wrapped in single quotes, with an embedded `'` written as `'"'"'`.

use std::borrow::Cow;

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

/// Quote one token so a POSIX shell reads it back unchanged.
pub fn quote(token: &str) -> Cow<'_, str> {
    if token.is_empty() {
        return Cow::Borrowed("''");
    }
    if token.chars().all(is_safe) {
        return Cow::Borrowed(token);
    }

    let mut out = String::with_capacity(token.len() + 2);
    out.push('\'');
    out.push_str(&token.replace('\'', r#"'"'"'"#));
    out.push('\'');
    Cow::Owned(out)
}

/// Quote every token and join with single spaces.
pub fn join<S: AsRef<str>>(argv: &[S]) -> String {
    argv.iter()
        .map(|token| quote(token.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_tokens_bare() {
        assert_eq!(quote("echo"), "echo");
        assert_eq!(quote("/usr/bin/env"), "/usr/bin/env");
        assert_eq!(quote("--flag=a,b:c@d%e+f"), "--flag=a,b:c@d%e+f");
    }

    #[test]
    fn test_unsafe_tokens_quoted() {
        assert_eq!(quote("hello world"), "'hello world'");
        assert_eq!(quote("$HOME"), "'$HOME'");
        assert_eq!(quote("a*b"), "'a*b'");
        assert_eq!(quote("naïve"), "'naïve'");
    }

    #[test]
    fn test_empty_and_single_quote() {
        assert_eq!(quote(""), "''");
        assert_eq!(quote("it's"), r#"'it'"'"'s'"#);
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["echo", "hello world"]), "echo 'hello world'");
        assert_eq!(join(&["sh", "-c", "exit 7"]), "sh -c 'exit 7'");
        assert_eq!(join::<&str>(&[]), "");
    }
}
