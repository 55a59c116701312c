pub(super) const TERMINATOR: &str = "--";

/// Whether `token` starts with a dash and has something more in it.
/// A bare `-` is not option-like.
pub(super) fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Whether `token` starts with a double dash and has something more in it.
/// A bare `--` is not a long option.
pub(super) fn is_long_option(token: &str) -> bool {
    token.len() > TERMINATOR.len() && token.starts_with(TERMINATOR)
}

/// Split `tokens` at the first `--` terminator.
/// The terminator itself is in neither half.
pub(super) fn split_terminator<'t, S: AsRef<str>>(tokens: &'t [S]) -> (&'t [S], &'t [S]) {
    match tokens.iter().position(|t| t.as_ref() == TERMINATOR) {
        Some(index) => (&tokens[..index], &tokens[index + 1..]),
        None => (tokens, &[]),
    }
}

/// Split `--key=value` style tokens (with the dashes already stripped) on the first `=`.
pub(super) fn split_equals_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}
