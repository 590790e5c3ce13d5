//! Shell-style `$VAR` / `${VAR}` expansion.
//!
//! One pass, no recursion: text returned by the lookup is copied into the
//! output as-is and never scanned again.

/// Replace every `$NAME` and `${NAME}` in `input` with `lookup(NAME)`.
///
/// - `$NAME` takes the longest run of ASCII letters, digits and `_`.
/// - `${NAME}` takes everything up to the closing brace.
/// - A single special character (`*#$@!?-` or a digit) after `$`, or as the
///   whole body of `${x}`, is a one-character name.
/// - `$` followed by anything else, or at the end of input, stays literal.
/// - `${}` and an unterminated `${` are dropped.
pub fn expand<F>(input: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> String,
{
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() {
            out.push_str(&input[copied..i]);
            let (name, width) = shell_name(&input[i + 1..]);
            match name {
                Some(name) => out.push_str(&lookup(name)),
                None if width > 0 => {}
                None => out.push('$'),
            }
            i += width;
            copied = i + 1;
        }
        i += 1;
    }

    out.push_str(&input[copied..]);
    out
}

/// Parse the variable name following a `$`. Returns the name, if any, and
/// how many bytes after the `$` it consumed.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    let b = s.as_bytes();

    if b[0] == b'{' {
        if b.len() > 2 && is_special(b[1]) && b[2] == b'}' {
            return (Some(&s[1..2]), 3);
        }
        return match b.iter().skip(1).position(|&c| c == b'}') {
            Some(0) => (None, 2),
            Some(pos) => (Some(&s[1..pos + 1]), pos + 2),
            None => (None, 1),
        };
    }

    if is_special(b[0]) {
        return (Some(&s[..1]), 1);
    }

    let len = b
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric() || **c == b'_')
        .count();
    if len == 0 {
        (None, 0)
    } else {
        (Some(&s[..len]), len)
    }
}

fn is_special(c: u8) -> bool {
    matches!(c, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || c.is_ascii_digit()
}
