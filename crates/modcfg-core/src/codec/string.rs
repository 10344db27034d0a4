//! Escaping for `String` settings.
//!
//! A value must fit on one `Name = value` line and survive the whitespace trim
//! applied when the file is read, so the following characters are written as
//! backslash sequences:
//!
//! | char          | escape |
//! |---------------|--------|
//! | `\`           | `\\`   |
//! | `"`           | `\"`   |
//! | newline       | `\n`   |
//! | carriage ret. | `\r`   |
//! | tab           | `\t`   |
//! | NUL           | `\0`   |
//! | leading/trailing space | `\s` |
//! | other leading/trailing whitespace | `\u{XXXX}` |
//!
//! Whitespace inside the value (apart from the control characters above) is
//! written as-is. At either end, every character for which
//! [`char::is_whitespace`] holds is escaped, since that is what `str::trim`
//! removes.

use super::{CodecError, ConfigValue};

impl ConfigValue for String {
    fn encode(&self) -> Result<String, CodecError> {
        Ok(escape(self))
    }

    fn decode(text: &str) -> Result<Self, CodecError> {
        unescape(text)
    }
}

/// Escapes `raw` so it can be written on a single settings line.
pub fn escape(raw: &str) -> String {
    let lead = raw.len() - raw.trim_start().len();
    let trail_start = raw.trim_end().len();

    let mut out = String::with_capacity(raw.len() + 2);
    for (i, c) in raw.char_indices() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            ' ' if i < lead || i >= trail_start => out.push_str("\\s"),
            c if c.is_whitespace() && (i < lead || i >= trail_start) => {
                out.push_str(&format!("\\u{{{:x}}}", u32::from(c)));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`].
///
/// # Errors
///
/// Returns [`CodecError::InvalidEscape`] for an unknown sequence or a dangling
/// backslash at the end of the text.
pub fn unescape(text: &str) -> Result<String, CodecError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('s') => out.push(' '),
            Some('u') => out.push(unescape_code_point(&mut chars)?),
            Some(other) => return Err(CodecError::InvalidEscape(format!("\\{other}"))),
            None => return Err(CodecError::InvalidEscape("\\".to_string())),
        }
    }
    Ok(out)
}

/// Reads the `{XXXX}` part of a `\u{XXXX}` sequence.
fn unescape_code_point(chars: &mut std::str::Chars<'_>) -> Result<char, CodecError> {
    let invalid = |body: &str| CodecError::InvalidEscape(format!("\\u{body}"));

    if chars.next() != Some('{') {
        return Err(invalid(""));
    }
    let mut hex = String::new();
    loop {
        match chars.next() {
            Some('}') => break,
            Some(c) if c.is_ascii_hexdigit() && hex.len() < 6 => hex.push(c),
            _ => return Err(invalid(&format!("{{{hex}"))),
        }
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| invalid(&format!("{{{hex}}}")))
}
