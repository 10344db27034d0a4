//! File-name sanitising for config identifiers.
//!
//! Identifiers are free-form strings (often reverse-DNS names or GUIDs) and
//! become the stem of the settings file name, so characters that are not
//! allowed in file names on any supported platform are replaced.

/// Characters rejected in file names (the Windows set, a superset of Unix).
fn is_invalid(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || (c as u32) < 0x20
}

/// Returns `name` with unsafe characters replaced by `replacement`.
///
/// - Each run of invalid characters becomes one `replacement`.
/// - A trailing run of dots, together with any invalid characters directly
///   before it, becomes one `replacement` (Windows silently drops trailing
///   dots, which would make two identifiers share a file).
///
/// # Examples
///
/// ```rust
/// use modcfg_core::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("com.example/mod:v2", "_"), "com.example_mod_v2");
/// assert_eq!(sanitize_file_name("trailing...", "_"), "trailing_");
/// ```
pub fn sanitize_file_name(name: &str, replacement: &str) -> String {
    // Byte offset where the "invalid* dots+" suffix starts, if there is one.
    let without_dots = name.trim_end_matches('.');
    let suffix_start = if without_dots.len() < name.len() {
        without_dots.trim_end_matches(is_invalid).len()
    } else {
        name.len()
    };

    let mut out = String::with_capacity(name.len());
    let mut in_invalid_run = false;
    for c in name[..suffix_start].chars() {
        if is_invalid(c) {
            if !in_invalid_run {
                out.push_str(replacement);
                in_invalid_run = true;
            }
        } else {
            out.push(c);
            in_invalid_run = false;
        }
    }

    if suffix_start < name.len() {
        out.push_str(replacement);
    }
    out
}
