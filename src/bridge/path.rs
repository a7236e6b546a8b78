//! Local-file URL normalization.

/// Scheme prefix for local-file URLs.
pub const FILE_SCHEME: &str = "file://";

/// Convert a raw filesystem path into a well-formed local-file URL.
///
/// Backslash separators become forward slashes; a path that already
/// carries the scheme passes through unchanged; drive-letter paths get a
/// leading slash after the scheme so `C:/...` becomes `file:///C:/...`.
/// Idempotent: normalizing a normalized path returns it unchanged.
pub fn to_file_url(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if normalized.starts_with(FILE_SCHEME) {
        return normalized;
    }
    if has_drive_letter(&normalized) {
        return format!("{FILE_SCHEME}/{normalized}");
    }
    format!("{FILE_SCHEME}{normalized}")
}

/// `X:` prefix, either case.
fn has_drive_letter(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
