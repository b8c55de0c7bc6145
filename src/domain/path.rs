//! Path normalization and canonicalization.
//!
//! Canonical paths are absolute strings: runs of separators collapse to
//! one, literal spaces are underscore-encoded for transport, and the root
//! is the single separator. The decoded (human-readable) form is only
//! produced by [`display`] and [`underscores_to_spaces`].

/// Path component separator.
pub const SEPARATOR: char = '/';

/// The root path.
pub const ROOT: &str = "/";

/// Name of the synthetic entry that navigates to the parent directory.
pub const PARENT_DIRECTORY: &str = "..";

/// Encode literal spaces into the transport form.
pub fn spaces_to_underscores(path: &str) -> String {
    path.trim().replace(' ', "_")
}

/// Decode underscore-encoded spaces for presentation.
pub fn underscores_to_spaces(path: &str) -> String {
    path.trim().replace('_', " ")
}

/// Canonicalize a path: collapse separator runs, encode spaces and force
/// a leading separator. Idempotent; an empty input yields [`ROOT`].
pub fn sanitize(path: &str) -> String {
    let mut sanitized = String::with_capacity(path.len() + 1);
    for c in spaces_to_underscores(path).chars() {
        if c == SEPARATOR && sanitized.ends_with(SEPARATOR) {
            continue;
        }
        sanitized.push(c);
    }

    if !sanitized.starts_with(SEPARATOR) {
        sanitized.insert(0, SEPARATOR);
    }

    sanitized
}

/// Append a trailing separator when absent, so directory paths can be
/// told apart from file paths in filter expressions.
pub fn as_directory(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_string()
    } else {
        format!("{}{}", path, SEPARATOR)
    }
}

/// Join segments into a canonical path, skipping empty segments.
pub fn join(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(ROOT);

    sanitize(&joined)
}

/// Non-empty components of a path, in order.
pub fn split(path: &str) -> Vec<String> {
    path.split(SEPARATOR)
        .filter(|component| !component.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decoded form for presentation.
pub fn display(path: &str) -> String {
    underscores_to_spaces(path)
}

/// Canonical path of the containing directory; `None` at the root.
pub fn parent(path: &str) -> Option<String> {
    let path = sanitize(path);
    if path == ROOT {
        return None;
    }

    let index = path.rfind(SEPARATOR)?;
    Some(sanitize(&path[..index]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_collapses_separator_runs() {
        assert_eq!(sanitize("/a//b///c"), "/a/b/c");
        assert_eq!(sanitize("a//b"), "/a/b");
    }

    #[test]
    fn test_sanitize_prefixes_separator() {
        assert_eq!(sanitize("a/b"), "/a/b");
        assert!(sanitize("whatever").starts_with(SEPARATOR));
    }

    #[test]
    fn test_sanitize_empty_is_root() {
        assert_eq!(sanitize(""), ROOT);
        assert_eq!(sanitize("   "), ROOT);
    }

    #[test]
    fn test_sanitize_encodes_spaces() {
        assert_eq!(sanitize("/my folder/a file"), "/my_folder/a_file");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for path in ["", "/", "a b//c", "/already/canonical", "  /x y/ "] {
            let once = sanitize(path);
            assert_eq!(sanitize(&once), once, "sanitize not idempotent for {:?}", path);
        }
    }

    #[test]
    fn test_sanitize_keeps_trailing_separator_off_non_root() {
        // Trailing separators are only added by as_directory.
        assert_eq!(sanitize("/a/b"), "/a/b");
        assert_eq!(as_directory("/a/b"), "/a/b/");
        assert_eq!(as_directory("/a/b/"), "/a/b/");
        assert_eq!(as_directory(ROOT), "/");
    }

    #[test]
    fn test_join_skips_empty_segments() {
        assert_eq!(join(&["", "a", "", "b"]), "/a/b");
        assert_eq!(join(&["/a", "b c"]), "/a/b_c");
        assert_eq!(join(&[]), ROOT);
    }

    #[test]
    fn test_split_returns_non_empty_components() {
        assert_eq!(split("/a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(split("//a//b/"), vec!["a", "b"]);
        assert!(split(ROOT).is_empty());
    }

    #[test]
    fn test_display_decodes_underscores() {
        assert_eq!(display("/my_folder/a_file"), "/my folder/a file");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/a/b/c"), Some("/a/b".to_string()));
        assert_eq!(parent("/a"), Some(ROOT.to_string()));
        assert_eq!(parent(ROOT), None);
    }
}
