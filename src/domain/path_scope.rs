//! Tenant path scoping
//!
//! Pure helpers deciding whether a mount path lies inside a tenant's subtree
//! and rewriting paths between absolute and tenant-relative form. Paths are
//! normalized and compared segment by segment, so `/abcd` is never considered
//! to be under `/ab`.

/// Normalize a slash-separated path.
///
/// Backslashes become slashes, repeated separators and `.` segments are dropped,
/// `..` is resolved lexically (never climbing above `/`), the result always has a
/// leading slash and never a trailing one (except the root itself).
pub fn clean_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// True if `path` is `root` itself or a descendant of it.
pub fn is_under_root(path: &str, root: &str) -> bool {
    let path = clean_path(path);
    let root = clean_path(root);

    if root == "/" || path == root {
        return true;
    }

    path.strip_prefix(root.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Strip `root` from `path`. An empty remainder renders as `/`.
///
/// Paths outside `root` are returned normalized but otherwise untouched.
pub fn to_relative(path: &str, root: &str) -> String {
    let path = clean_path(path);
    let root = clean_path(root);

    if root == "/" {
        return path;
    }
    if path == root {
        return "/".to_string();
    }

    match path.strip_prefix(root.as_str()) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path,
    }
}

/// Best-effort absolute form of a tenant-supplied path.
///
/// A path already under `root` is only normalized; anything else is joined
/// onto `root`. The caller must still check the result with [`is_under_root`],
/// since `..` segments can climb out of the subtree.
pub fn to_absolute(path: &str, root: &str) -> String {
    if is_under_root(path, root) {
        return clean_path(path);
    }

    clean_path(&format!("{}/{}", clean_path(root), path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("drive"), "/drive");
        assert_eq!(clean_path("/u1//drive/"), "/u1/drive");
        assert_eq!(clean_path("/u1/./drive"), "/u1/drive");
        assert_eq!(clean_path("/u1/../etc"), "/etc");
        assert_eq!(clean_path("/../../etc"), "/etc");
        assert_eq!(clean_path("\\u1\\drive"), "/u1/drive");
    }

    #[test]
    fn test_is_under_root() {
        assert!(is_under_root("/u1", "/u1"));
        assert!(is_under_root("/u1/drive", "/u1"));
        assert!(is_under_root("/u1/drive/deep", "/u1/"));
        assert!(is_under_root("/anything", "/"));
        assert!(!is_under_root("/u2/drive", "/u1"));
        assert!(!is_under_root("/", "/u1"));
    }

    #[test]
    fn test_sibling_prefix_is_not_under_root() {
        assert!(!is_under_root("/abcd", "/ab"));
        assert!(!is_under_root("/u10/drive", "/u1"));
    }

    #[test]
    fn test_dot_dot_cannot_escape() {
        assert!(!is_under_root("/u1/../u2", "/u1"));
        assert!(!is_under_root(&to_absolute("../u2", "/u1"), "/u1"));
        assert!(!is_under_root(&to_absolute("/../../etc", "/u1"), "/u1"));
    }

    #[test]
    fn test_to_relative() {
        assert_eq!(to_relative("/u1/drive", "/u1"), "/drive");
        assert_eq!(to_relative("/u1", "/u1"), "/");
        assert_eq!(to_relative("/u1/", "/u1"), "/");
        assert_eq!(to_relative("/u1/a/b", "/u1/a"), "/b");
        assert_eq!(to_relative("/drive", "/"), "/drive");
        assert_eq!(to_relative("/u10/drive", "/u1"), "/u10/drive");
    }

    #[test]
    fn test_to_absolute() {
        assert_eq!(to_absolute("/drive", "/u1"), "/u1/drive");
        assert_eq!(to_absolute("drive", "/u1"), "/u1/drive");
        assert_eq!(to_absolute("/", "/u1"), "/u1");
        assert_eq!(to_absolute("/u1/drive", "/u1"), "/u1/drive");
        assert_eq!(to_absolute("/abcd", "/ab"), "/ab/abcd");
    }

    #[test]
    fn test_relative_of_absolute_is_stable() {
        let root = "/u1";
        for path in ["/u1", "/u1/drive", "/u1/a/b/c", "/u1//x/./y"] {
            let once = to_relative(&to_absolute(path, root), root);
            let twice = to_relative(&to_absolute(&to_absolute(path, root), root), root);
            assert_eq!(once, twice);
            assert_eq!(once, to_relative(path, root));
        }
    }

    #[test]
    fn test_relative_round_trip_for_tenant_paths() {
        let root = "/u1";
        for relative in ["/drive", "/a/b", "/"] {
            let absolute = to_absolute(relative, root);
            assert!(is_under_root(&absolute, root));
            assert_eq!(to_relative(&absolute, root), relative);
        }
    }
}
