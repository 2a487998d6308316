//! Separator-agnostic path normalization
//!
//! Source paths reach the tooling from editors on every platform, so
//! back-slashes are always treated as directory separators and `.`/`..`
//! segments are resolved lexically before any relative-path computation.
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Rewrite back-slash separators to forward slashes.
pub fn normalize_separators(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) if s.contains('\\') => PathBuf::from(s.replace('\\', "/")),
        _ => path.to_path_buf(),
    }
}

/// Normalize separators and resolve `.`/`..` segments lexically.
///
/// A `..` that would climb above the root of an absolute path is dropped;
/// leading `..` segments of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let path = normalize_separators(path);
    let mut result = PathBuf::new();
    // Number of normal segments that a following `..` may pop
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    result.pop();
                    depth -= 1;
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            Component::Normal(segment) => {
                result.push(segment);
                depth += 1;
            }
            Component::Prefix(_) | Component::RootDir => result.push(component.as_os_str()),
        }
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Path of `to` relative to the directory `from`, both normalized first.
///
/// Returns `None` when no relative path exists, e.g. the two paths live on
/// different drives or only one of them is absolute.
pub fn relative_path(from: &Path, to: &Path) -> Option<PathBuf> {
    let from = normalize_path(from);
    let to = normalize_path(to);

    if from.is_absolute() != to.is_absolute() || prefix_of(&from) != prefix_of(&to) {
        return None;
    }

    // An empty result means `to` is `from` itself
    pathdiff::diff_paths(&to, &from)
}

fn prefix_of(path: &Path) -> Option<Component<'_>> {
    match path.components().next() {
        Some(prefix @ Component::Prefix(_)) => Some(prefix),
        _ => None,
    }
}

/// True when a relative path climbs out of its base (`..` first) or is not
/// relative at all.
pub fn is_parent_relative(relative: &Path) -> bool {
    relative.is_absolute() || matches!(relative.components().next(), Some(Component::ParentDir))
}

/// True when `path` is `root` itself or lies beneath it.
pub fn is_within(root: &Path, path: &Path) -> bool {
    relative_path(root, path).is_some_and(|rel| !is_parent_relative(&rel))
}

/// Join `path` onto `base` unless it is already absolute, then normalize.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    let path = normalize_separators(path);
    if path.is_absolute() {
        normalize_path(&path)
    } else {
        normalize_path(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_resolves_dot_segments() {
        assert_eq!(
            normalize_path(Path::new("/proj/src/./Shared/../Client/A.ts")),
            PathBuf::from("/proj/src/Client/A.ts")
        );
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_normalize_treats_backslash_as_separator() {
        assert_eq!(
            normalize_path(Path::new("/proj\\src\\Shared\\Foo.ts")),
            PathBuf::from("/proj/src/Shared/Foo.ts")
        );
    }

    #[test]
    fn test_relative_path_inside_and_outside() {
        assert_eq!(
            relative_path(Path::new("/proj/src"), Path::new("/proj/src/Shared/Foo.ts")),
            Some(PathBuf::from("Shared/Foo.ts"))
        );
        let outside =
            relative_path(Path::new("/proj/src"), Path::new("/proj/lib/Foo.ts")).unwrap();
        assert!(is_parent_relative(&outside));
        assert_eq!(
            relative_path(Path::new("/proj/src"), Path::new("/proj/src")),
            Some(PathBuf::new())
        );
    }

    #[test]
    fn test_relative_path_requires_matching_kinds() {
        assert_eq!(relative_path(Path::new("/proj"), Path::new("src/a.ts")), None);
    }

    #[test]
    fn test_hidden_directories_are_not_parent_relative() {
        // ".hidden" starts with a dot but does not climb out of the root
        assert!(is_within(Path::new("/proj/src"), Path::new("/proj/src/.hidden/a.ts")));
        assert!(!is_within(Path::new("/proj/src"), Path::new("/proj/srcfoo/a.ts")));
    }

    #[test]
    fn test_resolve_against() {
        assert_eq!(
            resolve_against(Path::new("/proj"), Path::new("src/../out")),
            PathBuf::from("/proj/out")
        );
        assert_eq!(
            resolve_against(Path::new("/proj"), Path::new("/elsewhere/out")),
            PathBuf::from("/elsewhere/out")
        );
    }
}
