use crate::format::ImageKind;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// What to look for under the source root
#[derive(Debug, Clone)]
pub struct Discovery<'a> {
    pub root: &'a Path,
    pub recursive: bool,
    pub include: &'a BTreeSet<ImageKind>,
    /// Subtree to leave out, typically the output directory.
    pub exclude: Option<PathBuf>,
}

/// Lazily yield every file under `root` whose extension is in the allow-list.
///
/// Entries come in file-name order within each directory. Symlinks are
/// followed. Files with other extensions are dropped silently; unreadable
/// entries and link loops are logged and skipped.
pub fn discover_images<'a>(discovery: Discovery<'a>) -> impl Iterator<Item = PathBuf> + 'a {
    let Discovery {
        root,
        recursive,
        include,
        exclude,
    } = discovery;

    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| !is_excluded(entry, exclude.as_deref()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(move |entry| {
            ImageKind::from_path(entry.path()).is_some_and(|kind| include.contains(&kind))
        })
        .map(|entry| {
            debug!("discovered {}", entry.path().display());
            entry.into_path()
        })
}

fn is_excluded(entry: &DirEntry, exclude: Option<&Path>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .path()
        .canonicalize()
        .is_ok_and(|path| path == exclude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn all_kinds() -> BTreeSet<ImageKind> {
        ImageKind::ALL.into_iter().collect()
    }

    fn names(root: &Path, recursive: bool, include: &BTreeSet<ImageKind>) -> Vec<String> {
        discover_images(Discovery {
            root,
            recursive,
            include,
            exclude: None,
        })
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
    }

    #[test]
    fn non_recursive_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a/one.jpg"));
        touch(&dir.path().join("b/c/two.png"));

        assert!(names(dir.path(), false, &all_kinds()).is_empty());
        assert_eq!(names(dir.path(), true, &all_kinds()), vec!["a/one.jpg", "b/c/two.png"]);
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("A.JPG"));
        touch(&dir.path().join("b.Png"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("noext"));

        assert_eq!(names(dir.path(), false, &all_kinds()), vec!["A.JPG", "b.Png"]);

        let only_png: BTreeSet<_> = [ImageKind::Png].into_iter().collect();
        assert_eq!(names(dir.path(), false, &only_png), vec!["b.Png"]);
    }

    #[test]
    fn top_level_files_found_without_recursion() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.webp"));
        touch(&dir.path().join("sub/deep.webp"));

        assert_eq!(names(dir.path(), false, &all_kinds()), vec!["top.webp"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_images_are_discovered() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(&elsewhere.path().join("real.jpg"));
        std::os::unix::fs::symlink(elsewhere.path().join("real.jpg"), dir.path().join("link.jpg")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), dir.path().join("linked_dir")).unwrap();

        assert_eq!(
            names(dir.path(), true, &all_kinds()),
            vec!["link.jpg", "linked_dir/real.jpg"]
        );
        assert_eq!(names(dir.path(), false, &all_kinds()), vec!["link.jpg"]);
    }

    #[test]
    fn excluded_subtree_is_not_walked() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("keep.gif"));
        touch(&dir.path().join("resized/keep_1280x1280.gif"));

        let include = all_kinds();
        let found: Vec<_> = discover_images(Discovery {
            root: dir.path(),
            recursive: true,
            include: &include,
            exclude: Some(dir.path().join("resized").canonicalize().unwrap()),
        })
        .collect();
        assert_eq!(found, vec![dir.path().join("keep.gif")]);
    }
}
