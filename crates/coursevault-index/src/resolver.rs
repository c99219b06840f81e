//! Reference resolution against a course tree.
//!
//! Authors write Obsidian-style references without full paths, so lookup is
//! best-effort and prefers nearby files:
//!
//! 1. `index.md` from the course root maps straight to the root index.
//! 2. `./x` and `../x` resolve strictly against the current folder.
//! 3. Otherwise the current folder, then each ancestor up to the course root.
//! 4. Finally a depth-first scan of the whole course for a regular file with
//!    exactly the same base name.
//!
//! Only regular files ever satisfy a reference.

use coursevault_core::prelude::*;
use coursevault_core::slug::is_index_name;
use coursevault_parser::is_explicit_relative;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Resolves references inside one course.
pub struct PathResolver<'a> {
    course_root: &'a Path,
    excluded: Option<&'a HashSet<String>>,
}

impl<'a> PathResolver<'a> {
    pub fn new(course_root: &'a Path) -> Self {
        Self {
            course_root,
            excluded: None,
        }
    }

    /// Skip these entry names during the full-course scan.
    pub fn with_exclusions(mut self, excluded: &'a HashSet<String>) -> Self {
        self.excluded = Some(excluded);
        self
    }

    pub fn course_root(&self) -> &Path {
        self.course_root
    }

    /// Resolve `reference` as written, detecting `./` and `../` itself.
    pub fn resolve(&self, reference: &str, current_dir: &Path) -> ResolvedReference {
        self.resolve_with(reference, current_dir, is_explicit_relative(reference))
    }

    /// Attachments are searched course-wide, never relative to the document.
    pub fn resolve_attachment(&self, reference: &str) -> ResolvedReference {
        self.resolve_with(reference, self.course_root, false)
    }

    /// Resolve with an explicit relative flag.
    pub fn resolve_with(
        &self,
        reference: &str,
        current_dir: &Path,
        explicit_relative: bool,
    ) -> ResolvedReference {
        let reference = reference.trim();
        let file_name = base_name(reference).to_string();

        if reference.is_empty() || file_name.is_empty() {
            return ResolvedReference::not_found(file_name);
        }

        let found = if explicit_relative {
            self.resolve_relative(reference, current_dir)
        } else if current_dir == self.course_root
            && reference == file_name
            && is_index_name(reference)
        {
            let candidate = self.course_root.join(reference);
            candidate.is_file().then_some(candidate)
        } else {
            let reference = reference.trim_start_matches('/');
            self.search_upward(reference, current_dir)
                .or_else(|| self.search_course(&file_name))
        };

        match found {
            Some(path) => ResolvedReference::found(path, file_name),
            None => {
                log::debug!(
                    "Unresolved reference {:?} from {}",
                    reference,
                    current_dir.display()
                );
                ResolvedReference::not_found(file_name)
            }
        }
    }

    /// `./` and `../` against `current_dir`, clamped to the course root.
    fn resolve_relative(&self, reference: &str, current_dir: &Path) -> Option<PathBuf> {
        match PathValidator::resolve_within(self.course_root, current_dir, Path::new(reference)) {
            Ok(candidate) => candidate.is_file().then_some(candidate),
            Err(e) => {
                log::debug!("Relative reference {:?} rejected: {}", reference, e);
                None
            }
        }
    }

    /// `dir/reference` for `current_dir` and each ancestor up to the root.
    fn search_upward(&self, reference: &str, current_dir: &Path) -> Option<PathBuf> {
        let relative = Path::new(reference);
        let mut dir = current_dir;

        loop {
            if let Ok(candidate) = PathValidator::resolve_within(self.course_root, dir, relative)
                && candidate.is_file()
            {
                return Some(candidate);
            }

            if dir == self.course_root {
                return None;
            }
            dir = match dir.parent() {
                Some(parent) if parent.starts_with(self.course_root) => parent,
                _ => return None,
            };
        }
    }

    /// First regular file named `file_name`, depth-first in name order.
    #[instrument(skip(self), fields(root = %self.course_root.display()), name = "resolve_full_scan")]
    fn search_course(&self, file_name: &str) -> Option<PathBuf> {
        log::debug!("Falling back to course-wide search for {:?}", file_name);

        WalkDir::new(self.course_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| self.excluded.is_some_and(|ex| ex.contains(name)))
            })
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
            .map(|entry| entry.into_path())
    }
}

/// Last `/`-separated segment of a reference.
fn base_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn course() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "index.md");
        write(root, "attachments/image.png");
        write(root, "Week 1/Day 1/lesson.md");
        write(root, "Week 1/Day 1/local.png");
        write(root, "Week 1/shared.md");
        write(root, "Week 2/deep/moved.md");
        write(root, "Week 2/lesson.md");
        fs::create_dir_all(root.join("Week 2/dironly.md")).unwrap();
        temp
    }

    #[test]
    fn test_same_folder_fast_path() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);
        let day = root.join("Week 1/Day 1");

        let hit = resolver.resolve("local.png", &day);
        assert_eq!(hit.path(), Some(day.join("local.png").as_path()));
        assert_eq!(hit.file_name, "local.png");
    }

    #[test]
    fn test_upward_search() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);
        let day = root.join("Week 1/Day 1");

        let hit = resolver.resolve("shared.md", &day);
        assert_eq!(hit.path(), Some(root.join("Week 1/shared.md").as_path()));

        let hit = resolver.resolve("index.md", &day);
        assert_eq!(hit.path(), Some(root.join("index.md").as_path()));
    }

    #[test]
    fn test_nearest_wins_over_full_scan() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);

        let hit = resolver.resolve("lesson.md", &root.join("Week 2"));
        assert_eq!(hit.path(), Some(root.join("Week 2/lesson.md").as_path()));

        // From the root, the depth-first scan reaches Week 1 first
        let hit = resolver.resolve("lesson.md", root);
        assert_eq!(hit.path(), Some(root.join("Week 1/Day 1/lesson.md").as_path()));
    }

    #[test]
    fn test_full_scan_fallback() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);

        let hit = resolver.resolve("moved.md", &root.join("Week 1"));
        assert_eq!(hit.path(), Some(root.join("Week 2/deep/moved.md").as_path()));

        let hit = resolver.resolve_attachment("image.png");
        assert_eq!(hit.path(), Some(root.join("attachments/image.png").as_path()));
    }

    #[test]
    fn test_full_scan_is_case_sensitive_and_files_only() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);

        assert!(!resolver.resolve("IMAGE.png", root).is_found());
        assert!(!resolver.resolve("dironly.md", root).is_found());
    }

    #[test]
    fn test_explicit_relative_is_strict() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);
        let day = root.join("Week 1/Day 1");

        let hit = resolver.resolve("./local.png", &day);
        assert_eq!(hit.path(), Some(day.join("local.png").as_path()));

        let hit = resolver.resolve("../shared.md", &day);
        assert_eq!(hit.path(), Some(root.join("Week 1/shared.md").as_path()));

        // Exists elsewhere, but explicit-relative never searches
        assert!(!resolver.resolve("./shared.md", &day).is_found());
    }

    #[test]
    fn test_relative_cannot_escape_course() {
        let temp = course();
        let root = temp.path().join("Week 1");
        let resolver = PathResolver::new(&root);
        assert!(!resolver.resolve("../index.md", &root).is_found());
        assert!(!resolver.resolve("../../etc/passwd", &root).is_found());
    }

    #[test]
    fn test_root_index_special_case() {
        let temp = course();
        let root = temp.path();
        let resolver = PathResolver::new(root);
        let hit = resolver.resolve("index.md", root);
        assert_eq!(hit.path(), Some(root.join("index.md").as_path()));
    }

    #[test]
    fn test_missing() {
        let temp = course();
        let resolver = PathResolver::new(temp.path());
        let miss = resolver.resolve("missing.md", temp.path());
        assert!(!miss.is_found());
        assert_eq!(miss.file_name, "missing.md");
        assert!(!resolver.resolve("", temp.path()).is_found());
    }

    #[test]
    fn test_exclusions_skip_folders() {
        let temp = course();
        let root = temp.path();
        write(root, ".trash/gone.md");

        let excluded: HashSet<String> = [".trash".to_string()].into_iter().collect();
        let resolver = PathResolver::new(root).with_exclusions(&excluded);
        assert!(!resolver.resolve("gone.md", root).is_found());
        assert!(PathResolver::new(root).resolve("gone.md", root).is_found());
    }
}
