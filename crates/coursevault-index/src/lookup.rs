//! Queries over a built index: slug to course, slug path to topic, file to
//! slug path. These back the page route and the navigation collaborator.

use crate::cache::CourseIndex;
use coursevault_core::prelude::*;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Normalize a requested slug path: decode, trim slashes, drop a trailing
/// `index` segment.
///
/// `"week-1/index"` and `"week-1/"` both become `"week-1"`; `"index"` and
/// `""` become `""` (the course itself).
pub fn clean_slug_path(slug_path: &str) -> String {
    let decoded = percent_decode_str(slug_path).decode_utf8_lossy();
    let trimmed = decoded.trim_matches('/');
    let without_index = if trimmed == "index" {
        ""
    } else {
        trimmed.strip_suffix("/index").unwrap_or(trimmed)
    };
    without_index.to_string()
}

impl CourseIndex {
    pub fn course(&self, slug: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.slug == slug)
    }

    /// On-disk directory name of a course.
    pub fn original_course_name(&self, slug: &str) -> Option<&str> {
        self.course(slug).map(|c| c.original_name.as_str())
    }

    /// Absolute directory of a course.
    pub fn course_dir(&self, config: &SiteConfig, slug: &str) -> Result<PathBuf> {
        self.original_course_name(slug)
            .map(|name| config.course_dir(name))
            .ok_or_else(|| Error::course_not_found(slug))
    }

    /// Topic whose slug path equals `slug_path` exactly (after decoding).
    pub fn find_topic(&self, course_slug: &str, slug_path: &str) -> Option<&Topic> {
        let decoded = percent_decode_str(slug_path).decode_utf8_lossy();
        let wanted = decoded.trim_matches('/');
        self.course(course_slug)?
            .walk()
            .find(|t| t.slug_path == wanted)
    }

    /// Document to show for a page request, as a path relative to the course.
    ///
    /// Folders map to their index document; folders without one, and
    /// unknown paths, yield `None`. An empty path means the course index.
    /// A trailing `index` segment is folded into its folder only when no
    /// topic owns that exact slug path.
    pub fn topic_file_name(&self, course_slug: &str, slug_path: &str) -> Option<PathBuf> {
        let course = self.course(course_slug)?;
        let decoded = percent_decode_str(slug_path).decode_utf8_lossy();
        let wanted = decoded.trim_matches('/');

        let topic = if wanted.is_empty() {
            None
        } else if let Some(topic) = course.walk().find(|t| t.slug_path == wanted) {
            Some(topic)
        } else {
            let folded = clean_slug_path(wanted);
            if folded == wanted {
                return None;
            }
            if folded.is_empty() {
                None
            } else {
                Some(course.walk().find(|t| t.slug_path == folded)?)
            }
        };

        let document = match topic {
            None => course.index_document()?,
            Some(topic) if topic.is_file() => topic,
            Some(topic) if topic.has_index => topic.index_document()?,
            Some(_) => return None,
        };
        Some(document.full_path.clone())
    }

    /// Slug path of the document at `rel_path` (relative to the course root).
    ///
    /// Matched on the exact relative path, so same-named files in different
    /// folders stay distinct.
    pub fn slug_path_for_file(&self, course_slug: &str, rel_path: &Path) -> Option<&str> {
        self.course(course_slug)?
            .walk()
            .find(|t| t.is_file() && t.full_path == rel_path)
            .map(|t| t.slug_path.as_str())
    }

    /// Total documents across all courses.
    pub fn document_count(&self) -> usize {
        self.courses.iter().map(Course::document_count).sum()
    }
}

/// Page URL for a slug path: `/{course}/{slug_path}`, with a trailing `index`
/// segment folded into its folder.
pub fn page_url(course_slug: &str, slug_path: &str) -> String {
    let cleaned = clean_slug_path(slug_path);
    if cleaned.is_empty() {
        format!("/{}", course_slug)
    } else {
        format!("/{}/{}", course_slug, cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TreeState;

    fn doc(slug: &str, slug_path: &str, full: &str) -> Topic {
        Topic {
            slug: slug.to_string(),
            title: slug.to_string(),
            original_file_name: Path::new(full)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned(),
            full_path: PathBuf::from(full),
            slug_path: slug_path.to_string(),
            is_folder: false,
            has_index: false,
            sub_topics: Vec::new(),
        }
    }

    fn folder(slug: &str, full: &str, has_index: bool, children: Vec<Topic>) -> Topic {
        Topic {
            slug: slug.to_string(),
            title: slug.to_string(),
            original_file_name: full.to_string(),
            full_path: PathBuf::from(full),
            slug_path: slug.to_string(),
            is_folder: true,
            has_index,
            sub_topics: children,
        }
    }

    fn index() -> CourseIndex {
        let course = Course {
            slug: "rust".to_string(),
            original_name: "Rust Course".to_string(),
            title: "Rust".to_string(),
            has_index: true,
            topics: vec![
                doc("index", "index", "index.md"),
                folder(
                    "week-1",
                    "Week 1",
                    true,
                    vec![
                        doc("index", "week-1/index", "Week 1/index.md"),
                        doc("notes", "week-1/notes", "Week 1/Notes.md"),
                    ],
                ),
                folder(
                    "week-2",
                    "Week 2",
                    false,
                    vec![doc("notes", "week-2/notes", "Week 2/Notes.md")],
                ),
            ],
        };
        CourseIndex::new(
            vec![course],
            TreeState {
                last_modified: None,
                fingerprint: String::new(),
            },
        )
    }

    #[test]
    fn test_clean_slug_path() {
        assert_eq!(clean_slug_path("week-1/index"), "week-1");
        assert_eq!(clean_slug_path("/week-1/"), "week-1");
        assert_eq!(clean_slug_path("index"), "");
        assert_eq!(clean_slug_path(""), "");
        assert_eq!(clean_slug_path("a%2Fb"), "a/b");
        assert_eq!(clean_slug_path("reindex"), "reindex");
    }

    #[test]
    fn test_course_lookup() {
        let index = index();
        assert_eq!(index.original_course_name("rust"), Some("Rust Course"));
        assert!(index.course("go").is_none());

        let config = SiteConfig {
            courses_root: PathBuf::from("/srv/courses"),
            ..SiteConfig::default()
        };
        assert_eq!(
            index.course_dir(&config, "rust").unwrap(),
            PathBuf::from("/srv/courses/Rust Course")
        );
        assert!(index.course_dir(&config, "go").unwrap_err().is_not_found());
    }

    #[test]
    fn test_topic_file_name() {
        let index = index();
        assert_eq!(index.topic_file_name("rust", ""), Some(PathBuf::from("index.md")));
        assert_eq!(
            index.topic_file_name("rust", "week-1"),
            Some(PathBuf::from("Week 1/index.md"))
        );
        assert_eq!(
            index.topic_file_name("rust", "week-1/index"),
            Some(PathBuf::from("Week 1/index.md"))
        );
        assert_eq!(
            index.topic_file_name("rust", "week-2/notes"),
            Some(PathBuf::from("Week 2/Notes.md"))
        );
        assert_eq!(index.topic_file_name("rust", "week-2"), None);
        assert_eq!(index.topic_file_name("rust", "nope"), None);
        assert_eq!(index.topic_file_name("go", "week-1"), None);
    }

    #[test]
    fn test_index_folder_does_not_shadow_index_document() {
        let index_folder = folder(
            "index",
            "Index",
            false,
            vec![doc("a", "index/a", "Index/a.md")],
        );
        let mut week_index_folder = folder(
            "index",
            "Week/Index",
            false,
            vec![doc("b", "week/index/b", "Week/Index/b.md")],
        );
        week_index_folder.slug_path = "week/index".to_string();
        let mut week = folder(
            "week",
            "Week",
            true,
            vec![week_index_folder, doc("index-file", "week/index-file", "Week/index.md")],
        );
        week.slug_path = "week".to_string();
        let course = Course {
            slug: "go".to_string(),
            original_name: "Go".to_string(),
            title: "Go".to_string(),
            has_index: true,
            topics: vec![
                index_folder,
                doc("index-file", "index-file", "index.md"),
                week,
            ],
        };
        let index = CourseIndex::new(
            vec![course],
            TreeState {
                last_modified: None,
                fingerprint: String::new(),
            },
        );

        assert_eq!(index.topic_file_name("go", ""), Some(PathBuf::from("index.md")));
        assert_eq!(
            index.topic_file_name("go", "week"),
            Some(PathBuf::from("Week/index.md"))
        );
        // Folders slugged `index` stay reachable and are not folded away
        assert_eq!(index.topic_file_name("go", "index"), None);
        assert_eq!(
            index.topic_file_name("go", "index/a"),
            Some(PathBuf::from("Index/a.md"))
        );
        assert_eq!(index.topic_file_name("go", "week/index"), None);
        assert_eq!(
            index.topic_file_name("go", "week/index/b"),
            Some(PathBuf::from("Week/Index/b.md"))
        );
    }

    #[test]
    fn test_slug_path_for_same_named_files() {
        let index = index();
        assert_eq!(
            index.slug_path_for_file("rust", Path::new("Week 1/Notes.md")),
            Some("week-1/notes")
        );
        assert_eq!(
            index.slug_path_for_file("rust", Path::new("Week 2/Notes.md")),
            Some("week-2/notes")
        );
        assert_eq!(index.slug_path_for_file("rust", Path::new("Notes.md")), None);
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("rust", "week-1/notes"), "/rust/week-1/notes");
        assert_eq!(page_url("rust", "week-1/index"), "/rust/week-1");
        assert_eq!(page_url("rust", "index"), "/rust");
    }

    #[test]
    fn test_find_topic_decodes() {
        let index = index();
        assert!(index.find_topic("rust", "week-1%2Fnotes").is_some());
        assert!(index.find_topic("rust", "week-3").is_none());
        assert_eq!(index.document_count(), 4);
    }
}
