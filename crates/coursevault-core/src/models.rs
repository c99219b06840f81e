//! Core data models for courses, topics and rendered documents.
//!
//! These types are designed to be:
//! - **Serializable**: The index serializes with the camelCase field names the
//!   navigation UI consumes (`slugPath`, `originalFileName`, ...)
//! - **Immutable once built**: the index builder returns finished values and
//!   nothing mutates them afterwards
//! - **Cheap to share**: the whole index lives behind an `Arc`

use crate::slug::is_index_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One file or folder under a course root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// URL-safe identifier, unique among siblings
    pub slug: String,
    /// Front-matter title, folder index title, or the bare name
    pub title: String,
    /// Literal filesystem entry name
    pub original_file_name: String,
    /// Path relative to the course root
    pub full_path: PathBuf,
    /// `/`-joined slug chain from the course root, unique within the course
    pub slug_path: String,
    pub is_folder: bool,
    /// Folders only: an `index` document sits directly inside
    #[serde(default)]
    pub has_index: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_topics: Vec<Topic>,
}

impl Topic {
    /// True for Markdown documents
    pub fn is_file(&self) -> bool {
        !self.is_folder
    }

    /// Whether this is a document whose file name normalizes to `index`.
    ///
    /// Decided by name, not slug: a sibling folder may have claimed the bare
    /// `index` slug first.
    pub fn is_index_document(&self) -> bool {
        self.is_file() && is_index_name(&self.original_file_name)
    }

    /// Index document directly inside this folder
    pub fn index_document(&self) -> Option<&Topic> {
        self.sub_topics.iter().find(|t| t.is_index_document())
    }

    /// Pre-order walk over this topic and all its descendants
    pub fn walk(&self) -> TopicWalk<'_> {
        TopicWalk { stack: vec![self] }
    }
}

/// One top-level directory under the courses root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub slug: String,
    /// On-disk directory name
    pub original_name: String,
    pub title: String,
    pub has_index: bool,
    pub topics: Vec<Topic>,
}

impl Course {
    /// Pre-order walk over every topic of the course, in display order
    pub fn walk(&self) -> TopicWalk<'_> {
        TopicWalk {
            stack: self.topics.iter().rev().collect(),
        }
    }

    /// Index document at the course root
    pub fn index_document(&self) -> Option<&Topic> {
        self.topics.iter().find(|t| t.is_index_document())
    }

    /// Number of documents (non-folder topics) in the course
    pub fn document_count(&self) -> usize {
        self.walk().filter(|t| t.is_file()).count()
    }
}

/// Depth-first, pre-order iterator over a topic tree.
///
/// Uses an explicit stack so arbitrarily deep course trees never recurse.
pub struct TopicWalk<'a> {
    stack: Vec<&'a Topic>,
}

impl<'a> Iterator for TopicWalk<'a> {
    type Item = &'a Topic;

    fn next(&mut self) -> Option<Self::Item> {
        let topic = self.stack.pop()?;
        self.stack.extend(topic.sub_topics.iter().rev());
        Some(topic)
    }
}

/// Front-matter key/value metadata.
///
/// Scalar values are kept as written; sequences are joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    pub data: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Non-empty `title` value, trimmed
    pub fn title(&self) -> Option<&str> {
        self.get("title").map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A loaded document: metadata block plus Markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub metadata: Frontmatter,
    pub body: String,
}

/// A table-of-contents entry taken from a rendered heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub title: String,
    /// Anchor id the renderer put on the heading element
    pub id: String,
    /// Heading depth, 1-6
    pub level: u8,
}

impl TocItem {
    pub fn new(title: impl Into<String>, id: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            level,
        }
    }
}

/// Outcome of resolving a reference against a course tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Absolute path of the target, `None` when nothing matched
    pub file_path: Option<PathBuf>,
    /// Base file name that was looked up
    pub file_name: String,
}

impl ResolvedReference {
    pub fn found(path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            file_name: file_name.into(),
        }
    }

    pub fn not_found(file_name: impl Into<String>) -> Self {
        Self {
            file_path: None,
            file_name: file_name.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

/// How an attachment reference is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// Embedded inline as an image
    Image,
    /// Linked for download/viewing (PDF and friends)
    Document,
}

/// Final output of the rendering pipeline for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub html: String,
    pub toc: Vec<TocItem>,
    /// Reference targets that could not be resolved, in document order
    pub unresolved: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(slug: &str, slug_path: &str, is_folder: bool, children: Vec<Topic>) -> Topic {
        Topic {
            slug: slug.to_string(),
            title: slug.to_string(),
            original_file_name: slug.to_string(),
            full_path: PathBuf::from(slug_path),
            slug_path: slug_path.to_string(),
            is_folder,
            has_index: false,
            sub_topics: children,
        }
    }

    #[test]
    fn test_course_walk_is_preorder() {
        let course = Course {
            slug: "c".to_string(),
            original_name: "C".to_string(),
            title: "C".to_string(),
            has_index: false,
            topics: vec![
                topic(
                    "a",
                    "a",
                    true,
                    vec![topic("x", "a/x", false, vec![]), topic("y", "a/y", false, vec![])],
                ),
                topic("b", "b", false, vec![]),
            ],
        };

        let order: Vec<&str> = course.walk().map(|t| t.slug_path.as_str()).collect();
        assert_eq!(order, vec!["a", "a/x", "a/y", "b"]);
        assert_eq!(course.document_count(), 3);
    }

    #[test]
    fn test_index_document_found_by_file_name() {
        let mut folder = topic("index", "index", true, vec![]);
        folder.original_file_name = "Index".to_string();
        let mut doc = topic("index-file", "index-file", false, vec![]);
        doc.original_file_name = "index.md".to_string();
        let course = Course {
            slug: "go".to_string(),
            original_name: "Go".to_string(),
            title: "Go".to_string(),
            has_index: true,
            topics: vec![folder, doc],
        };

        assert!(!course.topics[0].is_index_document());
        assert_eq!(course.index_document().map(|t| t.slug.as_str()), Some("index-file"));
    }

    #[test]
    fn test_topic_serializes_camel_case() {
        let t = topic("intro", "intro", false, vec![]);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["slugPath"], "intro");
        assert_eq!(json["originalFileName"], "intro");
        assert_eq!(json["isFolder"], false);
        assert!(json.get("subTopics").is_none());
    }

    #[test]
    fn test_frontmatter_title() {
        let mut fm = Frontmatter::default();
        assert_eq!(fm.title(), None);
        fm.data.insert("title".to_string(), "   ".to_string());
        assert_eq!(fm.title(), None);
        fm.data.insert("title".to_string(), " Ownership ".to_string());
        assert_eq!(fm.title(), Some("Ownership"));
    }

    #[test]
    fn test_resolved_reference() {
        let hit = ResolvedReference::found("/c/a.png", "a.png");
        assert!(hit.is_found());
        assert_eq!(hit.path(), Some(Path::new("/c/a.png")));
        assert!(!ResolvedReference::not_found("b.png").is_found());
    }
}
