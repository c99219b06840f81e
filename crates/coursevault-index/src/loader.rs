//! Document loading: course slug plus relative path to metadata and body.

use crate::cache::CourseIndex;
use coursevault_core::prelude::*;
use coursevault_core::slug::strip_markdown_extension;
use coursevault_parser::parse_document_lenient;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// A document read from disk, with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Absolute path of the file that was read
    pub path: PathBuf,
    /// Path relative to the course root
    pub relative_path: PathBuf,
    /// Absolute course directory
    pub course_root: PathBuf,
    pub document: Document,
}

impl LoadedDocument {
    /// Folder the document lives in; relative references start here.
    pub fn current_dir(&self) -> &Path {
        self.path.parent().unwrap_or(self.course_root.as_path())
    }

    /// File name without `.md`.
    pub fn stem(&self) -> Option<&str> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(strip_markdown_extension)
    }
}

/// Reads course documents.
pub struct DocumentLoader {
    config: Arc<SiteConfig>,
}

impl DocumentLoader {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        Self { config }
    }

    /// Load `relative_path` from the course with slug `course_slug`.
    ///
    /// `.md` is appended when missing. Directories and missing files are
    /// not-found errors; malformed front-matter degrades to empty metadata.
    #[instrument(skip(self, index), fields(course = course_slug, file = ?relative_path), name = "document_load")]
    pub fn load(
        &self,
        index: &CourseIndex,
        course_slug: &str,
        relative_path: &Path,
    ) -> Result<LoadedDocument> {
        let course_root = index.course_dir(&self.config, course_slug)?;
        let relative_path = with_markdown_extension(relative_path);
        let path = PathValidator::join_within(&course_root, &relative_path)?;

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::file_not_found(&path));
            }
            Err(e) => return Err(Error::io(e)),
        };
        if metadata.is_dir() {
            return Err(Error::is_directory(&path));
        }
        if metadata.len() > self.config.max_file_size {
            return Err(Error::file_too_large(
                &path,
                metadata.len(),
                self.config.max_file_size,
            ));
        }

        let content = fs::read_to_string(&path).map_err(Error::io)?;
        let document = parse_document_lenient(&content, &path);
        log::debug!(
            "Loaded {} ({} metadata keys, {} body bytes)",
            path.display(),
            document.metadata.data.len(),
            document.body.len()
        );

        Ok(LoadedDocument {
            relative_path: PathValidator::relative_to(&course_root, &path)
                .unwrap_or(relative_path),
            path,
            course_root,
            document,
        })
    }
}

fn with_markdown_extension(path: &Path) -> PathBuf {
    let is_markdown = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| strip_markdown_extension(n).len() != n.len());

    if is_markdown {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".md");
        PathBuf::from(name)
    }
}
