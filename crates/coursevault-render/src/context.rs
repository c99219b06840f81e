//! Where a document sits, for resolving the references inside it.

use crate::urls;
use coursevault_core::prelude::*;
use coursevault_index::{CourseIndex, LoadedDocument, PathResolver, page_url};
use std::path::Path;

/// Per-document rendering context.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub index: &'a CourseIndex,
    pub course_slug: &'a str,
    /// Absolute course directory
    pub course_root: &'a Path,
    /// Absolute folder of the document being rendered
    pub current_dir: &'a Path,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        config: &'a SiteConfig,
        index: &'a CourseIndex,
        course_slug: &'a str,
        course_root: &'a Path,
        current_dir: &'a Path,
    ) -> Self {
        Self {
            config,
            index,
            course_slug,
            course_root,
            current_dir,
        }
    }

    /// Context for a document the loader just read.
    pub fn for_document(
        config: &'a SiteConfig,
        index: &'a CourseIndex,
        course_slug: &'a str,
        loaded: &'a LoadedDocument,
    ) -> Self {
        Self::new(
            config,
            index,
            course_slug,
            &loaded.course_root,
            loaded.current_dir(),
        )
    }

    /// Resolver over this course, honouring the configured exclusions.
    pub fn resolver(&self) -> PathResolver<'a> {
        let config: &'a SiteConfig = self.config;
        PathResolver::new(self.course_root).with_exclusions(&config.excluded_names)
    }

    /// File-serving URL for an absolute path inside the course.
    pub fn file_url(&self, path: &Path) -> Option<String> {
        let relative = PathValidator::relative_to(self.course_root, path)?;
        Some(urls::file_url(
            &self.config.files_endpoint,
            self.course_slug,
            &relative,
        ))
    }

    /// Page URL for an absolute path to an indexed document.
    pub fn page_url(&self, path: &Path) -> Option<String> {
        let relative = PathValidator::relative_to(self.course_root, path)?;
        let slug_path = self.index.slug_path_for_file(self.course_slug, &relative)?;
        Some(page_url(self.course_slug, slug_path))
    }
}
