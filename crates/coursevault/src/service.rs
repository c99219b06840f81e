//! The page pipeline behind the HTTP surface.
//!
//! `CourseService` owns the index cache and wires loader, resolver and
//! renderer together. Every method is synchronous and blocking; the server
//! calls them from `spawn_blocking`.

use coursevault_core::prelude::*;
use coursevault_core::content_type_for;
use coursevault_index::{CourseIndex, DocumentLoader, IndexCache, PathResolver};
use coursevault_render::{MarkdownRenderer, RenderContext};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// A rendered page plus what the page shell needs around it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub course_slug: String,
    pub course_title: String,
    pub title: String,
    pub html: String,
    pub toc: Vec<TocItem>,
    pub metadata: Frontmatter,
    pub unresolved: Vec<String>,
}

/// A file located for the file-serving endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFile {
    pub path: PathBuf,
    pub content_type: &'static str,
}

/// Course pages and files for one courses root.
pub struct CourseService {
    config: Arc<SiteConfig>,
    cache: IndexCache,
    loader: DocumentLoader,
    renderer: MarkdownRenderer,
}

impl CourseService {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        let cache = IndexCache::for_config(Arc::clone(&config));
        Self::with_cache(config, cache)
    }

    /// Use a prepared cache (tests inject probes and sources this way).
    pub fn with_cache(config: Arc<SiteConfig>, cache: IndexCache) -> Self {
        Self {
            loader: DocumentLoader::new(Arc::clone(&config)),
            renderer: MarkdownRenderer::new(),
            config,
            cache,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Current index, rebuilt first if the tree changed.
    pub fn index(&self) -> Result<Arc<CourseIndex>> {
        self.cache.get()
    }

    /// Every course with its topic tree, for navigation.
    pub fn courses_structure(&self) -> Result<Vec<Course>> {
        Ok(self.cache.get()?.courses.clone())
    }

    /// Document shown for a slug path, relative to its course.
    pub fn topic_file_name(&self, course_slug: &str, slug_path: &str) -> Result<Option<PathBuf>> {
        Ok(self.cache.get()?.topic_file_name(course_slug, slug_path))
    }

    /// Load and render the page at `slug_path` (empty for the course index).
    #[instrument(skip(self), name = "render_page")]
    pub fn render_page(&self, course_slug: &str, slug_path: &str) -> Result<RenderedPage> {
        let index = self.cache.get()?;
        let course = index
            .course(course_slug)
            .ok_or_else(|| Error::course_not_found(course_slug))?;
        let file = index
            .topic_file_name(course_slug, slug_path)
            .ok_or_else(|| Error::topic_not_found(course_slug, slug_path))?;

        let loaded = self.loader.load(&index, course_slug, &file)?;
        let ctx = RenderContext::for_document(&self.config, &index, course_slug, &loaded);
        let rendered = self.renderer.render(&loaded.document.body, &ctx);

        for target in &rendered.unresolved {
            log::warn!(
                "Unresolved reference {:?} in {}/{}",
                target,
                course_slug,
                file.display()
            );
        }

        let title = loaded
            .document
            .metadata
            .title()
            .map(str::to_string)
            .or_else(|| {
                loaded
                    .stem()
                    .filter(|stem| !stem.eq_ignore_ascii_case("index"))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| course.title.clone());

        Ok(RenderedPage {
            course_slug: course.slug.clone(),
            course_title: course.title.clone(),
            title,
            html: rendered.html,
            toc: rendered.toc,
            metadata: loaded.document.metadata,
            unresolved: rendered.unresolved,
        })
    }

    /// Find a file under a course for the file-serving endpoint.
    ///
    /// Tries the path as given, then a course-wide search for its file name.
    /// Paths that climb out of the course are refused.
    #[instrument(skip(self), name = "locate_file")]
    pub fn locate_file(&self, course_slug: &str, relative: &str) -> Result<LocatedFile> {
        let index = self.cache.get()?;
        let course_root = index.course_dir(&self.config, course_slug)?;
        let direct = PathValidator::join_within(&course_root, Path::new(relative))?;

        let path = if direct.is_file() {
            direct
        } else {
            let file_name = direct
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Error::file_not_found(&direct))?;
            PathResolver::new(&course_root)
                .with_exclusions(&self.config.excluded_names)
                .resolve_attachment(file_name)
                .file_path
                .ok_or_else(|| Error::file_not_found(&direct))?
        };

        Ok(LocatedFile {
            content_type: content_type_for(&path),
            path,
        })
    }
}
