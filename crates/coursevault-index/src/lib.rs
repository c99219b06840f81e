//! # Course Index
//!
//! Course tree indexing, reference resolution and document loading.
//!
//! This crate provides the core functionality behind every page request:
//! - Building the course/topic tree with reproducible, collision-free slugs
//! - Caching that tree until the filesystem changes
//! - Resolving wiki-links, relative links and attachments to real files
//! - Loading a document and splitting its front-matter
//!
//! ## Quick Start
//!
//! ```no_run
//! use coursevault_index::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let config = Arc::new(SiteConfig::builder("/srv/courses").build()?);
//! let cache = IndexCache::for_config(Arc::clone(&config));
//!
//! let index = cache.get()?;
//! for course in &index.courses {
//!     println!("{} ({} documents)", course.title, course.document_count());
//! }
//!
//! if let Some(file) = index.topic_file_name("rust", "week-1/ownership") {
//!     let loaded = DocumentLoader::new(config).load(&index, "rust", &file)?;
//!     println!("{}", loaded.document.body);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! ### Scanner
//!
//! [`scanner::IndexBuilder`] walks the courses root. Entries are sorted
//! lexically before slugs are assigned; the first sibling to claim a slug
//! keeps it and later ones get `-file`/`-folder`. Folders with no Markdown
//! anywhere below them are pruned.
//!
//! ### Cache
//!
//! [`cache::IndexCache`] holds the last built [`cache::CourseIndex`] and
//! rebuilds when the tree's latest mtime or its path fingerprint changes.
//! Probing and building sit behind the [`cache::TreeProbe`] and
//! [`cache::IndexSource`] traits so tests can drive staleness directly.
//!
//! ### Resolver
//!
//! [`resolver::PathResolver`] finds the file a reference points to: strict
//! for `./`/`../`, otherwise nearest folder first, then a course-wide scan.
//!
//! ### Loader
//!
//! [`loader::DocumentLoader`] reads a document by course slug and relative
//! path, refusing directories, oversized files and traversal.
//!
//! ## Thread Safety
//!
//! `IndexCache` is `Send + Sync`. Readers share snapshots through `Arc`;
//! the lock is held only to swap the snapshot.

pub mod cache;
pub mod loader;
pub mod lookup;
pub mod resolver;
pub mod scanner;

pub use cache::{
    CourseIndex, FsIndexSource, FsTreeProbe, IndexCache, IndexSource, TreeProbe, TreeState,
    fingerprint,
};
pub use coursevault_core::prelude::*;
pub use loader::{DocumentLoader, LoadedDocument};
pub use lookup::{clean_slug_path, page_url};
pub use resolver::PathResolver;
pub use scanner::IndexBuilder;

pub mod prelude {
    pub use crate::cache::*;
    pub use crate::loader::*;
    pub use crate::lookup::*;
    pub use crate::resolver::*;
    pub use crate::scanner::*;
    pub use coursevault_core::prelude::*;
}
