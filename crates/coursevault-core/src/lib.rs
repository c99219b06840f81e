//! # CourseVault Core
//!
//! Core data models, error types, and configuration for serving a tree of
//! Markdown courses. This crate defines the canonical types that all other
//! crates depend on.
//!
//! ## Architecture Principles
//!
//! - **Type-Driven Design**: Strong types replace string-based APIs
//! - **Zero Panic in Libraries**: All errors are `Result<T, Error>`
//! - **Builder Pattern for Complex Types**: Configuration uses a builder
//! - **Immutable by Default**: Index values are never mutated once built
//!
//! ## Core Modules
//!
//! - [`models`] - Courses, topics, TOC items, resolved references
//! - [`error`] - Error taxonomy and Result alias
//! - [`config`] - Site configuration
//! - [`profiles`] - Configuration profiles for different environments
//! - [`slug`] - Slug normalization and sibling collision handling
//! - [`utils`] - Path validation, content types, serialization helpers
//!
//! ## Usage Examples
//!
//! ```
//! use coursevault_core::prelude::*;
//!
//! let slug = normalize_slug("Lecture 1. Ownership");
//! assert_eq!(slug, "lecture-1-ownership");
//!
//! let err = Error::course_not_found("missing");
//! assert!(err.is_not_found());
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod profiles;
pub mod slug;
pub mod utils;

pub use config::*;
pub use error::{Error, Result};
pub use models::*;
pub use profiles::ConfigProfile;
pub use slug::{SlugKind, SlugScope, normalize_slug};
pub use utils::{PathValidator, content_type_for, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::SiteConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        AttachmentKind, Course, Document, Frontmatter, RenderedDocument, ResolvedReference,
        TocItem, Topic,
    };
    pub use crate::profiles::ConfigProfile;
    pub use crate::slug::{SlugKind, SlugScope, normalize_slug};
    pub use crate::utils::PathValidator;
}
