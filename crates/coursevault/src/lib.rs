//! # CourseVault
//!
//! Serves a folder of Obsidian-style Markdown courses as web pages.
//!
//! Each immediate subdirectory of the courses root is a course. Pages are
//! rendered on request: the course index is cached until the tree changes,
//! wiki-links and relative links are resolved against the course, and
//! callouts and a table of contents are produced on the way to HTML.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/courses` | course and topic tree as JSON |
//! | `GET /api/files/{course}/{path}` | raw attachment bytes |
//! | `GET /{course}` | the course index page |
//! | `GET /{course}/{slug path}` | a topic page |
//!
//! ## Embedding
//!
//! ```no_run
//! use coursevault::{CourseService, router};
//! use coursevault_core::SiteConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Arc::new(SiteConfig::builder("/srv/courses").build()?);
//! let app = router(Arc::new(CourseService::new(config)));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod page;
pub mod server;
pub mod service;
pub mod settings;

pub use coursevault_core::prelude::*;
pub use server::{AppError, router, serve};
pub use service::{CourseService, LocatedFile, RenderedPage};
pub use settings::{LogFormat, Overrides, init_logging, load_config};
