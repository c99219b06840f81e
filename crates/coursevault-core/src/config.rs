//! Configuration types for the course server.
//!
//! Follows a builder pattern for complex configuration with validation.

use crate::error::{Error, Result};
use crate::models::AttachmentKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Global site configuration.
///
/// Every field has a default so partial files and environment overlays
/// deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory whose immediate subdirectories are courses
    pub courses_root: PathBuf,
    /// URL prefix of the file-serving endpoint
    pub files_endpoint: String,
    /// Extensions (lowercase, no dot) that wiki-links treat as attachments
    pub attachment_extensions: Vec<String>,
    /// Subset of attachment extensions rendered as image embeds
    pub image_extensions: Vec<String>,
    /// Directory entry names skipped by every scan
    pub excluded_names: HashSet<String>,
    /// Largest document the loader will read, in bytes
    pub max_file_size: u64,
    /// Heading texts (any case) that receive the generated contents list
    pub contents_titles: Vec<String>,
    /// When false the course index is rebuilt on every access
    pub enable_caching: bool,
    pub log_level: String,
    /// Socket address the HTTP surface binds to
    pub bind: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            courses_root: PathBuf::from("courses"),
            files_endpoint: "/api/files".to_string(),
            attachment_extensions: ["pdf", "png", "jpg", "jpeg", "gif", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            image_extensions: ["png", "jpg", "jpeg", "gif", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_names: [".obsidian", ".git", ".DS_Store", "node_modules", ".trash"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            contents_titles: ["Contents", "Table of contents", "TOC", "Содержание", "Оглавление"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enable_caching: true,
            log_level: "INFO".to_string(),
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl SiteConfig {
    /// Create a new config with builder
    pub fn builder(courses_root: impl Into<PathBuf>) -> SiteConfigBuilder {
        SiteConfigBuilder::new(courses_root)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.courses_root.exists() {
            return Err(Error::config_error(format!(
                "Courses root does not exist: {}",
                self.courses_root.display()
            )));
        }

        if !self.courses_root.is_dir() {
            return Err(Error::config_error(format!(
                "Courses root is not a directory: {}",
                self.courses_root.display()
            )));
        }

        if !self.files_endpoint.starts_with('/') {
            return Err(Error::config_error(format!(
                "Files endpoint must start with '/': {}",
                self.files_endpoint
            )));
        }

        if let Some(ext) = self
            .image_extensions
            .iter()
            .find(|ext| !self.attachment_extensions.contains(ext))
        {
            return Err(Error::config_error(format!(
                "Image extension '{}' is not an attachment extension",
                ext
            )));
        }

        Ok(())
    }

    /// Whether an entry name is skipped by scans
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.contains(name)
    }

    /// Whether `ext` (any case, no dot) is an attachment extension
    pub fn is_attachment_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.attachment_extensions.iter().any(|e| *e == ext)
    }

    /// Whether `ext` (any case, no dot) is rendered as an image
    pub fn is_image_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.image_extensions.iter().any(|e| *e == ext)
    }

    /// How a reference with extension `ext` is presented, if it is an attachment.
    pub fn attachment_kind(&self, ext: &str) -> Option<AttachmentKind> {
        if !self.is_attachment_extension(ext) {
            None
        } else if self.is_image_extension(ext) {
            Some(AttachmentKind::Image)
        } else {
            Some(AttachmentKind::Document)
        }
    }

    /// Whether a heading is the contents heading; compared case-insensitively
    pub fn is_contents_title(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        self.contents_titles
            .iter()
            .any(|t| t.trim().to_lowercase() == title)
    }

    /// Directory of a course given its on-disk name
    pub fn course_dir(&self, original_name: &str) -> PathBuf {
        self.courses_root.join(original_name)
    }

    /// Courses root as given (relative roots resolve against the process cwd)
    pub fn courses_root(&self) -> &Path {
        &self.courses_root
    }
}

/// Builder for SiteConfig
pub struct SiteConfigBuilder {
    config: SiteConfig,
}

impl SiteConfigBuilder {
    /// Create a new builder
    pub fn new(courses_root: impl Into<PathBuf>) -> Self {
        Self {
            config: SiteConfig {
                courses_root: courses_root.into(),
                ..SiteConfig::default()
            },
        }
    }

    /// Set the file-serving endpoint prefix
    pub fn files_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.files_endpoint = endpoint.into();
        self
    }

    /// Set the maximum document size
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    /// Enable or disable the index cache
    pub fn enable_caching(mut self, enabled: bool) -> Self {
        self.config.enable_caching = enabled;
        self
    }

    /// Skip an additional entry name during scans
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.config.excluded_names.insert(name.into());
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.config.bind = addr.into();
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<SiteConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
