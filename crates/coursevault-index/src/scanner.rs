//! Course index builder.
//!
//! Walks each course directory with an explicit stack of open directories.
//! Entries are visited in lexical order so slugs are reproducible. A folder is
//! decided on when its frame is popped, after all of its children are known:
//! folders with no Markdown anywhere below them are dropped, and sibling slugs
//! are assigned at that point so pruned folders never claim a slug.

use coursevault_core::prelude::*;
use coursevault_core::slug::{document_slug, is_index_name, strip_markdown_extension};
use coursevault_parser::{parse_frontmatter, split_frontmatter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Builds the course list from the courses root.
pub struct IndexBuilder<'a> {
    config: &'a SiteConfig,
}

/// One directory entry, captured before sorting.
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// A child awaiting its slug.
struct Pending {
    base_slug: String,
    kind: SlugKind,
    topic: Topic,
}

/// A directory whose entries are still being visited.
struct DirFrame {
    name: String,
    rel: PathBuf,
    entries: std::vec::IntoIter<Entry>,
    children: Vec<Pending>,
    /// Title of the first index document seen directly inside
    index_title: Option<String>,
    has_index: bool,
}

/// Result of scanning one course directory.
struct ScannedTree {
    topics: Vec<Topic>,
    has_index: bool,
    index_title: Option<String>,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Scan every course under the courses root.
    #[instrument(skip(self), fields(root = %self.config.courses_root().display()), name = "index_build")]
    pub fn build(&self) -> Result<Vec<Course>> {
        let root = self.config.courses_root();
        let entries = self.read_sorted(root)?;

        let mut scope = SlugScope::new();
        let mut courses = Vec::new();

        for entry in entries.into_iter().filter(|e| e.is_dir) {
            let Some(tree) = self.scan_course(&entry) else {
                continue;
            };
            let slug = scope.claim(&normalize_slug(&entry.name), SlugKind::Folder);

            let title = tree.index_title.unwrap_or_else(|| entry.name.clone());
            log::debug!(
                "Indexed course {} ({}) with {} top-level topics",
                slug,
                entry.name,
                tree.topics.len()
            );

            courses.push(Course {
                slug,
                original_name: entry.name,
                title,
                has_index: tree.has_index,
                topics: tree.topics,
            });
        }

        log::info!(
            "Built course index: {} courses, {} documents",
            courses.len(),
            courses.iter().map(Course::document_count).sum::<usize>()
        );
        Ok(courses)
    }

    /// Scan one course, logging and skipping it when it cannot be read.
    fn scan_course(&self, entry: &Entry) -> Option<ScannedTree> {
        match self.scan_tree(&entry.path) {
            Ok(tree) => Some(tree),
            Err(e) => {
                log::warn!("Skipping unreadable course {}: {}", entry.path.display(), e);
                None
            }
        }
    }

    /// Scan one course directory into its topic tree.
    fn scan_tree(&self, course_dir: &Path) -> Result<ScannedTree> {
        let mut stack = vec![self.open_frame(course_dir, PathBuf::new(), String::new())?];

        while let Some(frame) = stack.last_mut() {
            if let Some(entry) = frame.entries.next() {
                let rel = frame.rel.join(&entry.name);
                if entry.is_dir {
                    match self.open_frame(&entry.path, rel, entry.name) {
                        Ok(child) => stack.push(child),
                        Err(e) => {
                            log::warn!("Skipping unreadable folder {}: {}", entry.path.display(), e)
                        }
                    }
                } else if is_markdown(&entry.name) {
                    let title = self.read_title(&entry.path);
                    if frame.index_title.is_none() && is_index_name(&entry.name) {
                        frame.has_index = true;
                        frame.index_title = title.clone();
                    }
                    frame.children.push(Pending {
                        base_slug: document_slug(&entry.name),
                        kind: SlugKind::File,
                        topic: Topic {
                            slug: String::new(),
                            title: title.unwrap_or_else(|| {
                                strip_markdown_extension(&entry.name).to_string()
                            }),
                            original_file_name: entry.name,
                            full_path: rel,
                            slug_path: String::new(),
                            is_folder: false,
                            has_index: false,
                            sub_topics: Vec::new(),
                        },
                    });
                }
                continue;
            }

            // All entries visited: settle this directory.
            let Some(done) = stack.pop() else { break };
            let has_index = done.has_index;
            let index_title = done.index_title.clone();
            let topics = assign_slugs(done.children);

            let Some(parent) = stack.last_mut() else {
                let mut topics = topics;
                fill_slug_paths(&mut topics);
                return Ok(ScannedTree {
                    topics,
                    has_index,
                    index_title,
                });
            };

            if topics.is_empty() {
                log::debug!("Pruning folder without documents: {}", done.rel.display());
                continue;
            }

            parent.children.push(Pending {
                base_slug: normalize_slug(&done.name),
                kind: SlugKind::Folder,
                topic: Topic {
                    slug: String::new(),
                    title: index_title.unwrap_or_else(|| done.name.clone()),
                    original_file_name: done.name,
                    full_path: done.rel,
                    slug_path: String::new(),
                    is_folder: true,
                    has_index,
                    sub_topics: topics,
                },
            });
        }

        Ok(ScannedTree {
            topics: Vec::new(),
            has_index: false,
            index_title: None,
        })
    }

    fn open_frame(&self, dir: &Path, rel: PathBuf, name: String) -> Result<DirFrame> {
        Ok(DirFrame {
            name,
            rel,
            entries: self.read_sorted(dir)?.into_iter(),
            children: Vec::new(),
            index_title: None,
            has_index: false,
        })
    }

    /// Directory entries minus excluded names, sorted by name.
    ///
    /// Only failing to list `dir` itself is an error; entries that cannot be
    /// inspected are logged and left out.
    fn read_sorted(&self, dir: &Path) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir).map_err(Error::io)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.config.is_excluded(&name) {
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            let path = entry.path();
            let is_dir = if file_type.is_symlink() {
                // Symlinked files are followed, symlinked folders are not
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => false,
                    _ => continue,
                }
            } else {
                file_type.is_dir()
            };

            entries.push(Entry { name, path, is_dir });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Front-matter title of a document, if it has a usable one.
    fn read_title(&self, path: &Path) -> Option<String> {
        match fs::metadata(path) {
            Ok(meta) if meta.len() > self.config.max_file_size => {
                log::debug!("Not reading title of oversized file {}", path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Cannot stat {}: {}", path.display(), e);
                return None;
            }
            Ok(_) => {}
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };

        let (source, _) = split_frontmatter(&content);
        match parse_frontmatter(source?) {
            Ok(frontmatter) => frontmatter.title().map(str::to_string),
            Err(e) => {
                log::warn!(
                    "Malformed front-matter in {}, using file name as title: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

fn is_markdown(name: &str) -> bool {
    strip_markdown_extension(name).len() != name.len()
}

/// Give each sibling a unique slug, in the order the siblings were visited.
fn assign_slugs(children: Vec<Pending>) -> Vec<Topic> {
    let mut scope = SlugScope::new();
    children
        .into_iter()
        .map(|pending| {
            let mut topic = pending.topic;
            topic.slug = scope.claim(&pending.base_slug, pending.kind);
            topic
        })
        .collect()
}

/// Compose `slug_path` top-down once every slug in the tree is final.
fn fill_slug_paths(topics: &mut [Topic]) {
    let mut stack: Vec<(&mut [Topic], String)> = vec![(topics, String::new())];

    while let Some((siblings, parent_path)) = stack.pop() {
        for topic in siblings {
            topic.slug_path = if parent_path.is_empty() {
                topic.slug.clone()
            } else {
                format!("{}/{}", parent_path, topic.slug)
            };
            let path = topic.slug_path.clone();
            stack.push((topic.sub_topics.as_mut_slice(), path));
        }
    }
}
