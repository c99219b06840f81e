//! Read-through cache for the course index.
//!
//! A snapshot is reused until the tree's latest modification time or its
//! layout fingerprint changes. Builds run outside the lock; only the final
//! swap takes it, so two callers that see the same staleness may both
//! rebuild, and the last one to finish wins.

use crate::scanner::IndexBuilder;
use coursevault_core::prelude::*;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::instrument;
use walkdir::WalkDir;

/// Staleness key of a course tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeState {
    /// Most recent modification time of any file or folder
    pub last_modified: Option<SystemTime>,
    /// SHA-256 over the sorted relative file paths, hex encoded
    pub fingerprint: String,
}

/// Observes the course tree without building it.
pub trait TreeProbe: Send + Sync {
    fn probe(&self) -> Result<TreeState>;
}

/// Produces a fresh course list.
pub trait IndexSource: Send + Sync {
    fn build(&self) -> Result<Vec<Course>>;
}

/// One built snapshot of every course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseIndex {
    pub courses: Vec<Course>,
    pub state: TreeState,
}

impl CourseIndex {
    pub fn new(courses: Vec<Course>, state: TreeState) -> Self {
        Self { courses, state }
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.state.last_modified
    }

    pub fn fingerprint(&self) -> &str {
        &self.state.fingerprint
    }
}

/// Filesystem probe over the courses root.
pub struct FsTreeProbe {
    config: Arc<SiteConfig>,
}

impl FsTreeProbe {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        Self { config }
    }
}

impl TreeProbe for FsTreeProbe {
    fn probe(&self) -> Result<TreeState> {
        let root = self.config.courses_root();
        let mut last_modified: Option<SystemTime> = None;
        let mut files: Vec<PathBuf> = Vec::new();

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !self.config.is_excluded(name))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Below the root, unreadable entries are left out as the builder does
                Err(e) if e.depth() > 0 => {
                    log::debug!("Probe skipping entry: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(Error::io(e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::other("filesystem loop while probing course tree")
                    })));
                }
            };

            if let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) {
                last_modified = Some(last_modified.map_or(modified, |t| t.max(modified)));
            }
            if entry.file_type().is_file()
                && let Ok(rel) = entry.path().strip_prefix(root)
            {
                files.push(rel.to_path_buf());
            }
        }

        Ok(TreeState {
            last_modified,
            fingerprint: fingerprint(&files),
        })
    }
}

/// Hash of a file listing; order-independent.
pub fn fingerprint(files: &[PathBuf]) -> String {
    let mut listing: Vec<String> = files
        .iter()
        .map(|p| coursevault_core::utils::to_slash(p))
        .collect();
    listing.sort();
    format!("{:x}", Sha256::digest(listing.join("\n").as_bytes()))
}

/// Builds courses by scanning the filesystem.
pub struct FsIndexSource {
    config: Arc<SiteConfig>,
}

impl FsIndexSource {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        Self { config }
    }
}

impl IndexSource for FsIndexSource {
    fn build(&self) -> Result<Vec<Course>> {
        IndexBuilder::new(&self.config).build()
    }
}

/// Cached course index with explicit staleness checks.
pub struct IndexCache {
    probe: Box<dyn TreeProbe>,
    source: Box<dyn IndexSource>,
    snapshot: RwLock<Option<Arc<CourseIndex>>>,
    rebuilds: AtomicU64,
    enabled: bool,
}

impl IndexCache {
    pub fn new(probe: Box<dyn TreeProbe>, source: Box<dyn IndexSource>) -> Self {
        Self {
            probe,
            source,
            snapshot: RwLock::new(None),
            rebuilds: AtomicU64::new(0),
            enabled: true,
        }
    }

    /// Cache over the filesystem described by `config`.
    pub fn for_config(config: Arc<SiteConfig>) -> Self {
        let enabled = config.enable_caching;
        Self::new(
            Box::new(FsTreeProbe::new(Arc::clone(&config))),
            Box::new(FsIndexSource::new(config)),
        )
        .with_caching(enabled)
    }

    /// With caching off every `get` rebuilds.
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Current index, rebuilt first if the tree changed since the snapshot.
    #[instrument(skip(self), name = "index_cache_get")]
    pub fn get(&self) -> Result<Arc<CourseIndex>> {
        let state = self.probe.probe()?;

        if self.enabled
            && let Some(current) = self.current()
            && current.state == state
        {
            log::debug!("Course index cache hit");
            return Ok(current);
        }

        log::debug!("Course index cache miss, rebuilding");
        self.rebuild(state)
    }

    /// Drop the snapshot if the tree changed. Returns whether it was dropped.
    pub fn invalidate_if_stale(&self) -> Result<bool> {
        let Some(current) = self.current() else {
            return Ok(false);
        };
        let state = self.probe.probe()?;
        if current.state == state {
            return Ok(false);
        }

        let mut snapshot = self.snapshot.write();
        // Another caller may already have swapped in a newer snapshot
        if snapshot.as_ref().is_some_and(|s| Arc::ptr_eq(s, &current)) {
            *snapshot = None;
        }
        log::debug!("Course index snapshot is stale");
        Ok(true)
    }

    /// Snapshot as last built, without checking the tree.
    pub fn current(&self) -> Option<Arc<CourseIndex>> {
        self.snapshot.read().clone()
    }

    pub fn clear(&self) {
        *self.snapshot.write() = None;
    }

    /// Number of full rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Acquire)
    }

    fn rebuild(&self, state: TreeState) -> Result<Arc<CourseIndex>> {
        let courses = self.source.build()?;
        let index = Arc::new(CourseIndex::new(courses, state));

        *self.snapshot.write() = Some(Arc::clone(&index));
        let count = self.rebuilds.fetch_add(1, Ordering::AcqRel) + 1;
        log::info!(
            "Course index rebuilt ({} courses, rebuild #{})",
            index.courses.len(),
            count
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FakeProbe {
        state: Arc<Mutex<TreeState>>,
    }

    impl TreeProbe for FakeProbe {
        fn probe(&self) -> Result<TreeState> {
            Ok(self.state.lock().clone())
        }
    }

    struct CountingSource {
        builds: Arc<AtomicU64>,
    }

    impl IndexSource for CountingSource {
        fn build(&self) -> Result<Vec<Course>> {
            let n = self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Course {
                slug: format!("c{}", n),
                original_name: "C".to_string(),
                title: "C".to_string(),
                has_index: false,
                topics: Vec::new(),
            }])
        }
    }

    fn state(fp: &str) -> TreeState {
        TreeState {
            last_modified: None,
            fingerprint: fp.to_string(),
        }
    }

    fn fake_cache() -> (IndexCache, Arc<Mutex<TreeState>>, Arc<AtomicU64>) {
        let shared = Arc::new(Mutex::new(state("a")));
        let builds = Arc::new(AtomicU64::new(0));
        let cache = IndexCache::new(
            Box::new(FakeProbe {
                state: Arc::clone(&shared),
            }),
            Box::new(CountingSource {
                builds: Arc::clone(&builds),
            }),
        );
        (cache, shared, builds)
    }

    #[test]
    fn test_hit_reuses_snapshot() {
        let (cache, _, builds) = fake_cache();
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.rebuild_count(), 1);
    }

    #[test]
    fn test_state_change_rebuilds() {
        let (cache, shared, _) = fake_cache();
        let first = cache.get().unwrap();
        *shared.lock() = state("b");
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.fingerprint(), "b");
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn test_invalidate_if_stale() {
        let (cache, shared, _) = fake_cache();
        assert!(!cache.invalidate_if_stale().unwrap());

        cache.get().unwrap();
        assert!(!cache.invalidate_if_stale().unwrap());
        assert!(cache.current().is_some());

        *shared.lock() = state("b");
        assert!(cache.invalidate_if_stale().unwrap());
        assert!(cache.current().is_none());
    }

    #[test]
    fn test_disabled_cache_always_rebuilds() {
        let (cache, _, builds) = fake_cache();
        let cache = cache.with_caching(false);
        cache.get().unwrap();
        cache.get().unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert!(cache.current().is_some());
    }

    #[test]
    fn test_clear() {
        let (cache, _, _) = fake_cache();
        cache.get().unwrap();
        cache.clear();
        assert!(cache.current().is_none());
        cache.get().unwrap();
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let a = fingerprint(&[PathBuf::from("x/a.md"), PathBuf::from("b.md")]);
        let b = fingerprint(&[PathBuf::from("b.md"), PathBuf::from("x/a.md")]);
        let c = fingerprint(&[PathBuf::from("b.md")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
