//! # Local Collaborators
//!
//! Filesystem stand-ins for the scraper and the downloader.
//!
//! ## Plain English
//!
//! Handy for demos and offline use: instead of scraping a web page,
//! [`DirectoryResolver`] walks through the pictures in a folder, and
//! [`FileLoader`] reads them from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{PictureLoader, UrlResolver};
use crate::error::{WurstballError, WurstballResult};

const FILE_SCHEME: &str = "file://";

/// Extensions treated as pictures when scanning a directory.
const PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

// ============================================
// FILE LOADER
// ============================================

/// Reads `file://` URLs (or plain paths) from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    /// Relative paths are resolved against this directory
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn path_for(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix(FILE_SCHEME).unwrap_or(url));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl PictureLoader for FileLoader {
    fn load(&self, url: &str) -> WurstballResult<Vec<u8>> {
        let path = self.path_for(url);
        let bytes = fs::read(&path)?;
        if bytes.is_empty() {
            return Err(WurstballError::Load {
                url: url.to_string(),
                reason: "file is empty".to_string(),
            });
        }
        Ok(bytes)
    }
}

// ============================================
// DIRECTORY RESOLVER
// ============================================

/// Hands out the pictures of a directory as `file://` URLs, round robin.
#[derive(Debug)]
pub struct DirectoryResolver {
    urls: Vec<String>,
    next: AtomicUsize,
}

impl DirectoryResolver {
    /// Scans `dir` (not recursively) for picture files, sorted by name.
    pub fn scan(dir: impl AsRef<Path>) -> WurstballResult<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_picture(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        log::info!("Found {} picture(s) in {:?}", paths.len(), dir);

        let urls = paths
            .iter()
            .map(|p| format!("{}{}", FILE_SCHEME, p.to_string_lossy()))
            .collect();
        Ok(Self {
            urls,
            next: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl UrlResolver for DirectoryResolver {
    fn picture_url(&self) -> WurstballResult<String> {
        if self.urls.is_empty() {
            return Err(WurstballError::Resolve("directory has no pictures".to_string()));
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.urls.len();
        Ok(self.urls[index].clone())
    }
}

fn is_picture(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            PICTURE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_loader_reads_file_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, b"fake png").unwrap();

        let url = format!("file://{}", path.to_string_lossy());
        assert_eq!(FileLoader::new().load(&url).unwrap(), b"fake png");
    }

    #[test]
    fn test_file_loader_relative_to_root() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.jpg"), b"jpeg bytes").unwrap();

        let loader = FileLoader::with_root(dir.path());
        assert_eq!(loader.load("b.jpg").unwrap(), b"jpeg bytes");
    }

    #[test]
    fn test_file_loader_missing_file() {
        let dir = tempdir().unwrap();
        let loader = FileLoader::with_root(dir.path());

        assert!(matches!(
            loader.load("missing.png"),
            Err(WurstballError::Io(_))
        ));
    }

    #[test]
    fn test_file_loader_empty_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty.gif"), b"").unwrap();

        let loader = FileLoader::with_root(dir.path());
        assert!(matches!(
            loader.load("empty.gif"),
            Err(WurstballError::Load { .. })
        ));
    }

    #[test]
    fn test_directory_resolver_round_robin() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("2.PNG"), b"x").unwrap();
        fs::write(dir.path().join("1.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let resolver = DirectoryResolver::scan(dir.path()).unwrap();
        assert_eq!(resolver.len(), 2);

        let first = resolver.picture_url().unwrap();
        let second = resolver.picture_url().unwrap();
        let third = resolver.picture_url().unwrap();

        assert!(first.starts_with("file://"));
        assert!(first.ends_with("1.jpg"));
        assert!(second.ends_with("2.PNG"));
        assert_eq!(first, third);
    }

    #[test]
    fn test_directory_resolver_empty_dir() {
        let dir = tempdir().unwrap();
        let resolver = DirectoryResolver::scan(dir.path()).unwrap();

        assert!(resolver.is_empty());
        assert!(resolver.picture_url().is_err());
    }
}
