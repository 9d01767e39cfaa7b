//! In-memory mock filesystem for testing readers and drivers without a
//! real `/proc` or `/sys` tree.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem.
///
/// Stores files and directories in memory so tests can simulate any
/// kernel-interface state on any platform.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir_names support).
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content. Parent directories are
    /// created automatically.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory (and its parents).
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut names = HashSet::new();
        for child in self.files.keys().chain(self.directories.iter()) {
            if child.parent().is_some_and(|parent| parent == path)
                && let Some(name) = child.file_name()
            {
                names.insert(name.to_string_lossy().into_owned());
            }
        }

        Ok(names.into_iter().collect())
    }
}

/// Shared handle over a [`MockFs`] whose contents can be swapped while
/// a reader or driver holds the filesystem.
///
/// Counter-delta tests need two reads of the *same* driver to observe
/// different file contents; this wrapper is how a test advances the
/// mock counters between calls.
#[derive(Debug, Clone, Default)]
pub struct SharedFs(Arc<Mutex<MockFs>>);

impl SharedFs {
    pub fn new(fs: MockFs) -> Self {
        Self(Arc::new(Mutex::new(fs)))
    }

    /// Replaces the entire underlying filesystem state.
    pub fn set(&self, fs: MockFs) {
        *self.0.lock().unwrap() = fs;
    }

    /// Adds or replaces a single file in the underlying state.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.0.lock().unwrap().add_file(path, content);
    }
}

impl FileSystem for SharedFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.0.lock().unwrap().read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().exists(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        self.0.lock().unwrap().read_dir_names(path)
    }
}
