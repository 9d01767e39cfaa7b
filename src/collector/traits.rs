//! Filesystem abstraction so readers can run against the real `/proc`
//! and `/sys` trees or an in-memory mock in tests.

use std::io;
use std::path::Path;

/// Abstraction over the few filesystem operations the readers need.
///
/// Production code uses [`RealFs`]; tests use
/// [`MockFs`](crate::collector::MockFs) with canned kernel-interface
/// contents.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the entry names (not full paths) in a directory.
    ///
    /// The disk reader only ever needs device-name sets from
    /// `/sys/block` and `/sys/devices/virtual/block`, so names are
    /// enough here.
    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// Real filesystem implementation delegating to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn real_fs_reads_and_lists_a_temp_tree() {
        let dir = tempfile::tempdir().unwrap();
        let block = dir.path().join("block");
        fs::create_dir(&block).unwrap();
        fs::write(block.join("sda"), "").unwrap();
        fs::write(dir.path().join("stat"), "cpu 1 2 3 4 5 6 7\n").unwrap();

        let fs = RealFs::new();
        assert!(fs.exists(dir.path()));
        assert!(!fs.exists(&dir.path().join("missing")));

        let content = fs.read_to_string(&dir.path().join("stat")).unwrap();
        assert!(content.starts_with("cpu "));

        let names = fs.read_dir_names(&block).unwrap();
        assert_eq!(names, vec!["sda".to_string()]);
    }

    #[test]
    fn real_fs_missing_file_is_io_error() {
        let fs = RealFs::new();
        let err = fs
            .read_to_string(Path::new("/nonexistent/path/12345"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
