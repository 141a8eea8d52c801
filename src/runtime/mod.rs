//! Runtime abstraction for the filesystem effects of a fetch.
//!
//! Everything that touches the disk goes through [`Runtime`] so the fetch
//! pipeline can be exercised with a mock.

mod fs;

use anyhow::Result;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    /// Create or truncate a file for writing.
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }
}
