//! Working directory ownership.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

const TEMP_PREFIX: &str = "mfsession-";

/// The directory a session works in, and whether the session owns it.
///
/// An owned directory is a temporary one allocated by the session; it is
/// deleted on release, on adoption of an unrelated path, or when dropped.
/// Directories supplied by the caller are never deleted.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    temp: Option<TempDir>,
}

impl Workspace {
    /// Allocate a fresh temporary directory.
    pub fn temporary() -> Result<Self> {
        Self::temporary_in(std::env::temp_dir())
    }

    /// Allocate a fresh temporary directory under `parent`.
    ///
    /// The stored path is canonical, so paths later derived from it compare
    /// equal to canonicalized load paths even when `parent` is a symlink.
    pub fn temporary_in(parent: impl AsRef<Path>) -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(parent)?;
        let path = fs::canonicalize(temp.path())?;
        log::debug!("Allocated temporary working directory {:?}", path);
        Ok(Self {
            path,
            temp: Some(temp),
        })
    }

    /// Use a caller-managed directory.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Delete the owned temporary directory, if any.
    ///
    /// A directory that has already been removed by someone else is not an
    /// error. After release the workspace owns nothing.
    pub fn release(&mut self) -> Result<()> {
        let Some(temp) = self.temp.take() else {
            return Ok(());
        };
        log::debug!("Removing temporary working directory {:?}", self.path);
        match temp.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Temporary directory {:?} was already removed", self.path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Switch to `path` as a caller-managed directory.
    ///
    /// The owned temporary directory is released first, unless `path` lies
    /// inside it, in which case ownership is kept so the new path survives.
    pub fn adopt(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let inside_temp = self
            .temp
            .as_ref()
            .is_some_and(|temp| is_within(&path, temp.path()));
        if !inside_temp {
            self.release()?;
        }
        self.path = path;
        Ok(())
    }
}

fn is_within(path: &Path, root: &Path) -> bool {
    let canonical = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    path.starts_with(root) || canonical(path).starts_with(canonical(root))
}
