//! Root-confined resolution of client-supplied paths.
//!
//! A request path is accepted in two stages. [`SecurePathResolver::validate`]
//! enforces length and an ASCII whitelist. [`SecurePathResolver::resolve`]
//! then collapses `.` and `..` lexically against the root, checks that the
//! result is still under the root, and if the target exists, repeats the
//! check on its symlink-free real path. Neither containment check is enough
//! on its own: the first misses symlinks, the second cannot see paths that
//! do not exist yet.

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use dirview_core::error::{AppError, ErrorKind};
use dirview_core::result::AppResult;

use crate::error::PathError;

/// Longest accepted request path, in bytes.
pub const MAX_PATH_LEN: usize = 1024;

/// Dangling symlinks followed while locating a missing target's parent.
const MAX_SYMLINK_HOPS: usize = 40;

/// Resolves request paths to locations proven to be inside one root.
#[derive(Debug, Clone)]
pub struct SecurePathResolver {
    /// Absolute, lexically clean root.
    root: PathBuf,
    /// Root with every symlink resolved.
    canonical_root: PathBuf,
}

impl SecurePathResolver {
    /// Creates a resolver for `root`. An empty path means the current
    /// working directory. The root must exist and be a directory.
    pub fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref();
        let absolute = if root.as_os_str().is_empty() {
            std::env::current_dir()
        } else {
            std::path::absolute(root)
        }
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Cannot determine root directory: {}", root.display()),
                e,
            )
        })?;
        let absolute = clean(&absolute);

        let canonical_root = std::fs::canonicalize(&absolute).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Root directory is not accessible: {}", absolute.display()),
                e,
            )
        })?;

        if !canonical_root.is_dir() {
            return Err(AppError::configuration(format!(
                "Root is not a directory: {}",
                absolute.display()
            )));
        }

        Ok(Self {
            root: absolute,
            canonical_root,
        })
    }

    /// The root with symlinks resolved.
    pub fn root(&self) -> &Path {
        &self.canonical_root
    }

    /// Checks length and character whitelist `[A-Za-z0-9/_.-]`. The empty
    /// string addresses the root and is valid.
    pub fn validate(raw: &str) -> Result<(), PathError> {
        if raw.len() > MAX_PATH_LEN {
            return Err(PathError::BadPath);
        }
        if !raw.bytes().all(is_allowed) {
            return Err(PathError::BadPath);
        }
        Ok(())
    }

    /// Resolves `raw` to an absolute path inside the root.
    ///
    /// Existing targets come back as their real path. Missing targets come
    /// back as the lexical path so the caller can answer not-found, but only
    /// when their deepest existing ancestor is itself inside the root.
    /// Otherwise a missing target behind an escaping symlink would answer
    /// differently from an existing one.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, PathError> {
        Self::validate(raw)?;

        // A leading '/' is relative to the root and does not absorb '..'.
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        debug!(path = raw, "Lexical traversal rejected");
                        return Err(PathError::Traversal);
                    }
                }
                name => segments.push(name),
            }
        }

        let mut joined = self.root.clone();
        joined.extend(&segments);
        if !joined.starts_with(&self.root) {
            return Err(PathError::Traversal);
        }

        match std::fs::canonicalize(&joined) {
            Ok(real) if real.starts_with(&self.canonical_root) => Ok(real),
            Ok(_) => {
                warn!(path = raw, "Symlink escape from root rejected");
                Err(PathError::Traversal)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match self.nearest_existing_escapes(&joined) {
                    Ok(false) => Ok(joined),
                    Ok(true) => {
                        warn!(path = raw, "Symlink escape from root rejected");
                        Err(PathError::Traversal)
                    }
                    Err(e) => {
                        debug!(path = raw, error = %e, "Path could not be resolved");
                        Err(PathError::BadPath)
                    }
                }
            }
            Err(e) => {
                debug!(path = raw, error = %e, "Path could not be resolved");
                Err(PathError::BadPath)
            }
        }
    }

    /// Finds the deepest entry of `path` that exists and reports whether its
    /// real location is outside the canonical root. A dangling symlink is
    /// followed to where it points and the search continues from there.
    fn nearest_existing_escapes(&self, path: &Path) -> io::Result<bool> {
        let mut probe = path.to_path_buf();
        for _ in 0..MAX_SYMLINK_HOPS {
            let Some((existing, meta)) = probe.ancestors().find_map(|ancestor| {
                std::fs::symlink_metadata(ancestor)
                    .ok()
                    .map(|meta| (ancestor.to_path_buf(), meta))
            }) else {
                return Ok(true);
            };

            if !meta.file_type().is_symlink() {
                let real = std::fs::canonicalize(&existing)?;
                return Ok(!real.starts_with(&self.canonical_root));
            }

            let target = std::fs::read_link(&existing)?;
            let base = match existing.parent() {
                Some(parent) => std::fs::canonicalize(parent)?,
                None => PathBuf::from("/"),
            };
            probe = base.join(target);
        }
        Err(io::Error::other("too many levels of symbolic links"))
    }
}

fn is_allowed(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'.' | b'-')
}

/// Collapses `.` and `..` in an absolute path without touching the
/// filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
