use crate::foundation::error::{TapeError, TapeResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;

/// A resolved source media file referenced by one or more fragments.
///
/// Sources created from temporary media (downloads, generated silence) own the file: it is
/// removed from disk when the last fragment referring to it is dropped.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    owned: Option<TempPath>,
}

impl SourceFile {
    /// Resolve `path` to a canonical absolute path; fails if the file does not exist.
    pub fn resolve(path: impl AsRef<Path>) -> TapeResult<Arc<Self>> {
        let path = canonical_path(path.as_ref())?;
        Ok(Arc::new(Self { path, owned: None }))
    }

    /// Take ownership of a temporary file. It is deleted when the source is dropped.
    pub fn owned(temp: TempPath) -> TapeResult<Arc<Self>> {
        let path = canonical_path(&temp)?;
        Ok(Arc::new(Self {
            path,
            owned: Some(temp),
        }))
    }

    /// Canonical absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return `true` when this source deletes its file on drop.
    pub fn is_owned(&self) -> bool {
        self.owned.is_some()
    }
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

fn canonical_path(path: &Path) -> TapeResult<PathBuf> {
    let file = std::fs::canonicalize(path).map_err(|e| {
        TapeError::construction(format!(
            "cannot resolve source file '{}': {e}",
            path.display()
        ))
    })?;
    if !file.is_file() {
        return Err(TapeError::construction(format!(
            "source '{}' is not a regular file",
            file.display()
        )));
    }
    Ok(file)
}
