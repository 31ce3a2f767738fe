//! docforge-files - Managed file deletion
//!
//! Deleting anything requires an explicit confirmation token choosing
//! between a recoverable delete (system trash) and an irreversible one.
//! Directories must be empty before they can be removed; a non-empty
//! directory is refused with its item count.
//!
//! # Example
//!
//! ```no_run
//! use docforge_files::{delete_file, DeleteMode};
//!
//! let report = delete_file("old.docx", DeleteMode::parse("CORBEILLE").unwrap())?;
//! assert_eq!(report.method, "trash");
//! # Ok::<(), docforge_files::FileOpError>(())
//! ```

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Confirmation token selecting the recoverable delete.
pub const CONFIRM_TRASH: &str = "CORBEILLE";

/// Confirmation token selecting the irreversible delete.
pub const CONFIRM_PERMANENT: &str = "SUPPRESSION DÉFINITIVE";

/// How a confirmed deletion should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Move to the system trash; recoverable.
    Trash,
    /// Remove permanently; not recoverable.
    Permanent,
}

impl DeleteMode {
    /// Map a confirmation token to a mode. Anything but the two literal
    /// tokens is a refusal.
    pub fn parse(confirm: &str) -> Option<Self> {
        match confirm {
            CONFIRM_TRASH => Some(Self::Trash),
            CONFIRM_PERMANENT => Some(Self::Permanent),
            _ => None,
        }
    }

    /// The method name reported back to the caller.
    pub fn method(self) -> &'static str {
        match self {
            Self::Trash => "trash",
            Self::Permanent => "permanent",
        }
    }
}

/// Errors from deletion operations.
#[derive(Error, Debug)]
pub enum FileOpError {
    /// The confirmation token was not one of the two accepted literals.
    #[error(
        "deletion cancelled: `confirm` must be `{CONFIRM_TRASH}` (recoverable) \
         or `{CONFIRM_PERMANENT}` (permanent)"
    )]
    InvalidConfirmation,

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Non-empty directories are never deleted; the count lets the caller
    /// decide what to clear out first.
    #[error("directory not empty ({count} items): {path}")]
    DirectoryNotEmpty { path: String, count: usize },

    #[error("could not move to trash: {0}")]
    Trash(#[from] trash::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for deletion operations.
pub type Result<T> = std::result::Result<T, FileOpError>;

/// What a successful deletion did.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReport {
    pub path: String,
    /// File size in bytes; zero for directories.
    pub size: u64,
    /// `"trash"` or `"permanent"`.
    pub method: &'static str,
}

/// Delete a single file under the chosen mode.
///
/// Refuses directories; use [`delete_directory`] for those.
pub fn delete_file<P: AsRef<Path>>(path: P, mode: DeleteMode) -> Result<DeleteReport> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileOpError::NotFound(display.clone()),
        _ => FileOpError::Io(e),
    })?;
    if metadata.is_dir() {
        return Err(FileOpError::NotAFile(display));
    }

    let size = metadata.len();
    match mode {
        DeleteMode::Trash => trash::delete(path)?,
        DeleteMode::Permanent => fs::remove_file(path)?,
    }
    log::info!("deleted file {display} ({size} bytes, {})", mode.method());

    Ok(DeleteReport {
        path: display,
        size,
        method: mode.method(),
    })
}

/// Delete an empty directory under the chosen mode.
///
/// A directory with contents is refused and nothing is removed.
pub fn delete_directory<P: AsRef<Path>>(path: P, mode: DeleteMode) -> Result<DeleteReport> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileOpError::NotFound(display.clone()),
        _ => FileOpError::Io(e),
    })?;
    if !metadata.is_dir() {
        return Err(FileOpError::NotADirectory(display));
    }

    let count = fs::read_dir(path)?.count();
    if count > 0 {
        return Err(FileOpError::DirectoryNotEmpty {
            path: display,
            count,
        });
    }

    match mode {
        DeleteMode::Trash => trash::delete(path)?,
        DeleteMode::Permanent => fs::remove_dir(path)?,
    }
    log::info!("deleted directory {display} ({})", mode.method());

    Ok(DeleteReport {
        path: display,
        size: 0,
        method: mode.method(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_map_to_modes() {
        assert_eq!(DeleteMode::parse(CONFIRM_TRASH), Some(DeleteMode::Trash));
        assert_eq!(
            DeleteMode::parse(CONFIRM_PERMANENT),
            Some(DeleteMode::Permanent)
        );
        assert_eq!(DeleteMode::parse("yes"), None);
        assert_eq!(DeleteMode::parse("corbeille"), None);
    }

    #[test]
    fn permanent_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doomed.txt");
        fs::write(&file, b"bye").unwrap();

        let report = delete_file(&file, DeleteMode::Permanent).unwrap();
        assert_eq!(report.size, 3);
        assert_eq!(report.method, "permanent");
        assert!(!file.exists());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = delete_file("/no/such/file.txt", DeleteMode::Permanent).unwrap_err();
        assert!(matches!(err, FileOpError::NotFound(_)));
    }

    #[test]
    fn directories_are_refused_by_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = delete_file(dir.path(), DeleteMode::Permanent).unwrap_err();
        assert!(matches!(err, FileOpError::NotAFile(_)));
    }

    #[test]
    fn non_empty_directory_refused_with_count() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let err = delete_directory(dir.path(), DeleteMode::Permanent).unwrap_err();
        match err {
            FileOpError::DirectoryNotEmpty { count, .. } => assert_eq!(count, 3),
            other => panic!("expected DirectoryNotEmpty, got {other}"),
        }
        // Nothing was deleted
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn empty_directory_permanent_delete() {
        let parent = tempfile::tempdir().unwrap();
        let target = parent.path().join("empty");
        fs::create_dir(&target).unwrap();

        let report = delete_directory(&target, DeleteMode::Permanent).unwrap();
        assert_eq!(report.method, "permanent");
        assert!(!target.exists());
    }
}
