//! Error types for atomic-copy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during a copy operation, and the [`Result`] type alias.
//!
//! Every variant maps to exactly one phase of the copy algorithm, so a
//! caller can always tell where the operation failed:
//!
//! | Phase | Error |
//! |-------|-------|
//! | Open source | [`Error::SourceUnreadable`] |
//! | Create temp file | [`Error::TempFile`] |
//! | Copy bytes / flush | [`Error::CopyIo`] |
//! | Normalize permissions | [`Error::SetPermissions`] |
//! | Atomic rename | [`Error::Persist`] |

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for atomic-copy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// Temp-file creation and the byte-copy phase are the two places a full
/// destination filesystem shows up; this helper detects that condition
/// across platforms.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` (errno 28) |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use atomic_copy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// if is_no_space_error(&error) {
///     println!("Destination has no space!");
/// }
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    // Check standard StorageFull kind first
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    // Platform-specific checks
    #[cfg(unix)]
    {
        // ENOSPC = 28 on most Unix systems; the raw OS error might be
        // available even if kind() isn't StorageFull
        if let Some(raw_error) = error.raw_os_error() {
            const ENOSPC: i32 = 28;
            return raw_error == ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        // On Windows, check for ERROR_DISK_FULL (0x70 = 112)
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Errors that can occur during a copy operation.
///
/// All errors include the path of the failing phase to aid debugging.
/// Use the [`std::error::Error`] trait methods to access the underlying
/// IO cause.
///
/// Whatever the variant, the destination file is never left half-written:
/// a failure leaves the prior destination content (if any) untouched, and
/// the temporary file is removed before the error is returned.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Source file could not be opened for reading
    #[error("Failed to open source file {path}: {source}")]
    SourceUnreadable {
        /// The source path that could not be opened
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create a temporary file in the destination's directory
    #[error("Failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// IO failure while streaming bytes into the temporary file, or while
    /// flushing it to disk
    #[error("Failed to copy contents to temporary file for {path}: {source}")]
    CopyIo {
        /// The destination path being staged
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to set the fixed permission bits on the temporary file
    #[error("Failed to set permissions on staged copy of {path}: {source}")]
    SetPermissions {
        /// The destination path being staged
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to atomically rename the temporary file onto the destination
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_no_space_error_storage_full_kind() {
        let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
        assert!(is_no_space_error(&error));
    }

    #[test]
    fn test_is_no_space_error_other_kind() {
        let error = io::Error::new(io::ErrorKind::NotFound, "not found");
        assert!(!is_no_space_error(&error));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_no_space_error_enospc() {
        let error = io::Error::from_raw_os_error(28); // ENOSPC
        assert!(is_no_space_error(&error));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_no_space_error_other_errno() {
        let error = io::Error::from_raw_os_error(2); // ENOENT
        assert!(!is_no_space_error(&error));
    }

    #[test]
    fn test_source_unreadable_display() {
        let error = Error::SourceUnreadable {
            path: PathBuf::from("/src/missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("Failed to open source file"));
        assert!(msg.contains("/src/missing.txt"));
    }

    #[test]
    fn test_temp_file_display_names_directory() {
        let error = Error::TempFile {
            path: PathBuf::from("/dst/dir"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("Failed to create temporary file in /dst/dir"));
    }

    #[test]
    fn test_persist_display_names_destination() {
        let error = Error::Persist {
            path: PathBuf::from("/dst/file.txt"),
            source: io::Error::other("cross-device link"),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("Failed to persist temporary file to /dst/file.txt"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let error = Error::CopyIo {
            path: PathBuf::from("/dst/file.txt"),
            source: io::Error::new(io::ErrorKind::StorageFull, "disk full"),
        };
        let cause = error.source().and_then(|e| e.downcast_ref::<io::Error>());
        assert!(cause.is_some_and(is_no_space_error));
    }
}
