//! The atomic file copy operation.
//!
//! This module provides [`Copier`] and the convenience function
//! [`copy_file`] for atomically replacing a destination file's contents
//! with the contents of a source file.
//!
//! The copy is staged through a temporary file created in the
//! **destination's parent directory** (never a system-wide temp dir), so
//! the final rename stays on one filesystem and is atomic. A reader of the
//! destination path sees either the old content or the complete new
//! content, never anything in between.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Fixed permission bits applied to the destination on every successful
/// copy, regardless of the source file's mode.
#[cfg(unix)]
const DEST_MODE: u32 = 0o644;

/// An atomic file copier.
///
/// `Copier` holds only configuration; it keeps no state between calls and
/// a single instance may be used for any number of copies. The zero-cost
/// way to use it is the free function [`copy_file`], which runs one copy
/// on a default-configured instance.
///
/// # Example
///
/// ```no_run
/// use atomic_copy::Copier;
///
/// let copier = Copier::default().without_fsync();
/// copier.copy_file("config.toml", "config.toml.new")?;
/// # Ok::<(), atomic_copy::Error>(())
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Copier {
    /// Whether to sync the temporary file to disk before the rename
    /// (default: true)
    ///
    /// This ensures the new content is durable before it becomes visible
    /// at the destination path. Disable for faster but less durable copies.
    pub fsync: bool,
}

impl Default for Copier {
    fn default() -> Self {
        Self { fsync: true }
    }
}

impl Copier {
    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Atomically copy the contents of `src` to `dst`.
    ///
    /// Reads `src` fully, stages the bytes in a uniquely-named temporary
    /// file next to `dst`, normalizes the staged file's permissions to
    /// `0o644`, then renames it onto `dst` in a single atomic step. Any
    /// file already at `dst` is replaced; `dst` need not exist. The parent
    /// directory of `dst` must already exist; this function never creates
    /// directories.
    ///
    /// The argument order matches assignment: destination first, source
    /// second.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failing phase:
    ///
    /// - [`Error::SourceUnreadable`] - `src` cannot be opened
    /// - [`Error::TempFile`] - temp file creation in `dst`'s parent failed
    /// - [`Error::CopyIo`] - streaming or flushing the bytes failed
    /// - [`Error::SetPermissions`] - normalizing the staged file's mode failed
    /// - [`Error::Persist`] - the atomic rename failed
    ///
    /// On any error, `dst` is left exactly as it was and no temporary file
    /// remains in its parent directory.
    pub fn copy_file(&self, dst: impl AsRef<Path>, src: impl AsRef<Path>) -> Result<()> {
        let dst = dst.as_ref();
        let src = src.as_ref();

        let src_file = File::open(src).map_err(|e| Error::SourceUnreadable {
            path: src.to_path_buf(),
            source: e,
        })?;

        // Stage in the destination's parent directory so the rename below
        // never crosses a filesystem boundary. A bare filename has an
        // empty parent, which means the current directory.
        let dst_parent = match dst.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let temp_file = tempfile::NamedTempFile::new_in(dst_parent).map_err(|e| Error::TempFile {
            path: dst_parent.to_path_buf(),
            source: e,
        })?;

        #[cfg(feature = "tracing")]
        tracing::trace!(temp = %temp_file.path().display(), dst = %dst.display(), "staging copy");

        // From here on, dropping `temp_file` removes the staged file, so
        // every `?` below cleans up before propagating. Removal itself is
        // best-effort; the original error wins.
        copy_file_contents(&src_file, temp_file.as_file()).map_err(|e| Error::CopyIo {
            path: dst.to_path_buf(),
            source: e,
        })?;

        // Make deferred write errors visible before the content can become
        // observable at `dst`.
        if self.fsync {
            temp_file.as_file().sync_all().map_err(|e| Error::CopyIo {
                path: dst.to_path_buf(),
                source: e,
            })?;
        }

        // Fixed destination mode, independent of the source file's
        // permissions. NamedTempFile creates the file as 0o600.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp_file.path(), fs::Permissions::from_mode(DEST_MODE)).map_err(
                |e| Error::SetPermissions {
                    path: dst.to_path_buf(),
                    source: e,
                },
            )?;
        }
        #[cfg(not(unix))]
        {
            // Mode bits don't exist here; ensure the staged file isn't
            // read-only so the destination stays writable.
            let mut perms = temp_file
                .as_file()
                .metadata()
                .map_err(|e| Error::SetPermissions {
                    path: dst.to_path_buf(),
                    source: e,
                })?
                .permissions();
            perms.set_readonly(false);
            fs::set_permissions(temp_file.path(), perms).map_err(|e| Error::SetPermissions {
                path: dst.to_path_buf(),
                source: e,
            })?;
        }

        // Atomic rename, replacing any existing file at `dst` in one step.
        temp_file.persist(dst).map_err(|e| Error::Persist {
            path: dst.to_path_buf(),
            source: e.error,
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(src = %src.display(), dst = %dst.display(), "copied file");

        Ok(())
    }
}

/// Atomically copy the contents of `src` to `dst`.
///
/// Convenience function equivalent to
/// `Copier::default().copy_file(dst, src)`. See [`Copier::copy_file`] for
/// the full contract.
///
/// # Example
///
/// ```no_run
/// atomic_copy::copy_file("app.conf", "app.conf.staged")?;
/// # Ok::<(), atomic_copy::Error>(())
/// ```
pub fn copy_file(dst: impl AsRef<Path>, src: impl AsRef<Path>) -> Result<()> {
    Copier::default().copy_file(dst, src)
}

/// Stream all bytes from `src` into `dst` using the best available method.
///
/// On Linux 4.5+, uses `copy_file_range` for zero-copy kernel-to-kernel
/// transfer. Falls back to a buffered userspace copy on other platforms or
/// when the filesystem doesn't support it.
fn copy_file_contents(src: &File, dst: &File) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        copy_file_range_all(src, dst)
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::io::BufReader;
        io::copy(&mut BufReader::new(src), &mut &*dst)
    }
}

/// Linux-specific: copy using copy_file_range(2).
///
/// Data never enters userspace. Falls back to io::copy if the first call
/// fails with an errno meaning the syscall can't serve this pair of files.
#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &File, dst: &File) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();
    let len = src.metadata()?.len();
    let mut remaining = len;
    let mut copied: u64 = 0;

    while remaining > 0 {
        // Bounded chunks so we don't hold kernel resources for the whole
        // file at once.
        let chunk_size = remaining.min(128 * 1024 * 1024) as usize; // 128MB

        // SAFETY: valid file descriptors, null offsets mean "use current
        // file position".
        let result = unsafe {
            libc::copy_file_range(
                src_fd,
                std::ptr::null_mut(),
                dst_fd,
                std::ptr::null_mut(),
                chunk_size,
                0, // flags (reserved, must be 0)
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            // EXDEV: cross-device, ENOSYS: not supported, EINVAL: fs
            // doesn't support it. Fall back to a userspace copy.
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV)
                        | Some(libc::ENOSYS)
                        | Some(libc::EINVAL)
                        | Some(libc::EOPNOTSUPP)
                )
            {
                use std::io::BufReader;
                return io::copy(&mut BufReader::new(src), &mut &*dst);
            }
            return Err(err);
        }

        if result == 0 {
            // EOF reached (file may have been truncated mid-copy)
            break;
        }

        let bytes_copied = result as u64;
        copied += bytes_copied;
        remaining = remaining.saturating_sub(bytes_copied);
    }

    Ok(copied)
}

// =============================================================================
// Tests
// =============================================================================
