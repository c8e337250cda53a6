//! # atomic-copy
//!
//! Atomic single-file copy for Rust.
//!
//! ## Core Features
//!
//! - **Atomic replacement**: Uses the temp file + rename pattern so the
//!   destination is never observed half-written
//! - **Same-directory staging**: The temp file is created next to the
//!   destination, never in a system temp dir, so the rename stays on one
//!   filesystem
//! - **No temp-file leaks**: Every failure path removes the staged file
//!   before returning
//! - **Normalized permissions**: The destination always ends up `0o644`,
//!   independent of the source file's mode
//! - **Durable by default**: The staged file is fsynced before the rename
//!   (opt out with [`Copier::without_fsync`])
//! - **Zero-copy on Linux**: Uses `copy_file_range` where the kernel
//!   supports it
//!
//! ## Quick Start
//!
//! ```no_run
//! // Destination first, source second, like assignment.
//! atomic_copy::copy_file("service.conf", "service.conf.staged")?;
//! # Ok::<(), atomic_copy::Error>(())
//! ```
//!
//! For repeated copies or to tune durability, hold a [`Copier`]:
//!
//! ```no_run
//! use atomic_copy::Copier;
//!
//! let copier = Copier::default().without_fsync();
//! copier.copy_file("a.dat", "a.dat.new")?;
//! copier.copy_file("b.dat", "b.dat.new")?;
//! # Ok::<(), atomic_copy::Error>(())
//! ```
//!
//! ## Safety Guarantees
//!
//! ### Atomic Writes
//!
//! Bytes are staged in a uniquely-named temporary file in the destination's
//! parent directory, then renamed onto the destination in a single
//! filesystem operation. A concurrent reader sees either the prior content
//! or the complete new content, never a partial file.
//!
//! ### All-or-Nothing Failures
//!
//! On any error (unreadable source, full disk, failed flush, failed
//! rename) the destination keeps whatever it held before the call and the
//! temporary file is removed. Errors are returned to the caller with the
//! failing phase identified; nothing is retried internally.
//!
//! ### Concurrent Writers
//!
//! Two concurrent copies to the same destination each stage their own
//! temporary file and each rename atomically; the last rename wins. The
//! crate does not coordinate writers beyond that.
//!
//! ## Out of Scope
//!
//! Directory trees, cross-filesystem moves, progress reporting, and
//! metadata preservation (timestamps, ownership, source permissions) are
//! deliberately not handled here.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with the tracing crate |
//! | `serde` | Serialize/Deserialize for [`Copier`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod copy;
mod error;

pub use copy::{Copier, copy_file};
pub use error::{Error, Result, is_no_space_error};
