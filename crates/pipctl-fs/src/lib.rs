//! Filesystem collaborators for pipctl
//!
//! Provides the requirements file cache, ownership changes and the scoped
//! privileged copy used when pip runs under a different user.

pub mod cache;
pub mod checksum;
pub mod error;
pub mod io;
pub mod ownership;
pub mod scoped;

pub use cache::{FileCache, LocalFileCache, REMOTE_SCHEME};
pub use error::{Error, Result};
pub use ownership::{Ownership, SystemOwnership};
pub use scoped::ScopedCopy;
