//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the source-control
//! operations the release workflow needs, so that the workflow can run against
//! a real repository or an in-memory mock.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use pkg_publish::git::Repository;
//! # fn example(repo: &dyn Repository) -> pkg_publish::Result<()> {
//! let head = repo.head_oid()?;
//! let since_tag = repo.find_tag_oid("v1.0.0")?;
//! let commits = repo.get_commits_between(since_tag, head)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// First line of the commit message
    pub summary: String,
    /// The commit author
    pub author: String,
}

impl CommitInfo {
    /// Abbreviated hash for display
    pub fn short_hash(&self) -> &str {
        let end = self.hash.len().min(7);
        &self.hash[..end]
    }
}

/// Source-control operations used by the release workflow
///
/// All methods return [crate::error::Result<T>]; implementations map their
/// underlying errors (like `git2::Error`) into [crate::error::ReleaseError].
pub trait Repository {
    /// Get the OID of the commit HEAD points at
    fn head_oid(&self) -> Result<Oid>;

    /// Get all tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Find a tag by name and get the OID of the commit it points at
    ///
    /// Handles both lightweight and annotated tags. Returns `Ok(None)` if the tag doesn't exist.
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Get commits reachable from `to_oid` but not from `from_oid`
    ///
    /// `from_oid` is exclusive and `to_oid` inclusive; `None` walks the whole history.
    /// Results are in chronological order (oldest first).
    fn get_commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>>;

    /// Create an annotated tag at the given commit
    ///
    /// Fails if a tag with that name already exists; it is never overwritten.
    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()>;
}

/// Stand-in used when no repository could be opened.
///
/// Every operation fails with the original reason, so history analysis
/// degrades and tagging is reported as a warning.
#[derive(Debug, Clone)]
pub struct UnavailableRepository {
    reason: String,
}

impl UnavailableRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableRepository {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(crate::error::ReleaseError::Git(git2::Error::from_str(
            &self.reason,
        )))
    }
}

impl Repository for UnavailableRepository {
    fn head_oid(&self) -> Result<Oid> {
        self.fail()
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.fail()
    }

    fn find_tag_oid(&self, _tag_name: &str) -> Result<Option<Oid>> {
        self.fail()
    }

    fn get_commits_between(&self, _from_oid: Option<Oid>, _to_oid: Oid) -> Result<Vec<CommitInfo>> {
        self.fail()
    }

    fn create_annotated_tag(&self, _name: &str, _target: Oid, _message: &str) -> Result<()> {
        self.fail()
    }
}
