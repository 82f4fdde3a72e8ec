use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Mock repository with a linear history, for testing without actual git operations
pub struct MockRepository {
    history: Vec<(Oid, CommitInfo)>,
    tags: RefCell<BTreeMap<String, Oid>>,
    created: RefCell<Vec<(String, String)>>,
    unreadable: Cell<bool>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            history: Vec::new(),
            tags: RefCell::new(BTreeMap::new()),
            created: RefCell::new(Vec::new()),
            unreadable: Cell::new(false),
        }
    }

    /// Append a commit on top of HEAD and return its OID
    pub fn commit(&mut self, summary: impl Into<String>) -> Oid {
        let n = self.history.len() as u32 + 1;
        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&n.to_be_bytes());
        let oid = Oid::from_bytes(&bytes).expect("20 bytes is a valid oid");

        self.history.push((
            oid,
            CommitInfo {
                hash: oid.to_string(),
                summary: summary.into(),
                author: "Test Author".to_string(),
            },
        ));
        oid
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.borrow_mut().insert(name.into(), oid);
    }

    /// Tag the current HEAD
    pub fn tag_head(&mut self, name: impl Into<String>) {
        let head = self.history.last().map(|(oid, _)| *oid).unwrap_or_else(Oid::zero);
        self.add_tag(name, head);
    }

    /// Make every history read fail, as with a corrupt or missing repository
    pub fn set_unreadable(&self, unreadable: bool) {
        self.unreadable.set(unreadable);
    }

    /// Annotated tags created through the trait, as (name, message)
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created.borrow().clone()
    }

    fn check_readable(&self) -> Result<()> {
        if self.unreadable.get() {
            return Err(ReleaseError::Git(git2::Error::from_str(
                "simulated unreadable history",
            )));
        }
        Ok(())
    }

    fn position(&self, oid: Oid) -> Result<usize> {
        self.history
            .iter()
            .position(|(o, _)| *o == oid)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("object not found")))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Oid> {
        self.check_readable()?;
        self.history
            .last()
            .map(|(oid, _)| *oid)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("reference 'HEAD' not found")))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.check_readable()?;
        Ok(self.tags.borrow().keys().cloned().collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        self.check_readable()?;
        Ok(self.tags.borrow().get(tag_name).copied())
    }

    fn get_commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        self.check_readable()?;
        let end = self.position(to_oid)?;
        let start = match from_oid {
            Some(from) => self.position(from)? + 1,
            None => 0,
        };
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self.history[start..=end]
            .iter()
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(ReleaseError::tag(format!("tag '{}' already exists", name)));
        }
        tags.insert(name.to_string(), target);
        self.created
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}
