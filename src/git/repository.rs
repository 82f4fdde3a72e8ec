use std::path::Path;

use git2::{ErrorCode, Oid, Repository as Git2Repo, Signature, Sort};

use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};

const FALLBACK_TAGGER: (&str, &str) = ("pkg-publish", "pkg-publish@localhost");

/// [`Repository`] backed by libgit2
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        tracing::debug!(path = %repo.path().display(), "opened git repository");
        Ok(Git2Repository { repo })
    }

    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Configured user, or a fixed identity when git has none
    fn tagger(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!("no git user configured, using fallback tagger identity");
                Ok(Signature::now(FALLBACK_TAGGER.0, FALLBACK_TAGGER.1)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Repository for Git2Repository {
    fn head_oid(&self) -> Result<Oid> {
        Ok(self.repo.head()?.peel_to_commit()?.id())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None)?;
        Ok(names.iter().flatten().map(str::to_owned).collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let object = match self.repo.revparse_single(&format!("refs/tags/{}", tag_name)) {
            Ok(object) => object,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(ReleaseError::tag(format!("cannot resolve tag '{}': {}", tag_name, e))),
        };

        // annotated tags point at a tag object, lightweight ones straight at the commit
        let commit = object
            .peel_to_commit()
            .map_err(|e| ReleaseError::tag(format!("tag '{}' does not point at a commit: {}", tag_name, e)))?;
        Ok(Some(commit.id()))
    }

    fn get_commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        walk.push(to_oid)?;
        if let Some(from) = from_oid {
            walk.hide(from)?;
        }

        walk.map(|oid| {
            let commit = self.repo.find_commit(oid?)?;
            let info = CommitInfo {
                hash: commit.id().to_string(),
                summary: commit.summary().unwrap_or_default().to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            };
            Ok(info)
        })
        .collect()
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let commit = self
            .repo
            .find_commit(target)
            .map_err(|e| ReleaseError::tag(format!("cannot tag {}: {}", target, e)))?;
        let tagger = self.tagger()?;

        // force = false: an existing tag is an error, never overwritten
        self.repo
            .tag(name, commit.as_object(), &tagger, message, false)
            .map_err(|e| ReleaseError::tag(format!("cannot create tag '{}': {}", name, e)))?;
        Ok(())
    }
}
