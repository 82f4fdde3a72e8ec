use crate::domain::{TagPattern, Version};
use crate::error::Result;
use crate::git::Repository;

/// Result of a tagging attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tag was created locally; it still has to be pushed
    Created { tag: String, push_command: String },
    /// Tag was already there and was left untouched
    AlreadyExists { tag: String },
}

impl TagOutcome {
    pub fn tag(&self) -> &str {
        match self {
            TagOutcome::Created { tag, .. } | TagOutcome::AlreadyExists { tag } => tag,
        }
    }
}

/// Creates annotated release tags on HEAD. Never pushes.
pub struct ReleaseTagger<'a> {
    repo: &'a dyn Repository,
    pattern: TagPattern,
    remote: String,
}

impl<'a> ReleaseTagger<'a> {
    pub fn new(repo: &'a dyn Repository, pattern: TagPattern, remote: impl Into<String>) -> Self {
        ReleaseTagger {
            repo,
            pattern,
            remote: remote.into(),
        }
    }

    /// Tag HEAD for `version`, skipping when the tag already exists
    pub fn tag_release(&self, version: &Version) -> Result<TagOutcome> {
        let tag = self.pattern.format(version);
        if self.repo.find_tag_oid(&tag)?.is_some() {
            tracing::info!(tag = %tag, "release tag already exists");
            return Ok(TagOutcome::AlreadyExists { tag });
        }

        let head = self.repo.head_oid()?;
        self.repo
            .create_annotated_tag(&tag, head, &format!("Release {}", tag))?;
        tracing::info!(tag = %tag, target = %head, "created release tag");

        Ok(TagOutcome::Created {
            push_command: format!("git push {} {}", self.remote, tag),
            tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::git::MockRepository;

    #[test]
    fn test_creates_annotated_tag_with_push_hint() {
        let mut repo = MockRepository::new();
        repo.commit("feat: first");
        let tagger = ReleaseTagger::new(&repo, TagPattern::default(), "origin");

        let outcome = tagger.tag_release(&Version::new(1, 2, 0)).unwrap();
        assert_eq!(
            outcome,
            TagOutcome::Created {
                tag: "v1.2.0".to_string(),
                push_command: "git push origin v1.2.0".to_string(),
            }
        );
        assert_eq!(
            repo.created_tags(),
            vec![("v1.2.0".to_string(), "Release v1.2.0".to_string())]
        );
    }

    #[test]
    fn test_tagging_twice_is_idempotent() {
        let mut repo = MockRepository::new();
        repo.commit("fix: thing");
        let tagger = ReleaseTagger::new(&repo, TagPattern::default(), "origin");
        let version = Version::new(0, 3, 1);

        tagger.tag_release(&version).unwrap();
        let second = tagger.tag_release(&version).unwrap();

        assert_eq!(second, TagOutcome::AlreadyExists { tag: "v0.3.1".to_string() });
        assert_eq!(repo.created_tags().len(), 1);
    }

    #[test]
    fn test_custom_pattern_and_remote() {
        let mut repo = MockRepository::new();
        repo.commit("chore: init");
        let pattern = TagPattern::new("cli@{version}").unwrap();
        let tagger = ReleaseTagger::new(&repo, pattern, "upstream");

        let outcome = tagger.tag_release(&Version::new(2, 0, 0)).unwrap();
        assert_eq!(outcome.tag(), "cli@2.0.0");
        assert!(matches!(
            outcome,
            TagOutcome::Created { ref push_command, .. } if push_command == "git push upstream cli@2.0.0"
        ));
    }

    #[test]
    fn test_repository_errors_propagate() {
        let mut repo = MockRepository::new();
        repo.commit("fix: thing");
        repo.set_unreadable(true);
        let tagger = ReleaseTagger::new(&repo, TagPattern::default(), "origin");

        assert!(matches!(
            tagger.tag_release(&Version::new(1, 0, 1)),
            Err(ReleaseError::Git(_))
        ));
    }
}
