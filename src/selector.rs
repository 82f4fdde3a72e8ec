//! Computes the legal next versions and resolves the operator's pick.

use crate::domain::{PublishCandidate, Version, VersionBump, VersionChoice};
use crate::error::{ReleaseError, Result};
use crate::ui::{ChoiceOption, Prompter};

/// Fail unless the picked `version` is strictly newer than what the registry serves
pub fn ensure_newer(version: &Version, published: Option<&Version>) -> Result<()> {
    match published {
        Some(p) if version <= p => Err(ReleaseError::SelectionOutdated {
            selected: *version,
            published: *p,
        }),
        _ => Ok(()),
    }
}

/// Builds the candidate list for a working version against the published one
#[derive(Debug, Clone)]
pub struct VersionSelector {
    working: Version,
    suggestion: Option<VersionBump>,
    published: Option<Version>,
}

impl VersionSelector {
    pub fn new(working: Version, suggestion: Option<VersionBump>, published: Option<Version>) -> Self {
        VersionSelector {
            working,
            suggestion,
            published,
        }
    }

    /// Eligible candidates, recommended first.
    ///
    /// Fails with `NoEligibleVersion` if every option is <= the published version.
    /// A bump that would overflow a component is not offered.
    pub fn candidates(&self) -> Result<Vec<PublishCandidate>> {
        let mut all: Vec<PublishCandidate> = VersionBump::ALL
            .iter()
            .filter_map(|&kind| {
                let version = self.working.bump(kind)?;
                Some(PublishCandidate {
                    choice: VersionChoice::Bump(kind),
                    version,
                    is_recommended: self.suggestion == Some(kind),
                })
            })
            .collect();
        all.push(PublishCandidate {
            choice: VersionChoice::KeepCurrent,
            version: self.working,
            is_recommended: false,
        });

        let mut eligible: Vec<PublishCandidate> = Vec::with_capacity(all.len());
        for candidate in all {
            let newer = self.published.map_or(true, |p| candidate.version > p);
            let duplicate = eligible.iter().any(|c| c.version == candidate.version);
            if newer && !duplicate {
                eligible.push(candidate);
            }
        }

        if eligible.is_empty() {
            return Err(ReleaseError::NoEligibleVersion {
                working: self.working,
                published: self.published,
            });
        }

        // stable: non-recommended entries keep patch/minor/major/keep order
        eligible.sort_by_key(|c| !c.is_recommended);
        Ok(eligible)
    }

    /// Ask the operator to pick a candidate and re-validate it before returning
    pub fn select(&self, prompter: &mut dyn Prompter) -> Result<Version> {
        let candidates = self.candidates()?;
        let options: Vec<ChoiceOption> = candidates
            .iter()
            .map(|c| ChoiceOption::new(c.label(), c.is_recommended))
            .collect();

        let index = prompter.prompt_choice("Select version update:", &options)?;
        let picked = candidates
            .get(index)
            .ok_or_else(|| ReleaseError::prompt(format!("choice {} out of range", index + 1)))?;

        ensure_newer(&picked.version, self.published.as_ref())?;
        tracing::info!(choice = ?picked.choice, version = %picked.version, "version selected");
        Ok(picked.version)
    }
}
