use crate::boundary::BoundaryWarning;
use crate::config::ClassificationConfig;
use crate::domain::{TagPattern, Version, VersionBump};
use crate::error::Result;
use crate::git::{CommitInfo, Repository};

/// Outcome of inspecting the history since the last release
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeAnalysis {
    pub last_tag: Option<String>,
    pub is_first_release: bool,
    pub commit_count: usize,
    pub commits: Vec<CommitInfo>,
    /// `None` means nothing changed since the last release
    pub suggestion: Option<VersionBump>,
    pub history_unreadable: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// Suggests a version bump from commit summaries
pub struct HistoryAnalyzer {
    config: ClassificationConfig,
}

impl HistoryAnalyzer {
    /// Create a new history analyzer
    pub fn new(config: ClassificationConfig) -> Self {
        HistoryAnalyzer { config }
    }

    /// Classify summaries: any major keyword wins, then any minor keyword, else patch.
    ///
    /// An empty slice yields no suggestion.
    pub fn classify(&self, summaries: &[String]) -> Option<VersionBump> {
        if summaries.is_empty() {
            return None;
        }

        let text = summaries.join("\n").to_lowercase();
        let contains_any = |keywords: &[String]| {
            keywords
                .iter()
                .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
        };

        if contains_any(&self.config.major_keywords) {
            Some(VersionBump::Major)
        } else if contains_any(&self.config.minor_keywords) {
            Some(VersionBump::Minor)
        } else {
            Some(VersionBump::Patch)
        }
    }

    /// Analyze summaries since `last_tag`
    pub fn analyze(&self, last_tag: Option<&str>, summaries: &[String]) -> ChangeAnalysis {
        let Some(tag) = last_tag else {
            // History before the first tag is not attributed to any release
            return ChangeAnalysis {
                last_tag: None,
                is_first_release: true,
                commit_count: 0,
                commits: Vec::new(),
                suggestion: Some(VersionBump::Minor),
                history_unreadable: false,
                warnings: vec![BoundaryWarning::FirstRelease],
            };
        };

        let mut warnings = Vec::new();
        if summaries.is_empty() {
            warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag: tag.to_string(),
            });
        }

        ChangeAnalysis {
            last_tag: Some(tag.to_string()),
            is_first_release: false,
            commit_count: summaries.len(),
            commits: Vec::new(),
            suggestion: self.classify(summaries),
            history_unreadable: false,
            warnings,
        }
    }

    /// Analyze the repository history since the latest release tag.
    ///
    /// Never fails: unreadable history degrades to a patch suggestion so that
    /// version selection can still proceed manually.
    pub fn analyze_repository(&self, repo: &dyn Repository, pattern: &TagPattern) -> ChangeAnalysis {
        match self.try_analyze_repository(repo, pattern) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "could not analyze git history");
                ChangeAnalysis {
                    last_tag: None,
                    is_first_release: false,
                    commit_count: 0,
                    commits: Vec::new(),
                    suggestion: Some(VersionBump::Patch),
                    history_unreadable: true,
                    warnings: vec![BoundaryWarning::HistoryUnreadable {
                        reason: e.to_string(),
                    }],
                }
            }
        }
    }

    fn try_analyze_repository(
        &self,
        repo: &dyn Repository,
        pattern: &TagPattern,
    ) -> Result<ChangeAnalysis> {
        let (latest, mut tag_warnings) = latest_release_tag(repo, pattern)?;

        let Some((tag, _)) = latest else {
            let mut analysis = self.analyze(None, &[]);
            analysis.warnings.append(&mut tag_warnings);
            return Ok(analysis);
        };

        let head = repo.head_oid()?;
        let tag_oid = repo.find_tag_oid(&tag)?;
        let commits = repo.get_commits_between(tag_oid, head)?;
        let summaries: Vec<String> = commits.iter().map(|c| c.summary.clone()).collect();
        tracing::debug!(tag = %tag, commits = commits.len(), "collected commits since last release");

        let mut analysis = self.analyze(Some(&tag), &summaries);
        analysis.commits = commits;
        tag_warnings.append(&mut analysis.warnings);
        analysis.warnings = tag_warnings;
        Ok(analysis)
    }
}

/// Find the highest-versioned tag produced by `pattern`.
///
/// Tags that carry the pattern's shape but not a valid version are skipped and
/// reported as [`BoundaryWarning::UnparsableTag`].
pub fn latest_release_tag(
    repo: &dyn Repository,
    pattern: &TagPattern,
) -> Result<(Option<(String, Version)>, Vec<BoundaryWarning>)> {
    let mut warnings = Vec::new();
    let mut latest: Option<(String, Version)> = None;

    for tag in repo.list_tags()? {
        match pattern.parse_version(&tag) {
            None => {}
            Some(Err(e)) => {
                tracing::debug!(tag = %tag, "skipping tag without a valid version");
                warnings.push(BoundaryWarning::UnparsableTag {
                    tag,
                    reason: e.to_string(),
                });
            }
            Some(Ok(version)) => {
                if latest.as_ref().map_or(true, |(_, best)| version > *best) {
                    latest = Some((tag, version));
                }
            }
        }
    }

    Ok((latest, warnings))
}
