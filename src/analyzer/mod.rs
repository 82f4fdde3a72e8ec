//! Analysis engine for suggesting a version bump from commit history

pub mod history_analyzer;

pub use history_analyzer::{latest_release_tag, ChangeAnalysis, HistoryAnalyzer};
