pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod git;
pub mod intake;
pub mod manifest;
pub mod preflight;
pub mod publisher;
pub mod registry;
pub mod release;
pub mod selector;
pub mod ui;

pub use error::{ReleaseError, Result};
