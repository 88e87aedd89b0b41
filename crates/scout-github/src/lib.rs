//! GitHub REST API source for repo-scout.
//!
//! [`GitHubClient`] implements both collaborator traits: it finds the most
//! recent repository creation event, lists public repositories created after
//! a given id, and resolves a repository's language breakdown and license.

pub mod client;
pub mod model;

pub use client::GitHubClient;
