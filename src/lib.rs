//! # gh-relabel
//!
//! Replace a GitHub repository's label set with a curated catalog
//!
//! ## Features
//! - Purge-then-seed replacement of all repository labels
//! - Built-in 17-label catalog, overridable from JSON/YAML files
//! - Non-destructive reconcile mode (create missing, update changed, delete extraneous)
//! - Dry-run mode

pub mod config;
pub mod error;
pub mod github;
pub mod sync;

pub use config::{default_catalog, Label, SyncConfig};
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use sync::{LabelSynchronizer, SyncOutcome, SyncReport};

/// Replace a repository's labels with the given catalog
///
/// Convenience wrapper over [`LabelSynchronizer`]: purges every existing
/// label, then seeds `labels` (or the built-in catalog if `None`).
///
/// # Examples
///
/// ```rust,no_run
/// #[tokio::main]
/// async fn main() -> gh_relabel::Result<()> {
///     let report =
///         gh_relabel::replace_repository_labels("your_github_token", "owner/repo", None, false)
///             .await?;
///
///     println!("Deleted {}, created {}", report.deleted, report.created);
///     Ok(())
/// }
/// ```
///
/// # Errors
/// Returns an error if the configuration is invalid or a transport-level
/// fault occurs mid-run.
pub async fn replace_repository_labels(
    access_token: &str,
    repository: &str,
    labels: Option<Vec<Label>>,
    dry_run: bool,
) -> Result<SyncReport> {
    let config = SyncConfig {
        access_token: access_token.to_string(),
        repository: repository.to_string(),
        dry_run,
        labels,
    };

    let synchronizer = LabelSynchronizer::new(config)?;
    synchronizer.run().await
}
