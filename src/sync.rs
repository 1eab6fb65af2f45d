//! Label Synchronization Functionality
//!
//! Purge-then-seed replacement of a repository's label set, plus a
//! non-destructive reconcile mode that diffs desired against actual state.

use crate::config::{Label, SyncConfig};
use crate::error::Result;
use crate::github::{ApiOutcome, GitHubClient, Listing, RemoteLabel};

/// Per-label outcome of a synchronization run
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Label deleted from the repository
    Deleted { name: String },

    /// Delete request returned a non-204 status
    DeleteFailed { name: String, detail: String },

    /// The listing request failed; no deletes were attempted
    ListingFailed { detail: String },

    /// Label created in the repository
    Created { name: String },

    /// Create request returned a non-201 status
    CreateFailed { name: String, detail: String },

    /// Label updated in place (reconcile mode)
    Updated { name: String, changes: Vec<String> },

    /// Update failed partway (reconcile mode)
    UpdateFailed { name: String, detail: String },

    /// Label already matches the catalog (reconcile mode)
    Unchanged { name: String },
}

/// Aggregated result of a run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Per-label outcomes, in execution order
    pub outcomes: Vec<SyncOutcome>,

    /// Number of labels deleted
    pub deleted: u32,

    /// Number of labels created
    pub created: u32,

    /// Number of labels updated
    pub updated: u32,

    /// Number of labels left unchanged
    pub unchanged: u32,

    /// Number of failed operations (listing failures included)
    pub failed: u32,

    /// Whether this was a dry run
    pub dry_run: bool,
}

impl SyncReport {
    /// Create a new empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            outcomes: Vec::new(),
            deleted: 0,
            created: 0,
            updated: 0,
            unchanged: 0,
            failed: 0,
            dry_run,
        }
    }

    /// Record an outcome and update counters
    pub fn add_outcome(&mut self, outcome: SyncOutcome) {
        match &outcome {
            SyncOutcome::Deleted { .. } => self.deleted += 1,
            SyncOutcome::Created { .. } => self.created += 1,
            SyncOutcome::Updated { .. } => self.updated += 1,
            SyncOutcome::Unchanged { .. } => self.unchanged += 1,
            SyncOutcome::DeleteFailed { .. }
            | SyncOutcome::CreateFailed { .. }
            | SyncOutcome::UpdateFailed { .. }
            | SyncOutcome::ListingFailed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Whether any operation failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Total number of recorded outcomes
    pub fn total_operations(&self) -> usize {
        self.outcomes.len()
    }
}

/// A single planned reconcile operation
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOp {
    /// Catalog entry missing from the repository
    Create { label: Label },

    /// Existing label differs from the catalog entry
    Update {
        name: String,
        label: Label,
        changes: Vec<String>,
    },

    /// Repository label with no catalog counterpart
    Delete { name: String },

    /// Existing label already matches
    Keep { name: String },
}

/// Diff desired catalog against the repository's current labels
///
/// Catalog entries are visited in catalog order, then extraneous repository
/// labels in listing order. Matching is by exact name.
pub fn plan_reconcile(current: &[RemoteLabel], desired: &[Label]) -> Vec<ReconcileOp> {
    let mut operations = Vec::new();

    for label in desired {
        match current.iter().find(|c| c.name == label.name) {
            Some(existing) => {
                let changes = label_changes(existing, label);
                if changes.is_empty() {
                    operations.push(ReconcileOp::Keep {
                        name: label.name.clone(),
                    });
                } else {
                    operations.push(ReconcileOp::Update {
                        name: label.name.clone(),
                        label: label.clone(),
                        changes,
                    });
                }
            }
            None => operations.push(ReconcileOp::Create {
                label: label.clone(),
            }),
        }
    }

    for existing in current {
        if !desired.iter().any(|label| label.name == existing.name) {
            operations.push(ReconcileOp::Delete {
                name: existing.name.clone(),
            });
        }
    }

    operations
}

/// Describe the differences between an existing label and a catalog entry
fn label_changes(current: &RemoteLabel, target: &Label) -> Vec<String> {
    let mut changes = Vec::new();

    let current_color = Label::normalize_color(&current.color);
    let target_color = Label::normalize_color(&target.color);
    if current_color != target_color {
        changes.push(format!("color: {} -> {}", current_color, target_color));
    }

    let current_desc = current.description.as_deref().unwrap_or("");
    if current_desc != target.description {
        changes.push(format!(
            "description: {} -> {}",
            if current_desc.is_empty() {
                "(none)"
            } else {
                current_desc
            },
            if target.description.is_empty() {
                "(none)"
            } else {
                &target.description
            }
        ));
    }

    changes
}

/// Label Synchronizer
///
/// Executes purge, seed, and reconcile against a single repository. Fully
/// sequential: every call is awaited before the next is issued.
pub struct LabelSynchronizer {
    client: GitHubClient,
    config: SyncConfig,
}

impl LabelSynchronizer {
    /// Create a synchronizer against the public GitHub API
    ///
    /// # Errors
    /// Returns an error if configuration validation or client creation fails
    pub fn new(config: SyncConfig) -> Result<Self> {
        Self::with_api_root(config, crate::github::GITHUB_API_URL)
    }

    /// Create a synchronizer against an explicit API root
    ///
    /// # Errors
    /// Returns an error if configuration validation or client creation fails
    pub fn with_api_root(config: SyncConfig, api_root: &str) -> Result<Self> {
        config.validate()?;

        let (owner, repo) = config.parse_repository()?;
        let client = GitHubClient::with_api_root(&config.access_token, &owner, &repo, api_root)?;

        Ok(Self { client, config })
    }

    /// Replace the repository's label set: purge everything, then seed the catalog
    ///
    /// # Errors
    /// Returns an error on transport-level faults, aborting the phase in progress
    pub async fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.config.dry_run);
        self.purge_into(&mut report).await?;
        self.seed_into(&mut report).await?;
        Ok(report)
    }

    /// Delete every label currently in the repository
    ///
    /// A failed listing yields a report with a single [`SyncOutcome::ListingFailed`]
    /// entry and no delete attempts.
    ///
    /// # Errors
    /// Returns an error on transport-level faults
    pub async fn purge(&self) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.config.dry_run);
        self.purge_into(&mut report).await?;
        Ok(report)
    }

    /// Create every catalog entry, in catalog order
    ///
    /// # Errors
    /// Returns an error on transport-level faults
    pub async fn seed(&self) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.config.dry_run);
        self.seed_into(&mut report).await?;
        Ok(report)
    }

    /// Fetch the repository's current labels
    ///
    /// # Errors
    /// Returns an error on transport-level faults
    pub async fn current_labels(&self) -> Result<Listing> {
        self.client.list_labels().await
    }

    async fn purge_into(&self, report: &mut SyncReport) -> Result<()> {
        match self.client.list_labels().await? {
            Listing::Failed { status, body } => {
                report.add_outcome(SyncOutcome::ListingFailed {
                    detail: format!("HTTP {}: {}", status, body),
                });
            }
            Listing::Labels(labels) => {
                for label in labels {
                    if self.config.dry_run {
                        report.add_outcome(SyncOutcome::Deleted { name: label.name });
                        continue;
                    }

                    match self.client.delete_label(&label.name).await? {
                        ApiOutcome::Success => {
                            report.add_outcome(SyncOutcome::Deleted { name: label.name });
                        }
                        ApiOutcome::Failure { status, body } => {
                            report.add_outcome(SyncOutcome::DeleteFailed {
                                name: label.name,
                                detail: format!("HTTP {}: {}", status, body),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn seed_into(&self, report: &mut SyncReport) -> Result<()> {
        for label in self.config.catalog() {
            if self.config.dry_run {
                report.add_outcome(SyncOutcome::Created { name: label.name });
                continue;
            }

            match self.client.create_label(&label).await? {
                ApiOutcome::Success => {
                    report.add_outcome(SyncOutcome::Created { name: label.name });
                }
                ApiOutcome::Failure { status, body } => {
                    report.add_outcome(SyncOutcome::CreateFailed {
                        name: label.name,
                        detail: format!("HTTP {}: {}", status, body),
                    });
                }
            }
        }

        Ok(())
    }

    /// Reconcile the repository with the catalog without a full purge
    ///
    /// Creates missing labels, updates changed ones (delete and recreate),
    /// deletes extraneous ones, and leaves matches alone. Unlike `run`, there
    /// is no window where the label set is entirely absent.
    ///
    /// # Errors
    /// Returns an error on transport-level faults
    pub async fn reconcile(&self) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.config.dry_run);

        let current = match self.client.list_labels().await? {
            Listing::Labels(labels) => labels,
            Listing::Failed { status, body } => {
                // Without the actual state there is nothing safe to diff against
                report.add_outcome(SyncOutcome::ListingFailed {
                    detail: format!("HTTP {}: {}", status, body),
                });
                return Ok(report);
            }
        };

        for operation in plan_reconcile(&current, &self.config.catalog()) {
            if self.config.dry_run {
                report.add_outcome(planned_outcome(operation));
                continue;
            }

            match operation {
                ReconcileOp::Create { label } => match self.client.create_label(&label).await? {
                    ApiOutcome::Success => {
                        report.add_outcome(SyncOutcome::Created { name: label.name });
                    }
                    ApiOutcome::Failure { status, body } => {
                        report.add_outcome(SyncOutcome::CreateFailed {
                            name: label.name,
                            detail: format!("HTTP {}: {}", status, body),
                        });
                    }
                },
                ReconcileOp::Update {
                    name,
                    label,
                    changes,
                } => match self.update_label(&name, &label).await? {
                    ApiOutcome::Success => {
                        report.add_outcome(SyncOutcome::Updated { name, changes });
                    }
                    ApiOutcome::Failure { status, body } => {
                        report.add_outcome(SyncOutcome::UpdateFailed {
                            name,
                            detail: format!("HTTP {}: {}", status, body),
                        });
                    }
                },
                ReconcileOp::Delete { name } => match self.client.delete_label(&name).await? {
                    ApiOutcome::Success => {
                        report.add_outcome(SyncOutcome::Deleted { name });
                    }
                    ApiOutcome::Failure { status, body } => {
                        report.add_outcome(SyncOutcome::DeleteFailed {
                            name,
                            detail: format!("HTTP {}: {}", status, body),
                        });
                    }
                },
                ReconcileOp::Keep { name } => {
                    report.add_outcome(SyncOutcome::Unchanged { name });
                }
            }
        }

        Ok(report)
    }

    /// Update a label by deleting and recreating it
    async fn update_label(&self, current_name: &str, label: &Label) -> Result<ApiOutcome> {
        match self.client.delete_label(current_name).await? {
            ApiOutcome::Success => self.client.create_label(label).await,
            failure => Ok(failure),
        }
    }
}

/// The outcome a reconcile operation would have, for dry-run reporting
fn planned_outcome(operation: ReconcileOp) -> SyncOutcome {
    match operation {
        ReconcileOp::Create { label } => SyncOutcome::Created { name: label.name },
        ReconcileOp::Update { name, changes, .. } => SyncOutcome::Updated { name, changes },
        ReconcileOp::Delete { name } => SyncOutcome::Deleted { name },
        ReconcileOp::Keep { name } => SyncOutcome::Unchanged { name },
    }
}
