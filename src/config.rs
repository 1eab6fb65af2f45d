//! Configuration Management
//!
//! Label catalog and run configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label Definition
///
/// A single entry of the label catalog, as sent to the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name (unique within a repository)
    pub name: String,

    /// Label color (6-digit hex, leading # accepted)
    pub color: String,

    /// Label description
    #[serde(default)]
    pub description: String,
}

impl Label {
    /// Create a new label definition
    ///
    /// # Errors
    /// Returns an error if the name is empty or the color format is invalid
    pub fn new<S: Into<String>>(name: S, color: S, description: S) -> Result<Self> {
        let label = Self {
            name: name.into(),
            color: color.into(),
            description: description.into(),
        };

        label.validate()?;
        Ok(label)
    }

    /// Validate the label definition
    ///
    /// # Errors
    /// - If the name is empty
    /// - If the color is not a 6-digit hex code
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::label_validation("Label name cannot be empty"));
        }

        if !is_valid_hex_color(&Self::normalize_color(&self.color)) {
            return Err(Error::InvalidLabelColor(self.color.clone()));
        }

        Ok(())
    }

    /// Normalize color (remove leading # and convert to lowercase)
    pub fn normalize_color(color: &str) -> String {
        color.trim_start_matches('#').to_lowercase()
    }
}

/// Run Configuration
///
/// Everything a run needs, supplied explicitly so the library surface
/// can be driven programmatically; prompting lives at the CLI boundary.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// GitHub access token
    pub access_token: String,

    /// Target repository (owner/repo format)
    pub repository: String,

    /// Dry-run mode (don't make actual changes)
    pub dry_run: bool,

    /// Label catalog (use the built-in catalog if None)
    pub labels: Option<Vec<Label>>,
}

impl SyncConfig {
    /// Validate configuration
    ///
    /// # Errors
    /// - If the access token is empty
    /// - If the repository format is invalid
    /// - If any catalog entry is invalid
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::config_validation("Access token is required"));
        }

        parse_repository(&self.repository)?;

        if let Some(labels) = &self.labels {
            for label in labels {
                label.validate()?;
            }
        }

        Ok(())
    }

    /// Get repository owner and name
    pub fn parse_repository(&self) -> Result<(String, String)> {
        parse_repository(&self.repository)
    }

    /// The catalog this run will seed
    pub fn catalog(&self) -> Vec<Label> {
        self.labels.clone().unwrap_or_else(default_catalog)
    }
}

/// Parse repository string into owner and name
///
/// # Errors
/// Returns an error if the format is not "owner/repo"
pub fn parse_repository(repo: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = repo.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::InvalidRepositoryFormat(repo.to_string()));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// The built-in label catalog
///
/// Seventeen labels covering the usual issue-tracking taxonomy.
pub fn default_catalog() -> Vec<Label> {
    [
        (
            "bug",
            "d73a4a",
            "Indicates a problem that impairs or prevents the functions of the product",
        ),
        (
            "dependencies",
            "0366d6",
            "Concerns outdated, broken, or problematic dependencies",
        ),
        (
            "documentation",
            "0075ca",
            "Relates to improvements or additions to documentation",
        ),
        (
            "duplicate",
            "cfd3d7",
            "Signals an issue that has already been reported, often with a reference to the original",
        ),
        (
            "enhancement",
            "a2eeef",
            "Suggests a new feature or improvement to existing functionality",
        ),
        (
            "environment",
            "f9d0c4",
            "Involves issues related to the project's development, testing, or production environment",
        ),
        (
            "good first issue",
            "7057ff",
            "Suitable for first-time contributors, these issues are a great way to get involved",
        ),
        (
            "help wanted",
            "008672",
            "Requests assistance from the community or team members for an issue or initiative",
        ),
        (
            "invalid",
            "e4e669",
            "Marks an issue that is no longer relevant or that has been filed incorrectly",
        ),
        (
            "performance",
            "fbca04",
            "Highlights areas of the codebase that could be optimized for speed and efficiency",
        ),
        (
            "question",
            "d876e3",
            "Seeks further information or clarification on a topic or issue",
        ),
        (
            "refactor",
            "1d76db",
            "Suggests improvements for code organization or architecture without altering behavior",
        ),
        (
            "security",
            "b60205",
            "Concerns or reports related to security vulnerabilities",
        ),
        (
            "test-case",
            "5319e7",
            "Indicates missing tests or proposes new ones for better coverage",
        ),
        (
            "user-story",
            "c2e0c6",
            "Describes a software feature from an end-user perspective, focusing on their needs and experiences",
        ),
        (
            "violation",
            "e11d21",
            "Pertains to vulnerabilities that could impact the security of the project",
        ),
        (
            "wontfix",
            "000000",
            "Acknowledges an issue that the project has decided not to address at the present time",
        ),
    ]
    .into_iter()
    .map(|(name, color, description)| Label {
        name: name.to_string(),
        color: color.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Load a label catalog from a JSON file
///
/// # Errors
/// If file reading, parsing, or validation fails
pub fn load_labels_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Label>> {
    let content = std::fs::read_to_string(path)?;
    let labels: Vec<Label> = serde_json::from_str(&content)?;

    for label in &labels {
        label.validate()?;
    }

    Ok(labels)
}

/// Load a label catalog from a YAML file
///
/// # Errors
/// If file reading, parsing, or validation fails
pub fn load_labels_from_yaml<P: AsRef<Path>>(path: P) -> Result<Vec<Label>> {
    let content = std::fs::read_to_string(path)?;
    let labels: Vec<Label> = serde_yaml::from_str(&content)?;

    for label in &labels {
        label.validate()?;
    }

    Ok(labels)
}

/// Load a label catalog from a file, detecting format by extension
///
/// # Errors
/// If reading, parsing, or validation fails, or if the extension is unsupported
pub fn load_labels_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Label>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Catalog file not found: {}", path.display()),
        )
        .into());
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_labels_from_json(path),
        Some("yaml") | Some("yml") => load_labels_from_yaml(path),
        _ => Err(Error::config_validation(
            "Catalog file must be .json, .yaml, or .yml",
        )),
    }
}

/// Validate hex color code
///
/// # Arguments
/// - `color`: Color code (6-digit hex without #)
fn is_valid_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_hex_color() {
        assert!(is_valid_hex_color("ff0000"));
        assert!(is_valid_hex_color("00FF00"));
        assert!(is_valid_hex_color("123abc"));

        assert!(!is_valid_hex_color("ff00")); // Too short
        assert!(!is_valid_hex_color("ff0000x")); // Invalid character
        assert!(!is_valid_hex_color("#ff0000")); // With #
    }

    #[test]
    fn test_parse_repository() {
        assert!(parse_repository("owner/repo").is_ok());
        assert!(parse_repository("org/project").is_ok());

        assert!(parse_repository("repo").is_err()); // No slash
        assert!(parse_repository("/repo").is_err()); // No owner
        assert!(parse_repository("owner/").is_err()); // No repo name
        assert!(parse_repository("owner/repo/sub").is_err()); // Too many parts
    }

    #[test]
    fn test_label_validation() {
        let bare = Label::new("test", "ff0000", "").unwrap();
        assert_eq!(bare.name, "test");

        // Leading # is accepted and normalized
        let hashed = Label::new("test", "#FF0000", "").unwrap();
        assert_eq!(Label::normalize_color(&hashed.color), "ff0000");

        assert!(Label::new("test", "invalid", "").is_err());
        assert!(Label::new("", "ff0000", "").is_err());
        assert!(Label::new("   ", "ff0000", "").is_err());
    }

    #[test]
    fn test_default_catalog_shape() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 17);
        assert_eq!(catalog.first().unwrap().name, "bug");
        assert_eq!(catalog.last().unwrap().name, "wontfix");

        // Every entry is valid and names are unique
        let mut names = std::collections::HashSet::new();
        for label in &catalog {
            label.validate().unwrap();
            assert!(names.insert(label.name.clone()));
        }
    }

    #[test]
    fn test_sync_config_empty_token_error() {
        let config = SyncConfig {
            access_token: "".to_string(),
            repository: "owner/repo".to_string(),
            dry_run: false,
            labels: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_config_invalid_repo_format_error() {
        let config = SyncConfig {
            access_token: "token".to_string(),
            repository: "invalid".to_string(),
            dry_run: false,
            labels: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_config_invalid_label_color_error() {
        let config = SyncConfig {
            access_token: "token".to_string(),
            repository: "owner/repo".to_string(),
            dry_run: false,
            labels: Some(vec![Label {
                name: "test".to_string(),
                color: "invalid".to_string(),
                description: String::new(),
            }]),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_config_valid_and_catalog_fallback() {
        let config = SyncConfig {
            access_token: "token".to_string(),
            repository: "owner/repo".to_string(),
            dry_run: false,
            labels: None,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog(), default_catalog());

        let (owner, repo) = config.parse_repository().unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_load_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r##"[{"name":"bug","color":"ff0000"}]"##).unwrap();
        let labels = load_labels_from_json(&path).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "bug");
        assert_eq!(labels[0].description, "");
    }

    #[test]
    fn test_load_valid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.yaml");
        std::fs::write(&path, "- name: bug\n  color: \"ff0000\"\n  description: A bug\n")
            .unwrap();
        let labels = load_labels_from_yaml(&path).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].description, "A bug");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_labels_from_json(&path).is_err());
    }

    #[test]
    fn test_load_json_with_invalid_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r##"[{"name":"bug","color":"invalid"}]"##).unwrap();
        assert!(load_labels_from_json(&path).is_err());
    }

    #[test]
    fn test_load_labels_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("labels.json");
        std::fs::write(&json, r##"[{"name":"bug","color":"ff0000"}]"##).unwrap();
        assert_eq!(load_labels_from_file(&json).unwrap().len(), 1);

        let yml = dir.path().join("labels.yml");
        std::fs::write(&yml, "- name: bug\n  color: \"ff0000\"\n").unwrap();
        assert_eq!(load_labels_from_file(&yml).unwrap().len(), 1);

        let toml = dir.path().join("labels.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(load_labels_from_file(&toml).is_err());
    }

    #[test]
    fn test_load_labels_from_file_not_found() {
        let path = PathBuf::from("/nonexistent/labels.json");
        assert!(load_labels_from_file(&path).is_err());
    }
}
