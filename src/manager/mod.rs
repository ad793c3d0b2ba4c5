//! Package managers and the dependency records they produce

pub mod helmfile;

use serde::{Deserialize, Serialize};

/// Why a dependency was extracted but should not be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The image string references a template or environment variable.
    ContainsVariable,
}

/// One dependency discovered in a package file, plus what an updater needs
/// to rewrite it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDependency {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dep_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning: Option<String>,
    /// Literal substring of the source text that holds the current value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_string: Option<String>,
    /// Handlebars-style template rendered to produce the replacement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_replace_string_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message_topic: Option<String>,
}

/// Dependencies extracted from one package file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFile {
    pub deps: Vec<PackageDependency>,
    pub datasource: String,
}

/// `None` when the file yielded no dependencies at all.
pub type ExtractionResult = Option<PackageFile>;
