//! Image extraction from helmfile in-line values
//!
//! Helmfile state files declare releases and nested helmfiles, each of which
//! may carry a `values` list of in-line chart values. Charts commonly accept
//! their container images through keys such as `image` or `images`, so those
//! keys are searched heuristically and turned into docker dependencies.
//!
//! # Example
//!
//! ```
//! use helmfile_values::config::ExtractOptions;
//! use helmfile_values::manager::helmfile::extract_package_file;
//!
//! let content = r#"
//! releases:
//!   - name: backend
//!     values:
//!       - image:
//!           registry: container.registry.com
//!           repository: some/repository
//!           tag: 0.0.1
//! "#;
//!
//! let file = extract_package_file(content, "helmfile.yaml", &ExtractOptions::default())
//!     .expect("one image");
//! assert_eq!(file.deps[0].dep_name.as_deref(), Some("container.registry.com/some/repository"));
//! assert_eq!(file.deps[0].current_value.as_deref(), Some("0.0.1"));
//! ```

pub mod dependency;
pub mod heuristics;
pub mod sanitize;
pub mod scanner;
pub mod walker;

pub use heuristics::{decode_image, matches_multi, matches_single, ImageShape};
pub use sanitize::{sanitize, ImageDependency};
pub use scanner::{scan_documents, SectionKind};
pub use walker::extract_dependencies;

use crate::config::ExtractOptions;
use crate::docker::DATASOURCE_ID;
use crate::document::load_all;
use crate::fs::FileSystem;
use crate::manager::{ExtractionResult, PackageFile};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// File patterns identifying helmfile state files.
pub const FILE_MATCH: [&str; 1] = ["(^|/)helmfile.yaml$"];

pub const COMMIT_MESSAGE_TOPIC: &str = "helmfile values {{depName}}";

/// Helm repository aliases known to the manager.
pub const ALIASES: [(&str, &str); 1] = [("stable", "https://charts.helm.sh/stable")];

/// Extracts image dependencies from the content of a helmfile state file.
///
/// Never fails: malformed YAML is logged at debug level and, like a file
/// without any images, yields `None`.
pub fn extract_package_file(
    content: &str,
    file_name: &str,
    options: &ExtractOptions,
) -> ExtractionResult {
    let documents = match load_all(content) {
        Ok(documents) => documents,
        Err(error) => {
            debug!(file_name, error = %error, "Failed to parse helmfile helmfile.yaml");
            return None;
        }
    };

    let deps = scan_documents(&documents, options);
    if deps.is_empty() {
        debug!(
            file_name,
            "helmfile.yaml has no image dependencies in in-line values"
        );
        return None;
    }

    debug!(file_name, deps = deps.len(), "Extracted helmfile image dependencies");
    Some(PackageFile {
        deps,
        datasource: DATASOURCE_ID.to_string(),
    })
}

/// Reads `path` and extracts its image dependencies.
///
/// Only reading the file can fail; the content itself is handled as in
/// [`extract_package_file`].
pub fn extract_file<F: FileSystem>(
    fs: &F,
    path: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    let content = fs
        .read_to_string(path)
        .with_context(|| format!("Failed to read helmfile {}", path.display()))?;

    Ok(extract_package_file(
        &content,
        &path.display().to_string(),
        options,
    ))
}
