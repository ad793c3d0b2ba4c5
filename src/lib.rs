//! helmfile-values - container image extraction from helmfile in-line values
//!
//! Helmfile state files declare Helm releases and nested helmfiles, each of
//! which may carry in-line `values`. Chart values conventionally name their
//! container images under keys ending in `image` or `images`, either as a
//! single string (`quay.io/org/app:1.2.0`) or as a mapping with `registry`,
//! `repository` and `tag` fields. This crate finds those images and reports
//! them as docker dependencies, each carrying the exact substring to rewrite
//! and the template for its replacement.
//!
//! # Example Usage
//!
//! ```
//! use helmfile_values::{extract_package_file, ExtractOptions};
//!
//! let content = r#"
//! releases:
//!   - name: app
//!     chart: stable/app
//!     values:
//!       - image:
//!           repository: example/app
//!           tag: 2.4.1
//! "#;
//!
//! let package_file = extract_package_file(content, "helmfile.yaml", &ExtractOptions::default())
//!     .expect("image dependencies");
//! assert_eq!(package_file.deps[0].dep_name.as_deref(), Some("example/app"));
//! assert_eq!(package_file.deps[0].current_value.as_deref(), Some("2.4.1"));
//! ```
//!
//! # Project Structure
//!
//! - [`document`]: YAML documents as a closed tree of nodes
//! - [`manager`]: dependency records and the helmfile values extractor
//! - [`docker`]: parsing of docker image references
//! - [`discovery`]: locating helmfile state files below a directory
//! - [`cli`]: the `helmfile-values` command line

pub mod cli;
pub mod config;
pub mod discovery;
pub mod docker;
pub mod document;
pub mod fs;
pub mod manager;
pub mod util;

pub use config::{ConfigError, ExtractOptions, HelmfileValuesConfig, NonScalarFields};
pub use discovery::{ManifestScanner, ScanConfig};
pub use document::{load_all, DocumentError, Mapping, Node, Scalar};
pub use manager::helmfile::{extract_file, extract_package_file};
pub use manager::{ExtractionResult, PackageDependency, PackageFile, SkipReason};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
