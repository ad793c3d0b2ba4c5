//! Output formatting for extraction reports
//!
//! Reports render as JSON, YAML or human-readable text. JSON and YAML
//! produce one entry per file, keyed by path in extraction order, whose value
//! is the package file or `null` when the file had no image dependencies.
//!
//! # Example
//!
//! ```
//! use helmfile_values::cli::output::{FileReport, OutputFormat, OutputFormatter};
//!
//! let reports = vec![FileReport::new("helmfile.yaml", None)];
//! let output = OutputFormatter::new(OutputFormat::Json).format(&reports).unwrap();
//! assert!(output.contains("\"helmfile.yaml\": null"));
//! ```

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::HelmfileValuesConfig;
use crate::manager::{PackageDependency, PackageFile, SkipReason};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Extraction result for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub result: Option<PackageFile>,
}

impl FileReport {
    pub fn new(file: impl Into<String>, result: Option<PackageFile>) -> Self {
        Self {
            file: file.into(),
            result,
        }
    }

    pub fn dep_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.deps.len())
    }
}

struct Reports<'a>(&'a [FileReport]);

impl Serialize for Reports<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for report in self.0 {
            map.serialize_entry(&report.file, &report.result)?;
        }
        map.end()
    }
}

/// Output formatter for extraction reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the reports of one extraction run
    pub fn format(&self, reports: &[FileReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&Reports(reports))
                .context("Failed to serialize extraction report to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&Reports(reports))
                .context("Failed to serialize extraction report to YAML"),
            OutputFormat::Human => Ok(self.format_human(reports)),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &HelmfileValuesConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(config)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(config).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(format!("{}\n", config)),
        }
    }

    fn format_human(&self, reports: &[FileReport]) -> String {
        let mut output = String::new();

        output.push_str(RULE);
        output.push('\n');
        output.push_str("Helmfile Image Dependencies\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        if reports.is_empty() {
            output.push_str("No helmfile state files found\n");
            return output;
        }

        for report in reports {
            output.push_str(&format!("{}\n", report.file));
            match &report.result {
                Some(package_file) => {
                    let count = package_file.deps.len();
                    for (i, dep) in package_file.deps.iter().enumerate() {
                        let connector = if i == count - 1 { "\u{2514}" } else { "\u{251C}" };
                        output.push_str(&format!("{}\u{2500} {}\n", connector, describe(dep)));
                    }
                }
                None => output.push_str("\u{2514}\u{2500} (no image dependencies)\n"),
            }
            output.push('\n');
        }

        let total: usize = reports.iter().map(FileReport::dep_count).sum();
        output.push_str(&format!(
            "{} dependencies in {} files\n",
            total,
            reports.len()
        ));

        output
    }
}

fn describe(dep: &PackageDependency) -> String {
    let mut line = dep
        .dep_name
        .as_ref()
        .or(dep.replace_string.as_ref())
        .cloned()
        .unwrap_or_else(|| "<unnamed>".to_string());
    if let Some(value) = &dep.current_value {
        line.push_str(&format!(" {}", value));
    }
    if let Some(digest) = &dep.current_digest {
        line.push_str(&format!(" @{}", digest));
    }
    if let Some(SkipReason::ContainsVariable) = dep.skip_reason {
        line.push_str(" (skipped: contains-variable)");
    }
    line
}
