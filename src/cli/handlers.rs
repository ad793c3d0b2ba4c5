//! Command handlers. Each returns the process exit code.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::commands::{ConfigArgs, ExtractArgs};
use super::output::{FileReport, OutputFormatter};
use crate::config::{ExtractOptions, HelmfileValuesConfig};
use crate::discovery::{ManifestScanner, ScanConfig};
use crate::fs::{FileSystem, RealFileSystem};
use crate::manager::helmfile::extract_file;

pub fn handle_extract(args: &ExtractArgs, quiet: bool) -> i32 {
    let config = HelmfileValuesConfig::default();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return 1;
    }

    let reports = match run_extract(args, &config) {
        Ok(reports) => reports,
        Err(e) => {
            error!("Extraction failed: {:#}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format(&reports) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                error!("Failed to write output to {}: {}", path.display(), e);
                return 1;
            }
            if !quiet {
                info!("Output written to {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    0
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = HelmfileValuesConfig::default();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return 1;
    }

    match OutputFormatter::new(args.format.into()).format_config(&config) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format configuration: {:#}", e);
            1
        }
    }
}

/// Command-line flags override the environment-derived options.
fn effective_options(args: &ExtractArgs, config: &HelmfileValuesConfig) -> ExtractOptions {
    ExtractOptions {
        nested_values: args.nested_values || config.options.nested_values,
        non_scalar_fields: args
            .non_scalar_fields
            .unwrap_or(config.options.non_scalar_fields),
    }
}

/// Extracts every requested path. Files are always extracted; directories are
/// searched with the manager's file patterns.
pub fn run_extract(args: &ExtractArgs, config: &HelmfileValuesConfig) -> Result<Vec<FileReport>> {
    let options = effective_options(args, config);
    let matchers = config.file_matchers()?;
    let fs = RealFileSystem::new();

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths.clone()
    };

    let mut reports = Vec::new();
    let mut seen = HashSet::new();
    for path in &paths {
        if fs.is_file(path) {
            if !seen.insert(canonical(path)) {
                debug!(file = %path.display(), "Skipping already extracted helmfile");
                continue;
            }
            let result = extract_file(&fs, path, &options)?;
            reports.push(FileReport::new(path.display().to_string(), result));
            continue;
        }

        if !fs.is_dir(path) {
            return Err(anyhow!("Path does not exist: {}", path.display()));
        }

        let scanner = ManifestScanner::new(path.clone(), matchers.clone())
            .with_context(|| format!("Failed to scan {}", path.display()))?
            .with_config(ScanConfig {
                max_depth: config.max_depth,
                max_files: config.max_files,
            });

        for file in scanner.scan()? {
            let label = display_label(path, &scanner.relative_path(&file));
            if !seen.insert(canonical(&file)) {
                debug!(file = %label, "Skipping already extracted helmfile");
                continue;
            }
            debug!(file = %label, "Extracting discovered helmfile");
            let result = extract_file(&fs, &file, &options)?;
            reports.push(FileReport::new(label, result));
        }
    }

    Ok(reports)
}

/// Identity of a file across overlapping path arguments.
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn display_label(dir: &Path, relative: &str) -> String {
    if dir == Path::new(".") {
        return relative.to_string();
    }
    format!("{}/{}", dir.display().to_string().trim_end_matches('/'), relative)
}
