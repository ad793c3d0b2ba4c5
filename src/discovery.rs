//! Discovery of helmfile state files below a directory

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_files: 1000,
        }
    }
}

pub struct ManifestScanner {
    root: PathBuf,
    matchers: Vec<Regex>,
    config: ScanConfig,
}

impl ManifestScanner {
    pub fn new(root: PathBuf, matchers: Vec<Regex>) -> Result<Self> {
        if !root.exists() {
            return Err(anyhow::anyhow!("Path does not exist: {:?}", root));
        }
        if !root.is_dir() {
            return Err(anyhow::anyhow!("Path is not a directory: {:?}", root));
        }

        let root = root
            .canonicalize()
            .context("Failed to canonicalize scan root")?;

        debug!(root = %root.display(), patterns = matchers.len(), "ManifestScanner initialized");

        Ok(Self {
            root,
            matchers,
            config: ScanConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns matching files in sorted order.
    ///
    /// Paths are matched relative to the root with `/` separators, so
    /// patterns like `(^|/)helmfile.yaml$` behave the same on every platform.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let start = Instant::now();

        info!(
            root = %self.root.display(),
            max_depth = self.config.max_depth,
            max_files = self.config.max_files,
            "Scanning for helmfile state files"
        );

        let mut matches = Vec::new();
        let mut files_scanned = 0;

        for result in WalkBuilder::new(&self.root)
            .max_depth(Some(self.config.max_depth))
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            if files_scanned >= self.config.max_files {
                warn!(
                    files_scanned,
                    max_files = self.config.max_files,
                    "Reached file limit, stopping scan"
                );
                break;
            }
            files_scanned += 1;

            let path = entry.path();
            let rel_path = self.relative_path(path);
            if self.matchers.iter().any(|re| re.is_match(&rel_path)) {
                debug!(path = %rel_path, "Found helmfile state file");
                matches.push(path.to_path_buf());
            }
        }

        matches.sort();

        info!(
            matches = matches.len(),
            files_scanned,
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Scan completed"
        );

        Ok(matches)
    }

    /// Path of `path` relative to the root, joined with `/`.
    pub fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn default_matchers() -> Vec<Regex> {
        vec![Regex::new("(^|/)helmfile.yaml$").unwrap()]
    }

    fn create_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("envs/prod")).unwrap();
        fs::create_dir_all(base.join("charts/app")).unwrap();
        fs::write(base.join("helmfile.yaml"), "releases: []").unwrap();
        fs::write(base.join("envs/prod/helmfile.yaml"), "releases: []").unwrap();
        fs::write(base.join("envs/prod/myhelmfile.yaml"), "releases: []").unwrap();
        fs::write(base.join("charts/app/values.yaml"), "image: app:1").unwrap();
        dir
    }

    #[test]
    fn test_finds_matching_files_sorted() {
        let temp = create_tree();
        let scanner = ManifestScanner::new(temp.path().to_path_buf(), default_matchers()).unwrap();
        let found = scanner.scan().unwrap();

        let rel: Vec<String> = found.iter().map(|p| scanner.relative_path(p)).collect();
        assert_eq!(rel, vec!["envs/prod/helmfile.yaml", "helmfile.yaml"]);
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let temp = create_tree();
        let scanner = ManifestScanner::new(temp.path().to_path_buf(), default_matchers())
            .unwrap()
            .with_config(ScanConfig {
                max_depth: 1,
                max_files: 1000,
            });

        let found = scanner.scan().unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("helmfile.yaml"));
    }

    #[test]
    fn test_respects_gitignore() {
        let temp = create_tree();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".gitignore"), "envs/\n").unwrap();

        let scanner = ManifestScanner::new(temp.path().to_path_buf(), default_matchers()).unwrap();
        let found = scanner.scan().unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_root() {
        let result = ManifestScanner::new(PathBuf::from("/nonexistent/helmfiles"), default_matchers());
        assert!(result.is_err());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = create_tree();
        let result = ManifestScanner::new(temp.path().join("helmfile.yaml"), default_matchers());
        assert!(result.is_err());
    }
}
