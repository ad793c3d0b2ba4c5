//! Extraction integration tests
//!
//! Exercises the public extraction API against fixture files and state files
//! written to temporary directories.

use helmfile_values::fs::RealFileSystem;
use helmfile_values::{
    extract_file, extract_package_file, ExtractOptions, ManifestScanner, NonScalarFields,
    HelmfileValuesConfig, PackageDependency, SkipReason,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FILE_NAME: &str = "helmfile.yaml";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn summary(deps: &[PackageDependency]) -> Vec<(String, String)> {
    deps.iter()
        .map(|d| {
            (
                d.dep_name.clone().unwrap_or_default(),
                d.current_value.clone().unwrap_or_default(),
            )
        })
        .collect()
}

#[test]
fn test_multidoc_fixture() {
    let content = fs::read_to_string(fixture("multidoc.yaml")).expect("Failed to read fixture");
    let result = extract_package_file(&content, FILE_NAME, &ExtractOptions::default())
        .expect("Expected dependencies");

    assert_eq!(result.datasource, "docker");
    assert_eq!(
        summary(&result.deps),
        vec![
            ("another/repository".to_string(), "0.1.0".to_string()),
            (
                "container.registry.com/yetanother/repository".to_string(),
                "1.0.0".to_string()
            ),
        ]
    );
    assert!(result
        .deps
        .iter()
        .all(|d| d.versioning.as_deref() == Some("docker")));
}

#[test]
fn test_extract_file_from_disk() {
    let result = extract_file(
        &RealFileSystem::new(),
        &fixture("multidoc.yaml"),
        &ExtractOptions::default(),
    )
    .expect("Failed to read fixture");

    assert_eq!(result.map(|r| r.deps.len()), Some(2));
}

#[test]
fn test_extract_file_missing() {
    let result = extract_file(
        &RealFileSystem::new(),
        &fixture("does-not-exist.yaml"),
        &ExtractOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_mixed_release_values() {
    let content = r#"
releases:
  - name: web
    chart: stable/web
    values:
      - replicaCount: 2
        image: quay.io/team/web:3.1.0@sha256:0c6b8ff8c37e92eb1ca65ed8917e818927d5bf318b6f18896049b5d9afc28343
        sidecarImage: ${REGISTRY}/sidecar:1.0
        images:
          proxy:
            repository: envoyproxy/envoy
            tag: v1.28.0
          init:
            registry: docker.io
            repository: busybox
            tag: "1.36"
"#;
    let result = extract_package_file(content, FILE_NAME, &ExtractOptions::default())
        .expect("Expected dependencies");
    let deps = &result.deps;

    assert_eq!(deps.len(), 4);

    assert_eq!(deps[0].dep_name.as_deref(), Some("quay.io/team/web"));
    assert_eq!(deps[0].current_value.as_deref(), Some("3.1.0"));
    assert_eq!(
        deps[0].current_digest.as_deref(),
        Some("sha256:0c6b8ff8c37e92eb1ca65ed8917e818927d5bf318b6f18896049b5d9afc28343")
    );

    assert_eq!(deps[1].skip_reason, Some(SkipReason::ContainsVariable));

    assert_eq!(deps[2].dep_name.as_deref(), Some("envoyproxy/envoy"));
    assert_eq!(deps[2].replace_string.as_deref(), Some("v1.28.0"));

    assert_eq!(deps[3].dep_name.as_deref(), Some("docker.io/busybox"));
    assert_eq!(deps[3].current_value.as_deref(), Some("1.36"));
}

#[test]
fn test_options_change_results() {
    let content = r#"
releases:
  - name: app
    values:
      - app:
          image:
            repository: nested/app
            tag: { major: 1 }
"#;
    assert!(extract_package_file(content, FILE_NAME, &ExtractOptions::default()).is_none());

    let nested = ExtractOptions {
        nested_values: true,
        ..Default::default()
    };
    let result = extract_package_file(content, FILE_NAME, &nested).expect("Expected dependencies");
    assert_eq!(result.deps[0].current_value.as_deref(), Some("{major: 1}"));

    let strict = ExtractOptions {
        nested_values: true,
        non_scalar_fields: NonScalarFields::Reject,
    };
    assert!(extract_package_file(content, FILE_NAME, &strict).is_none());
}

#[test]
fn test_discover_and_extract_tree() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path();
    fs::create_dir_all(root.join("apps/web")).unwrap();
    fs::create_dir_all(root.join("charts/web")).unwrap();
    fs::copy(fixture("multidoc.yaml"), root.join("helmfile.yaml")).unwrap();
    fs::write(
        root.join("apps/web/helmfile.yaml"),
        "releases:\n  - name: web\n    values:\n      - image: nginx:1.25\n",
    )
    .unwrap();
    fs::write(root.join("charts/web/values.yaml"), "image: nginx:1.25\n").unwrap();

    let config = HelmfileValuesConfig {
        manager: Default::default(),
        options: Default::default(),
        max_depth: 10,
        max_files: 1000,
        log_level: "info".to_string(),
    };
    let scanner = ManifestScanner::new(root.to_path_buf(), config.file_matchers().unwrap())
        .expect("Failed to create scanner");
    let files = scanner.scan().expect("Scan failed");

    let rel: Vec<String> = files.iter().map(|f| scanner.relative_path(f)).collect();
    assert_eq!(rel, vec!["apps/web/helmfile.yaml", "helmfile.yaml"]);

    let fs = RealFileSystem::new();
    let counts: Vec<usize> = files
        .iter()
        .map(|f| {
            extract_file(&fs, f, &config.options)
                .unwrap()
                .map_or(0, |r| r.deps.len())
        })
        .collect();
    assert_eq!(counts, vec![1, 2]);
}

#[test]
fn test_wide_values_entry() {
    let mut content = String::from("releases:\n  - name: wide\n    values:\n      - image: app:1\n");
    for i in 0..40_000 {
        content.push_str(&format!("        filler{}: {}\n", i, i));
    }
    content.push_str("        lastImage: tail:2.10\n");

    let result = extract_package_file(&content, FILE_NAME, &ExtractOptions::default())
        .expect("Expected dependencies");
    assert_eq!(
        summary(&result.deps),
        vec![
            ("app".to_string(), "1".to_string()),
            ("tail".to_string(), "2.10".to_string()),
        ]
    );
}

#[test]
fn test_structured_tag_with_trailing_zero() {
    let content = "releases:\n  - name: app\n    values:\n      - image:\n          repository: app\n          tag: 1.10\n";
    let result = extract_package_file(content, FILE_NAME, &ExtractOptions::default())
        .expect("Expected dependencies");

    assert_eq!(result.deps[0].current_value.as_deref(), Some("1.10"));
    assert_eq!(result.deps[0].replace_string.as_deref(), Some("1.10"));
}
