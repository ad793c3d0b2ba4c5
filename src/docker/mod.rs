//! Container image reference parsing
//!
//! Splits `registry/repository:tag@digest` strings into dependency records for
//! the docker datasource.

use crate::manager::{PackageDependency, SkipReason};

pub const DATASOURCE_ID: &str = "docker";
pub const VERSIONING_ID: &str = "docker";

const DEP_NAME_TEMPLATE: &str =
    "{{depName}}{{#if newValue}}:{{newValue}}{{/if}}{{#if newDigest}}@{{newDigest}}{{/if}}";
const LOOKUP_NAME_TEMPLATE: &str =
    "{{lookupName}}{{#if newValue}}:{{newValue}}{{/if}}{{#if newDigest}}@{{newDigest}}{{/if}}";

/// Docker Hub namespaces that are dropped from the display name.
const SPECIAL_PREFIXES: [&str; 3] = ["amd64", "arm64", "library"];

/// Splits an image string into name, tag and digest.
///
/// A trailing `:segment` is only a tag when it contains no `/`; otherwise the
/// colon belongs to a registry port (`localhost:5000/app`).
pub fn split_image_parts(image: &str) -> PackageDependency {
    if image.contains('$') {
        return PackageDependency {
            skip_reason: Some(SkipReason::ContainsVariable),
            ..Default::default()
        };
    }

    let (dep_tag, current_digest) = match image.split_once('@') {
        Some((dep_tag, digest)) => (dep_tag, Some(digest.to_string())),
        None => (image, None),
    };

    let (dep_name, current_value) = match dep_tag.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, Some(tag.to_string())),
        _ => (dep_tag, None),
    };

    PackageDependency {
        dep_name: Some(dep_name.to_string()),
        current_value,
        current_digest,
        ..Default::default()
    }
}

/// Builds a docker dependency record from an image string.
///
/// With `specify_replace_string` the whole image string becomes the
/// replacement target, so the updater rewrites name, tag and digest together.
pub fn get_dep(image: &str, specify_replace_string: bool) -> PackageDependency {
    let mut dep = split_image_parts(image);

    if specify_replace_string {
        dep.replace_string = Some(image.to_string());
        dep.auto_replace_string_template = Some(DEP_NAME_TEMPLATE.to_string());
    }
    dep.datasource = Some(DATASOURCE_ID.to_string());

    if let Some(dep_name) = dep.dep_name.take() {
        let mut name = dep_name.as_str();
        for prefix in SPECIAL_PREFIXES {
            if let Some(stripped) = name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                dep.lookup_name = Some(name.to_string());
                name = stripped;
                if specify_replace_string {
                    dep.auto_replace_string_template = Some(LOOKUP_NAME_TEMPLATE.to_string());
                }
            }
        }

        if name == "calico/node" {
            dep.commit_message_topic = Some("Calico".to_string());
        }
        dep.dep_name = Some(name.to_string());
    }

    dep
}
