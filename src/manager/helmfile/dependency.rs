//! Conversion of decoded image shapes into dependency records

use super::heuristics::ImageShape;
use super::sanitize::{sanitize, ImageDependency};
use crate::docker::{self, VERSIONING_ID};
use crate::manager::PackageDependency;

/// Replacement template for structured images, where only the tag is rewritten.
pub const TAG_REPLACE_TEMPLATE: &str = "{{newValue}}{{#if newDigest}}@{{newDigest}}{{/if}}";

/// Builds the record for a structured image.
///
/// The tag sits in its own field in the source text, so the tag alone is the
/// replacement target instead of the assembled image string.
pub fn helm_dep(image: &ImageDependency) -> PackageDependency {
    let mut dep = docker::get_dep(&image.image(), false);
    dep.current_value = Some(image.tag.clone());
    dep.versioning = Some(VERSIONING_ID.to_string());
    dep.replace_string = Some(image.tag.clone());
    dep.auto_replace_string_template = Some(TAG_REPLACE_TEMPLATE.to_string());
    dep
}

/// Builds a dependency record from a decoded shape. `NotAnImage` yields `None`.
pub fn process_dependency(shape: ImageShape<'_>) -> Option<PackageDependency> {
    match shape {
        ImageShape::Inline(image) => Some(docker::get_dep(image, true)),
        ImageShape::Structured(mapping) => Some(helm_dep(&sanitize(mapping))),
        ImageShape::NotAnImage => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::DATASOURCE_ID;
    use crate::document::{load_all, Node};

    fn node(yaml: &str) -> Node {
        load_all(yaml).unwrap().remove(0)
    }

    #[test]
    fn test_structured_dependency() {
        let value = node("registry: container.registry.com\nrepository: some/repository\ntag: 0.0.1\n");
        let dep = process_dependency(ImageShape::Structured(value.as_mapping().unwrap())).unwrap();

        assert_eq!(
            dep.dep_name.as_deref(),
            Some("container.registry.com/some/repository")
        );
        assert_eq!(dep.current_value.as_deref(), Some("0.0.1"));
        assert_eq!(dep.datasource.as_deref(), Some(DATASOURCE_ID));
        assert_eq!(dep.versioning.as_deref(), Some(VERSIONING_ID));
        assert_eq!(dep.replace_string.as_deref(), Some("0.0.1"));
        assert_eq!(
            dep.auto_replace_string_template.as_deref(),
            Some(TAG_REPLACE_TEMPLATE)
        );
    }

    #[test]
    fn test_inline_dependency_uses_image_defaults() {
        let dep = process_dependency(ImageShape::Inline(
            "container.registry.com/some/repository:0.0.1",
        ))
        .unwrap();

        assert_eq!(
            dep.dep_name.as_deref(),
            Some("container.registry.com/some/repository")
        );
        assert_eq!(dep.current_value.as_deref(), Some("0.0.1"));
        assert_eq!(
            dep.replace_string.as_deref(),
            Some("container.registry.com/some/repository:0.0.1")
        );
        assert!(dep.versioning.is_none());
    }

    #[test]
    fn test_tag_with_digest_stays_whole() {
        let value = node("repository: app\ntag: 1.0@sha256:abc\n");
        let dep = process_dependency(ImageShape::Structured(value.as_mapping().unwrap())).unwrap();

        assert_eq!(dep.dep_name.as_deref(), Some("app"));
        assert_eq!(dep.current_value.as_deref(), Some("1.0@sha256:abc"));
        assert_eq!(dep.replace_string.as_deref(), Some("1.0@sha256:abc"));
    }

    #[test]
    fn test_registry_port_in_structured_image() {
        let value = node("registry: localhost:5000\nrepository: team/app\ntag: v2\n");
        let dep = process_dependency(ImageShape::Structured(value.as_mapping().unwrap())).unwrap();

        assert_eq!(dep.dep_name.as_deref(), Some("localhost:5000/team/app"));
        assert_eq!(dep.current_value.as_deref(), Some("v2"));
    }

    #[test]
    fn test_not_an_image_yields_none() {
        assert!(process_dependency(ImageShape::NotAnImage).is_none());
    }
}
