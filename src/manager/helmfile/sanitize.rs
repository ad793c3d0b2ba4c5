//! Normalization of structured image entries

use crate::document::{Mapping, Node};
use tracing::debug;

/// Canonical parts of a structured image.
///
/// `registry` is either empty or ends with `/`, so the full reference is a
/// plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDependency {
    pub registry: String,
    pub repository: String,
    pub tag: String,
}

impl ImageDependency {
    /// `registry/repository:tag`
    pub fn image(&self) -> String {
        format!("{}{}:{}", self.registry, self.repository, self.tag)
    }
}

/// Normalizes a structured image mapping.
///
/// `repository` and `tag` are always rendered as text, so numeric YAML
/// values such as `tag: 1.0` keep their written form.
pub fn sanitize(image: &Mapping) -> ImageDependency {
    let registry = match image.get("registry") {
        None => String::new(),
        Some(node) if node.is_null() => String::new(),
        Some(node) => {
            let registry = coerce_field("registry", node);
            if registry.is_empty() {
                registry
            } else {
                format!("{}/", registry)
            }
        }
    };

    let repository = image
        .get("repository")
        .map(|node| coerce_field("repository", node))
        .unwrap_or_default();
    let tag = image
        .get("tag")
        .map(|node| coerce_field("tag", node))
        .unwrap_or_default();

    ImageDependency {
        registry,
        repository,
        tag,
    }
}

fn coerce_field(field: &str, node: &Node) -> String {
    let text = node.render();
    if !matches!(node, Node::Scalar(_)) {
        debug!(field, value = %text, "Coerced non-scalar image field to text");
    }
    text
}
