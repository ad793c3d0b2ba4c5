//! Shape heuristics for image references in helmfile in-line values
//!
//! There is no standard for how Helm charts declare images in their values.
//! These checks recognize the most common conventions:
//!
//! ```yaml
//! image:
//!   registry: registry.example.com   # optional
//!   repository: some/repository
//!   tag: v1.0.0
//!
//! image: registry.example.com/some/repository:v1.0.0
//!
//! images:
//!   api:
//!     repository: foo
//!     tag: v1.0.0
//!   worker: registry.example.com/bar:v2.0.0
//! ```
//!
//! A non-match is not an error. Unrelated keys ending in "image" are common,
//! so the plural form only matches when every entry conforms.

use crate::config::NonScalarFields;
use crate::document::{Mapping, Node};
use regex::Regex;
use std::sync::OnceLock;

fn single_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)image$").expect("valid regex"))
}

fn multi_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)images$").expect("valid regex"))
}

/// Result of decoding one value as an image reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageShape<'a> {
    /// `registry/repository:tag` in a single string
    Inline(&'a str),
    /// Mapping with at least `repository` and `tag` keys
    Structured(&'a Mapping),
    NotAnImage,
}

impl ImageShape<'_> {
    pub fn is_image(&self) -> bool {
        !matches!(self, ImageShape::NotAnImage)
    }
}

/// Decodes a value as an image reference, regardless of its key.
///
/// Strings must be non-empty. Mappings only need the `repository` and `tag`
/// keys to be present; their values are checked only under
/// [`NonScalarFields::Reject`].
pub fn decode_image(value: &Node, non_scalar_fields: NonScalarFields) -> ImageShape<'_> {
    match value {
        Node::Scalar(_) => match value.as_str() {
            Some(image) if !image.is_empty() => ImageShape::Inline(image),
            _ => ImageShape::NotAnImage,
        },
        Node::Mapping(mapping) => {
            let (Some(repository), Some(tag)) = (mapping.get("repository"), mapping.get("tag"))
            else {
                return ImageShape::NotAnImage;
            };

            if non_scalar_fields == NonScalarFields::Reject
                && (!matches!(repository, Node::Scalar(_)) || !matches!(tag, Node::Scalar(_)))
            {
                return ImageShape::NotAnImage;
            }

            ImageShape::Structured(mapping)
        }
        Node::Sequence(_) => ImageShape::NotAnImage,
    }
}

/// Decodes the value of a key that may hold one image (`image`, `sidecarImage`, ...).
pub fn decode_single<'a>(
    key: &str,
    value: &'a Node,
    non_scalar_fields: NonScalarFields,
) -> ImageShape<'a> {
    if !single_key_re().is_match(key) {
        return ImageShape::NotAnImage;
    }
    decode_image(value, non_scalar_fields)
}

/// Decodes the value of a key that may hold a group of images (`images`, ...).
///
/// The group is a mapping of named entries or a sequence. Returns `None`
/// unless the group is non-empty and every entry decodes as an image.
pub fn decode_multi<'a>(
    key: &str,
    value: &'a Node,
    non_scalar_fields: NonScalarFields,
) -> Option<Vec<ImageShape<'a>>> {
    if !multi_key_re().is_match(key) {
        return None;
    }

    let entries: Vec<&Node> = match value {
        Node::Mapping(mapping) => mapping.values().collect(),
        Node::Sequence(items) => items.iter().collect(),
        Node::Scalar(_) => return None,
    };

    if entries.is_empty() {
        return None;
    }

    entries
        .into_iter()
        .map(|entry| Some(decode_image(entry, non_scalar_fields)).filter(|shape| shape.is_image()))
        .collect()
}

pub fn matches_single(key: &str, value: &Node, non_scalar_fields: NonScalarFields) -> bool {
    decode_single(key, value, non_scalar_fields).is_image()
}

pub fn matches_multi(key: &str, value: &Node, non_scalar_fields: NonScalarFields) -> bool {
    decode_multi(key, value, non_scalar_fields).is_some()
}
