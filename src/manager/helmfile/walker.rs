//! Walks the in-line `values` of a release or nested helmfile section

use super::dependency::process_dependency;
use super::heuristics::{decode_multi, decode_single};
use crate::config::ExtractOptions;
use crate::document::{Mapping, Node};
use crate::manager::PackageDependency;

/// Extracts image dependencies from a section's `values` list.
///
/// Sections without a `values` sequence, and `values` entries that are not
/// mappings (file references such as `- values.yaml.gotmpl`), contribute
/// nothing.
pub fn extract_dependencies(section: &Node, options: &ExtractOptions) -> Vec<PackageDependency> {
    let mut deps = Vec::new();

    let Some(values) = section.get("values").and_then(Node::as_sequence) else {
        return deps;
    };

    for entry in values.iter().filter_map(Node::as_mapping) {
        if options.nested_values {
            walk_nested(entry, options, &mut deps);
        } else {
            for (key, value) in entry.iter() {
                collect(key, value, options, &mut deps);
            }
        }
    }

    deps
}

/// Applies the heuristics to one key. Returns whether the key held images.
fn collect(
    key: &str,
    value: &Node,
    options: &ExtractOptions,
    deps: &mut Vec<PackageDependency>,
) -> bool {
    let single = decode_single(key, value, options.non_scalar_fields);
    if single.is_image() {
        deps.extend(process_dependency(single));
        return true;
    }

    match decode_multi(key, value, options.non_scalar_fields) {
        Some(shapes) => {
            deps.extend(shapes.into_iter().filter_map(process_dependency));
            true
        }
        None => false,
    }
}

enum Frame<'a> {
    Entry(&'a str, &'a Node),
    Item(&'a Node),
}

/// Pre-order walk over every mapping key below `entry`.
///
/// Uses an explicit stack so deeply nested values cannot exhaust the call
/// stack. Values recognized as images are not descended into.
fn walk_nested(entry: &Mapping, options: &ExtractOptions, deps: &mut Vec<PackageDependency>) {
    let mut stack: Vec<Frame<'_>> = entry
        .iter()
        .rev()
        .map(|(key, value)| Frame::Entry(key, value))
        .collect();

    while let Some(frame) = stack.pop() {
        let node = match frame {
            Frame::Entry(key, value) => {
                if collect(key, value, options, deps) {
                    continue;
                }
                value
            }
            Frame::Item(node) => node,
        };

        match node {
            Node::Mapping(mapping) => stack.extend(
                mapping
                    .iter()
                    .rev()
                    .map(|(key, value)| Frame::Entry(key, value)),
            ),
            Node::Sequence(items) => stack.extend(items.iter().rev().map(Frame::Item)),
            Node::Scalar(_) => {}
        }
    }
}
