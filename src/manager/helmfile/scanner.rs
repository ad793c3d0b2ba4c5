//! Top-level scan over the documents of a helmfile state file

use super::walker::extract_dependencies;
use crate::config::ExtractOptions;
use crate::document::Node;
use crate::manager::PackageDependency;

/// Sections of a helmfile document that carry in-line values.
///
/// `environments` also has `values` but is never scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Release,
    NestedState,
}

impl SectionKind {
    /// Scan order within one document.
    pub const ALL: [SectionKind; 2] = [SectionKind::Release, SectionKind::NestedState];

    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Release => "releases",
            SectionKind::NestedState => "helmfiles",
        }
    }
}

/// Collects dependencies from every document, in stream order.
///
/// Within a document all `releases` come before all `helmfiles`, each in
/// declaration order.
pub fn scan_documents(documents: &[Node], options: &ExtractOptions) -> Vec<PackageDependency> {
    let mut deps = Vec::new();

    for document in documents {
        for kind in SectionKind::ALL {
            let Some(sections) = document.get(kind.key()).and_then(Node::as_sequence) else {
                continue;
            };
            for section in sections {
                deps.extend(extract_dependencies(section, options));
            }
        }
    }

    deps
}
