//! Multi-document YAML loading
//!
//! Each document is read twice. The first pass resolves its shape into a
//! `serde_yaml::Value`; the second walks the same events guided by that shape
//! and reads every number back as the text written in the source, so `1.10`
//! stays `1.10` instead of becoming the float `1.1`.

use super::{Mapping, Node, Scalar};
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed YAML in document {index}: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parses every document of a YAML stream.
///
/// A single malformed document fails the whole stream; partial results are
/// never returned.
pub fn load_all(content: &str) -> Result<Vec<Node>, DocumentError> {
    let shapes = serde_yaml::Deserializer::from_str(content);
    let sources = serde_yaml::Deserializer::from_str(content);
    let mut documents = Vec::new();

    for (index, (shape, source)) in shapes.zip(sources).enumerate() {
        let shape = Value::deserialize(shape)
            .map_err(|source| DocumentError::Malformed { index, source })?;
        let node = Shaped(&shape)
            .deserialize(source)
            .map_err(|source| DocumentError::Malformed { index, source })?;
        documents.push(node);
    }

    Ok(documents)
}

/// Builds a [`Node`] from the events of one value whose shape is already known.
struct Shaped<'v>(&'v Value);

impl<'de, 'v> DeserializeSeed<'de> for Shaped<'v> {
    type Value = Node;

    fn deserialize<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.0 {
            Value::Number(_) => deserializer
                .deserialize_str(SourceText)
                .map(|text| Node::Scalar(Scalar::Number(text))),
            Value::Sequence(items) => deserializer.deserialize_seq(SequenceVisitor(items)),
            Value::Mapping(mapping) => deserializer.deserialize_map(MappingVisitor(mapping)),
            Value::Tagged(tagged) => deserializer.deserialize_any(TaggedVisitor(&tagged.value)),
            scalar => {
                deserializer.deserialize_ignored_any(IgnoredAny)?;
                Ok(match scalar {
                    Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
                    Value::String(s) => Node::string(s.as_str()),
                    _ => Node::null(),
                })
            }
        }
    }
}

struct SourceText;

impl<'de> Visitor<'de> for SourceText {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }
}

struct SequenceVisitor<'v>(&'v [Value]);

impl<'de, 'v> Visitor<'de> for SequenceVisitor<'v> {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(self.0.len());
        for (index, item) in self.0.iter().enumerate() {
            let node = seq
                .next_element_seed(Shaped(item))?
                .ok_or_else(|| de::Error::invalid_length(index, &self))?;
            items.push(node);
        }
        Ok(Node::Sequence(items))
    }
}

struct MappingVisitor<'v>(&'v serde_yaml::Mapping);

impl<'de, 'v> Visitor<'de> for MappingVisitor<'v> {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut mapping = Mapping::with_capacity(self.0.len());
        for (index, (key, value)) in self.0.iter().enumerate() {
            let key = map
                .next_key_seed(Shaped(key))?
                .ok_or_else(|| de::Error::invalid_length(index, &self))?;
            let value = map.next_value_seed(Shaped(value))?;
            mapping.insert(key.render(), value);
        }
        Ok(Node::Mapping(mapping))
    }
}

/// Unwraps `!tag value` to the value.
struct TaggedVisitor<'v>(&'v Value);

impl<'de, 'v> Visitor<'de> for TaggedVisitor<'v> {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a tagged value")
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Node, A::Error> {
        let (_, contents) = data.variant::<IgnoredAny>()?;
        contents.newtype_variant_seed(Shaped(self.0))
    }
}
