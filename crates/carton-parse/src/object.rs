//! The object tree produced by the parser.
//!
//! An [`Object`] owns an optional code block, an ordered list of children,
//! and a name-to-index map kept consistent with that list. Order is
//! semantically significant for later emission; the index map is a lookup
//! aid, never a substitute for order-sensitive iteration.

use std::collections::HashMap;

use crate::block::Block;

/// A node in the object tree: either a nested object or a raw data blob.
///
/// Downstream consumers match exhaustively on the two variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectNode {
    /// A named code-and-children container.
    Object(Object),
    /// A named opaque byte blob.
    Data(Data),
}

impl ObjectNode {
    /// The node's name.
    pub fn name(&self) -> &str {
        match self {
            ObjectNode::Object(object) => &object.name,
            ObjectNode::Data(data) => &data.name,
        }
    }
}

/// A named object holding a code block and ordered sub-nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    /// Name, unique among direct siblings.
    pub name: String,
    /// The parsed code block. Absent only when parsing it failed (and an
    /// error was already reported).
    pub code: Option<Block>,
    /// Children in declaration order.
    pub sub_objects: Vec<ObjectNode>,
    /// Child name to position in `sub_objects`. On duplicate names the
    /// mapping points at the most recently attached child.
    pub sub_index_by_name: HashMap<String, usize>,
}

impl Object {
    /// Create an empty object with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Object {
            name: name.into(),
            ..Object::default()
        }
    }

    /// Attach a child, recording its index under its name.
    ///
    /// Duplicate names are detected earlier (and reported) but do not block
    /// attachment; the index mapping is simply overwritten.
    pub fn add_named_sub_object(&mut self, node: ObjectNode) {
        self.sub_index_by_name
            .insert(node.name().to_owned(), self.sub_objects.len());
        self.sub_objects.push(node);
    }

    /// Look up a direct child by name.
    pub fn sub_object(&self, name: &str) -> Option<&ObjectNode> {
        let index = *self.sub_index_by_name.get(name)?;
        self.sub_objects.get(index)
    }
}

/// A named immutable byte blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    /// Name, unique among direct siblings.
    pub name: String,
    /// The literal's decoded bytes. Round-trips byte-for-byte.
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_insertion() {
        let mut object = Object::named("root");
        object.add_named_sub_object(ObjectNode::Data(Data {
            name: "a".to_string(),
            content: vec![1],
        }));
        object.add_named_sub_object(ObjectNode::Data(Data {
            name: "b".to_string(),
            content: vec![2],
        }));
        assert_eq!(object.sub_index_by_name["a"], 0);
        assert_eq!(object.sub_index_by_name["b"], 1);
        assert_eq!(object.sub_object("b").map(|n| n.name()), Some("b"));
    }

    #[test]
    fn test_duplicate_attachment_overwrites_index() {
        let mut object = Object::named("root");
        object.add_named_sub_object(ObjectNode::Data(Data {
            name: "a".to_string(),
            content: vec![1],
        }));
        object.add_named_sub_object(ObjectNode::Data(Data {
            name: "a".to_string(),
            content: vec![2],
        }));
        // Both children stay in order; the index points at the second.
        assert_eq!(object.sub_objects.len(), 2);
        assert_eq!(object.sub_index_by_name["a"], 1);
    }
}
