use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{Kind, NodeId};

/// One element of the edited document, in the persisted layout: identity,
/// palette kind, the renderer-owned attribute map, an optional style-class
/// hint, and ordered children. The engine treats `attributes` as opaque JSON
/// except for the action URL consulted on activation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: NodeId,
    pub kind: Kind,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    pub fn new(id: impl Into<NodeId>, kind: impl Into<Kind>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attributes: Map::new(),
            style: None,
            children: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets a single attribute, replacing any previous value under the name.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_children(mut self, children: Vec<ComponentNode>) -> Self {
        self.children = children;
        self
    }

    /// String-valued attribute lookup; `None` when absent or not a string.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ComponentNode::subtree_len).sum::<usize>()
    }
}
