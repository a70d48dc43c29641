use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ids::{Kind, NodeId};
use crate::node::ComponentNode;
use crate::placement::DropPosition;

#[derive(Clone, Debug, PartialEq)]
struct NodeEntry {
    parent: Option<NodeId>, // None = top level
    kind: Kind,
    attributes: Map<String, Value>,
    style: Option<String>,
    children: Vec<NodeId>,
}

/// The edited document: an id-indexed arena of component records plus the
/// ordered list of top-level ids. Nested [`ComponentNode`] trees exist only
/// at the edges (import, export, grafting); everything in between works on
/// the arena, so a lookup is one hash probe rather than a tree walk.
///
/// Mutations never fail on structural misses. Unknown targets, duplicate
/// ids, and self-referential moves report `false` and leave the document
/// exactly as it was; `true` means the document changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    roots: Vec<NodeId>,
    nodes: HashMap<NodeId, NodeEntry>,
}

/// Borrowed view of one record: payload fields plus child ids, without
/// materializing the subtree.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    pub id: &'a NodeId,
    pub kind: &'a Kind,
    pub attributes: &'a Map<String, Value>,
    pub style: Option<&'a str>,
    pub children: &'a [NodeId],
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from nested trees, e.g. a deserialized save file.
    /// A subtree whose ids collide with already-imported ones (or are
    /// empty) is dropped wholesale rather than imported half-way.
    pub fn from_nodes(nodes: Vec<ComponentNode>) -> Self {
        let mut doc = Self::new();
        for node in nodes {
            if !doc.insert_under(None, node) {
                tracing::warn!("skipped a top-level subtree with duplicate or empty ids");
            }
        }
        doc
    }

    /// Exports the document as nested trees in the persisted layout.
    pub fn nodes(&self) -> Vec<ComponentNode> {
        self.roots.iter().filter_map(|id| self.node(id)).collect()
    }

    /// Materializes the subtree rooted at `id` as an owned tree.
    pub fn node(&self, id: &NodeId) -> Option<ComponentNode> {
        let entry = self.nodes.get(id)?;
        Some(ComponentNode {
            id: id.clone(),
            kind: entry.kind.clone(),
            attributes: entry.attributes.clone(),
            style: entry.style.clone(),
            children: entry
                .children
                .iter()
                .filter_map(|child| self.node(child))
                .collect(),
        })
    }

    /// Borrowed lookup by id. Empty ids address nothing.
    pub fn get(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        if id.is_empty() {
            return None;
        }
        let (id, entry) = self.nodes.get_key_value(id)?;
        Some(NodeRef {
            id,
            kind: &entry.kind,
            attributes: &entry.attributes,
            style: entry.style.as_deref(),
            children: &entry.children,
        })
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Total number of records, at any depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids at the top level, in canvas order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Child ids of `id`, in order. `None` for unknown ids.
    pub fn children_of(&self, id: &NodeId) -> Option<&[NodeId]> {
        self.nodes.get(id).map(|entry| entry.children.as_slice())
    }

    /// Parent of `id`; `None` for top-level and unknown ids alike.
    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|entry| entry.parent.as_ref())
    }

    /// Preorder traversal over the whole document.
    pub fn iter(&self) -> DocumentIter<'_> {
        DocumentIter {
            doc: self,
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Grafts `node` (with its subtree) as the last child of `parent`, or at
    /// the end of the top level when `parent` is `None`. No-op when the
    /// parent is unknown or any incoming id is empty or already in use.
    pub fn insert_under(&mut self, parent: Option<&NodeId>, node: ComponentNode) -> bool {
        if let Some(pid) = parent {
            if !self.nodes.contains_key(pid) {
                tracing::debug!(parent_id = %pid, "insert parent not found; document unchanged");
                return false;
            }
        }
        let mut seen = HashSet::new();
        if !self.subtree_ids_free(&node, &mut seen) {
            tracing::debug!(id = %node.id, "insert rejected: id empty or already in use");
            return false;
        }
        let id = node.id.clone();
        self.graft_entries(parent, node);
        self.attach(&id, parent, usize::MAX);
        true
    }

    /// Grafts `node` before, after, or inside `target`. `Inside` appends to
    /// the target's children; `Before`/`After` splice into the target's own
    /// sibling list, which may be the top level. No-op when the target is
    /// unknown.
    pub fn insert_relative(
        &mut self,
        node: ComponentNode,
        target: &NodeId,
        position: DropPosition,
    ) -> bool {
        if position == DropPosition::Inside {
            return self.insert_under(Some(target), node);
        }
        let parent = match self.nodes.get(target) {
            Some(entry) => entry.parent.clone(),
            None => {
                tracing::debug!(target_id = %target, "insert target not found; document unchanged");
                return false;
            }
        };
        let mut seen = HashSet::new();
        if !self.subtree_ids_free(&node, &mut seen) {
            tracing::debug!(id = %node.id, "insert rejected: id empty or already in use");
            return false;
        }
        let index = self
            .sibling_position(parent.as_ref(), target)
            .unwrap_or(usize::MAX);
        let at = if position == DropPosition::Before {
            index
        } else {
            index.saturating_add(1)
        };
        let id = node.id.clone();
        self.graft_entries(parent.as_ref(), node);
        self.attach(&id, parent.as_ref(), at);
        true
    }

    /// Replaces the subtree at `id` with `replacement`, keeping the slot in
    /// the surrounding sibling order. The replacement is a full value, so it
    /// may rewrite attributes, kind, children, and even the id itself. When
    /// the replacement reuses an id that lives elsewhere in the document the
    /// update is skipped and the previous subtree stays.
    pub fn update(&mut self, id: &NodeId, replacement: ComponentNode) -> bool {
        let parent = match self.nodes.get(id) {
            Some(entry) => entry.parent.clone(),
            None => {
                tracing::debug!(id = %id, "update target not found; document unchanged");
                return false;
            }
        };
        let index = self
            .sibling_position(parent.as_ref(), id)
            .unwrap_or(usize::MAX);
        let previous = match self.node(id) {
            Some(previous) => previous,
            None => return false,
        };
        self.detach(id);
        self.remove_subtree(id);
        let mut seen = HashSet::new();
        let (subtree, applied) = if self.subtree_ids_free(&replacement, &mut seen) {
            (replacement, true)
        } else {
            tracing::debug!(id = %id, "replacement reuses ids outside the edited subtree; update skipped");
            (previous, false)
        };
        let new_id = subtree.id.clone();
        self.graft_entries(parent.as_ref(), subtree);
        self.attach(&new_id, parent.as_ref(), index);
        applied
    }

    /// Removes the node and its whole subtree. Removing an unknown id
    /// reports `false`; a second remove of the same id is therefore a no-op.
    pub fn remove(&mut self, id: &NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            tracing::debug!(id = %id, "delete target not found; document unchanged");
            return false;
        }
        self.detach(id);
        self.remove_subtree(id);
        true
    }

    /// Relocates an existing node (with its subtree) relative to `target`.
    /// Rejected when either endpoint is unknown, when `id == target`, or
    /// when the target sits inside the moved subtree.
    pub fn move_relative(&mut self, id: &NodeId, target: &NodeId, position: DropPosition) -> bool {
        if id == target {
            tracing::debug!(id = %id, "move onto itself ignored");
            return false;
        }
        if !self.nodes.contains_key(id) || !self.nodes.contains_key(target) {
            tracing::debug!(id = %id, target_id = %target, "move endpoints not found; document unchanged");
            return false;
        }
        if self.is_ancestor(id, target) {
            tracing::debug!(id = %id, target_id = %target, "move into own subtree blocked");
            return false;
        }
        match position {
            DropPosition::Inside => {
                self.detach(id);
                self.attach(id, Some(target), usize::MAX);
            }
            DropPosition::Before | DropPosition::After => {
                let parent = match self.nodes.get(target) {
                    Some(entry) => entry.parent.clone(),
                    None => return false,
                };
                // index taken after detach, so same-list reorders land
                // exactly at the target's current slot
                self.detach(id);
                let index = self
                    .sibling_position(parent.as_ref(), target)
                    .unwrap_or(usize::MAX);
                let at = if position == DropPosition::Before {
                    index
                } else {
                    index.saturating_add(1)
                };
                self.attach(id, parent.as_ref(), at);
            }
        }
        true
    }

    /// Validate arena invariants: each record reachable from the top level
    /// exactly once, child lists and parent pointers agreeing, no orphaned
    /// records. Intended for tests and debugging.
    pub fn validate(&self) -> Result<()> {
        for root in &self.roots {
            match self.nodes.get(root) {
                None => {
                    return Err(Error::Inconsistent(format!(
                        "top-level id {root} has no record"
                    )))
                }
                Some(entry) if entry.parent.is_some() => {
                    return Err(Error::Inconsistent(format!(
                        "top-level node {root} claims a parent"
                    )))
                }
                _ => {}
            }
        }

        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut stack: Vec<&NodeId> = self.roots.iter().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(Error::Inconsistent(format!(
                    "node {id} is linked more than once"
                )));
            }
            let entry = match self.nodes.get(id) {
                Some(entry) => entry,
                None => {
                    return Err(Error::Inconsistent(format!("linked id {id} has no record")))
                }
            };
            for child in &entry.children {
                match self.nodes.get(child) {
                    Some(child_entry) if child_entry.parent.as_ref() == Some(id) => {}
                    Some(_) => {
                        return Err(Error::Inconsistent(format!(
                            "child {child} disagrees about its parent"
                        )))
                    }
                    None => {
                        return Err(Error::Inconsistent(format!(
                            "child id {child} has no record"
                        )))
                    }
                }
                stack.push(child);
            }
        }
        if seen.len() != self.nodes.len() {
            return Err(Error::Inconsistent(
                "arena holds records not linked from the top level".into(),
            ));
        }
        Ok(())
    }

    /// True when all ids in the incoming subtree are non-empty, unused in
    /// the arena, and unique within the subtree itself.
    fn subtree_ids_free(&self, node: &ComponentNode, seen: &mut HashSet<NodeId>) -> bool {
        if node.id.is_empty()
            || self.nodes.contains_key(&node.id)
            || !seen.insert(node.id.clone())
        {
            return false;
        }
        node.children
            .iter()
            .all(|child| self.subtree_ids_free(child, seen))
    }

    /// Copies a nested tree into the arena. Links the records internally
    /// but does not touch the destination sibling list; callers follow up
    /// with [`Document::attach`].
    fn graft_entries(&mut self, parent: Option<&NodeId>, node: ComponentNode) {
        let ComponentNode {
            id,
            kind,
            attributes,
            style,
            children,
        } = node;
        self.nodes.insert(
            id.clone(),
            NodeEntry {
                parent: parent.cloned(),
                kind,
                attributes,
                style,
                children: children.iter().map(|child| child.id.clone()).collect(),
            },
        );
        for child in children {
            self.graft_entries(Some(&id), child);
        }
    }

    fn remove_subtree(&mut self, id: &NodeId) {
        if let Some(entry) = self.nodes.remove(id) {
            for child in entry.children {
                self.remove_subtree(&child);
            }
        }
    }

    /// Unlinks `id` from its sibling list; the records themselves stay.
    fn detach(&mut self, id: &NodeId) {
        let parent = self.nodes.get(id).and_then(|entry| entry.parent.clone());
        match parent {
            Some(pid) => {
                if let Some(parent_entry) = self.nodes.get_mut(&pid) {
                    parent_entry.children.retain(|child| child != id);
                }
            }
            None => self.roots.retain(|child| child != id),
        }
    }

    /// Links an existing record into `parent`'s sibling list at `position`
    /// (clamped to the list length) and updates its parent pointer.
    fn attach(&mut self, id: &NodeId, parent: Option<&NodeId>, position: usize) {
        if let Some(entry) = self.nodes.get_mut(id) {
            entry.parent = parent.cloned();
        }
        match parent {
            Some(pid) => {
                if let Some(parent_entry) = self.nodes.get_mut(pid) {
                    let at = position.min(parent_entry.children.len());
                    parent_entry.children.insert(at, id.clone());
                }
            }
            None => {
                let at = position.min(self.roots.len());
                self.roots.insert(at, id.clone());
            }
        }
    }

    fn sibling_position(&self, parent: Option<&NodeId>, id: &NodeId) -> Option<usize> {
        let siblings = match parent {
            Some(pid) => self.nodes.get(pid).map(|entry| entry.children.as_slice())?,
            None => self.roots.as_slice(),
        };
        siblings.iter().position(|sibling| sibling == id)
    }

    fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|entry| entry.parent.clone());
        while let Some(n) = current {
            if &n == ancestor {
                return true;
            }
            current = self.nodes.get(&n).and_then(|entry| entry.parent.clone());
        }
        false
    }
}

/// Preorder iterator over a [`Document`].
pub struct DocumentIter<'a> {
    doc: &'a Document,
    stack: Vec<&'a NodeId>,
}

impl<'a> Iterator for DocumentIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            if let Some(node) = self.doc.get(id) {
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
    }
}
