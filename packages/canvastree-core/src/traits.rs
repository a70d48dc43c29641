use crate::error::Result;
use crate::ids::NodeId;
use crate::node::ComponentNode;

/// Where the edited document lives between sessions. One logical slot:
/// every save overwrites the previous document wholesale, and `load`
/// returns the latest full document or `None` when nothing was ever saved.
pub trait DocumentStore {
    fn save(&mut self, nodes: &[ComponentNode]) -> Result<()>;
    fn load(&self) -> Result<Option<Vec<ComponentNode>>>;
}

/// Source of ids for freshly created nodes. Implementations must keep
/// collisions with ids already in the document out of the picture; the
/// engine rejects a colliding insert rather than repairing it.
pub trait IdProvider {
    fn next_id(&mut self) -> NodeId;
}

/// Collaborator invoked when an activated node carries an action URL.
/// Transport, retries, and response handling live behind this seam.
pub trait ActionDispatcher {
    fn dispatch(&mut self, url: &str) -> Result<()>;
}

/// In-memory store for tests and prototyping.
#[derive(Default)]
pub struct MemoryStore {
    saved: Option<Vec<ComponentNode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved document, if any.
    pub fn saved(&self) -> Option<&[ComponentNode]> {
        self.saved.as_deref()
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, nodes: &[ComponentNode]) -> Result<()> {
        self.saved = Some(nodes.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<ComponentNode>>> {
        Ok(self.saved.clone())
    }
}

/// Random ids (uuid v4), the format production documents carry.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdProvider for UuidIds {
    fn next_id(&mut self) -> NodeId {
        NodeId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix-N` ids for tests and benches.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdProvider for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        self.counter += 1;
        NodeId::new(format!("{}-{}", self.prefix, self.counter))
    }
}

/// Swallows all dispatches; for hosts without an action collaborator.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDispatcher;

impl ActionDispatcher for NoopDispatcher {
    fn dispatch(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }
}
