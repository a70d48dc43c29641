use serde_json::Value;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::ids::{Kind, NodeId};
use crate::kinds::KindRegistry;
use crate::node::ComponentNode;
use crate::placement::{
    resolve_drop, DropDecision, DropIndicator, DropPosition, DropTarget, HoverInfo,
};
use crate::traits::{ActionDispatcher, DocumentStore, IdProvider, NoopDispatcher};

/// Attribute consulted by [`Builder::activate`] for an action URL.
pub const ACTION_ATTRIBUTE: &str = "onClickAction";

/// Width limits for the property-editor panel.
const PANEL_MIN_WIDTH: f32 = 250.0;
const PANEL_MAX_WIDTH: f32 = 800.0;
const PANEL_DEFAULT_WIDTH: f32 = 288.0;

/// Transient state for one palette drag: the captured kind plus the preview
/// node shown in the drag overlay. The preview never enters the document;
/// the node created on drop gets its own fresh id.
#[derive(Clone, Debug)]
pub struct DragGesture {
    kind: Kind,
    preview: ComponentNode,
}

impl DragGesture {
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn preview(&self) -> &ComponentNode {
        &self.preview
    }
}

/// Outcome of releasing a drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// A node was created and inserted; carries the new id.
    Dropped(NodeId),
    /// No live indicator (or the target vanished); nothing changed.
    Discarded,
}

/// Explicit resize gesture for the property-editor panel. Width updates
/// apply only while the gesture is live, and out-of-range widths are
/// ignored rather than clamped, so the panel sticks at the last in-range
/// width when the pointer overshoots.
#[derive(Clone, Copy, Debug)]
pub struct PanelResize {
    width: f32,
    active: bool,
}

impl Default for PanelResize {
    fn default() -> Self {
        Self {
            width: PANEL_DEFAULT_WIDTH,
            active: false,
        }
    }
}

impl PanelResize {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self) {
        self.active = true;
    }

    /// One pointer sample: x relative to the window's left edge, with the
    /// panel occupying the remaining space up to `window_width`.
    pub fn track(&mut self, pointer_x: f32, window_width: f32) {
        if !self.active {
            return;
        }
        let proposed = window_width - pointer_x;
        if proposed > PANEL_MIN_WIDTH && proposed < PANEL_MAX_WIDTH {
            self.width = proposed;
        }
    }

    pub fn finish(&mut self) {
        self.active = false;
    }
}

/// Facade wiring the document, kind registry, and host collaborators into
/// one editing session: palette drags, selection, the JSON edit surface,
/// deletion, moves, and activation. Every mutation that changes the
/// document is followed by a save through the [`DocumentStore`], so the
/// store always holds the last rendered state.
///
/// Persistence failures surface as [`Error::Persistence`] after the
/// in-memory document has already changed; the session stays authoritative
/// and the host decides whether to retry or warn.
pub struct Builder<S, G, D = NoopDispatcher>
where
    S: DocumentStore,
    G: IdProvider,
    D: ActionDispatcher,
{
    document: Document,
    registry: KindRegistry,
    store: S,
    ids: G,
    dispatcher: D,
    selected: Option<NodeId>,
    gesture: Option<DragGesture>,
    indicator: Option<DropIndicator>,
    panel: PanelResize,
}

impl<S, G, D> Builder<S, G, D>
where
    S: DocumentStore,
    G: IdProvider,
    D: ActionDispatcher,
{
    /// Session over an empty document; nothing is read from the store.
    pub fn new(store: S, ids: G, dispatcher: D, registry: KindRegistry) -> Self {
        Self {
            document: Document::new(),
            registry,
            store,
            ids,
            dispatcher,
            selected: None,
            gesture: None,
            indicator: None,
            panel: PanelResize::default(),
        }
    }

    /// Session primed from the store: loads the persisted document before
    /// first render. A store with nothing saved starts empty; a corrupt
    /// save surfaces as [`Error::Persistence`].
    pub fn open(store: S, ids: G, dispatcher: D, registry: KindRegistry) -> Result<Self> {
        let mut session = Self::new(store, ids, dispatcher, registry);
        session.reload()?;
        Ok(session)
    }

    /// Re-reads the document from the store, replacing in-memory state.
    pub fn reload(&mut self) -> Result<()> {
        self.document = match self.store.load()? {
            Some(nodes) => Document::from_nodes(nodes),
            None => Document::new(),
        };
        self.selected = None;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Materialized subtree of the current selection, for the edit surface.
    pub fn selected_node(&self) -> Option<ComponentNode> {
        self.selected.as_ref().and_then(|id| self.document.node(id))
    }

    pub fn indicator(&self) -> Option<&DropIndicator> {
        self.indicator.as_ref()
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }

    pub fn panel(&self) -> &PanelResize {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelResize {
        &mut self.panel
    }

    /// Picks a node; selecting `None` clears. Ids are taken as-is, so a
    /// stale selection simply yields no [`Builder::selected_node`].
    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    /// Starts a palette drag for `kind`, capturing a preview node with the
    /// kind's default attributes. Starting over an unfinished drag replaces
    /// it.
    pub fn drag_start(&mut self, kind: impl Into<Kind>) {
        let kind = kind.into();
        let preview = ComponentNode::new(self.ids.next_id(), kind.clone())
            .with_attributes(self.registry.default_attributes(&kind));
        tracing::debug!(kind = %kind, "drag started");
        self.gesture = Some(DragGesture { kind, preview });
        self.indicator = None;
    }

    /// One pointer-move tick. Updates the drop indicator only when the
    /// resolved target or position actually changed; unusable geometry
    /// leaves the previous indicator standing. Returns the indicator the
    /// host should render.
    pub fn drag_over(&mut self, hover: Option<HoverInfo>) -> Option<&DropIndicator> {
        if self.gesture.is_none() {
            return None;
        }
        let decision = resolve_drop(hover.as_ref(), |id| {
            self.document
                .get(id)
                .map(|node| self.registry.is_container(node.kind))
                .unwrap_or(false)
        });
        match decision {
            DropDecision::Clear => self.indicator = None,
            DropDecision::Undecided => {}
            DropDecision::At(next) => {
                if self.indicator.as_ref() != Some(&next) {
                    tracing::trace!(to = ?next.target, position = ?next.position, "indicator moved");
                    self.indicator = Some(next);
                }
            }
        }
        self.indicator.as_ref()
    }

    /// Releases the drag. With a live indicator, creates a node of the
    /// captured kind (fresh id, default attributes) and inserts it at the
    /// indicated spot; without one, or when the target vanished since the
    /// last tick, the drag is discarded. Gesture state is released on every
    /// path, including the error path of the follow-up save.
    pub fn drag_end(&mut self) -> Result<DropOutcome> {
        let gesture = match self.gesture.take() {
            Some(gesture) => gesture,
            None => {
                self.indicator = None;
                return Ok(DropOutcome::Discarded);
            }
        };
        let indicator = match self.indicator.take() {
            Some(indicator) => indicator,
            None => {
                tracing::debug!(kind = %gesture.kind, "drag released with no target");
                return Ok(DropOutcome::Discarded);
            }
        };

        let node = ComponentNode::new(self.ids.next_id(), gesture.kind.clone())
            .with_attributes(self.registry.default_attributes(&gesture.kind));
        let id = node.id.clone();

        let inserted = match &indicator.target {
            DropTarget::Root => match indicator.position {
                DropPosition::Inside => self.document.insert_under(None, node),
                // the canvas itself has no sibling level
                DropPosition::Before | DropPosition::After => false,
            },
            DropTarget::Node(target) => {
                self.document.insert_relative(node, target, indicator.position)
            }
        };
        if !inserted {
            tracing::debug!(to = ?indicator.target, "drop target gone; nothing inserted");
            return Ok(DropOutcome::Discarded);
        }

        tracing::debug!(id = %id, kind = %gesture.kind, "node dropped");
        self.persist()?;
        Ok(DropOutcome::Dropped(id))
    }

    /// Abandons the drag; the document is untouched.
    pub fn drag_cancel(&mut self) {
        if self.gesture.take().is_some() {
            tracing::debug!("drag cancelled");
        }
        self.indicator = None;
    }

    /// Applies a full-value replacement from the edit surface to the node
    /// at `id`. Replacements without an id or kind are rejected as
    /// [`Error::MalformedReplacement`] before reaching the document; a
    /// replacement equal to the current subtree is skipped without a save.
    /// Returns whether the document changed.
    pub fn apply_edit(&mut self, id: &NodeId, replacement: ComponentNode) -> Result<bool> {
        if replacement.id.is_empty() {
            return Err(Error::MalformedReplacement(
                "replacement is missing an id".into(),
            ));
        }
        if replacement.kind.is_empty() {
            return Err(Error::MalformedReplacement(
                "replacement is missing a kind".into(),
            ));
        }
        if self.document.node(id).as_ref() == Some(&replacement) {
            return Ok(false);
        }
        if !self.document.update(id, replacement) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Deletes the node (with subtree) and clears the selection. Unknown
    /// ids report `Ok(false)` without a save.
    pub fn delete(&mut self, id: &NodeId) -> Result<bool> {
        if !self.document.remove(id) {
            return Ok(false);
        }
        self.selected = None;
        self.persist()?;
        Ok(true)
    }

    /// Relocates an existing node relative to another, with the same
    /// guards as [`Document::move_relative`].
    pub fn move_node(
        &mut self,
        id: &NodeId,
        target: &NodeId,
        position: DropPosition,
    ) -> Result<bool> {
        if !self.document.move_relative(id, target, position) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Click on a canvas node: selects it, and when its attributes carry a
    /// non-empty action URL, hands the URL to the dispatcher.
    pub fn activate(&mut self, id: &NodeId) -> Result<()> {
        self.selected = Some(id.clone());
        let url = self
            .document
            .get(id)
            .and_then(|node| node.attributes.get(ACTION_ATTRIBUTE))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let url = match url {
            Some(url) if !url.is_empty() => url,
            _ => return Ok(()),
        };
        tracing::debug!(id = %id, url = %url, "dispatching action");
        self.dispatcher.dispatch(&url)
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.document.nodes())
    }
}
