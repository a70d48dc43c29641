//! Pure geometry for drop resolution. Given what the host reports for one
//! pointer-move tick (the element under the pointer, its vertical extent,
//! and the dragged item's extent), decide whether the drop would land
//! before, after, or inside the hovered element. No document access and no
//! session state here; eligibility for `inside` comes in as a predicate.

use crate::ids::NodeId;

/// Fraction of the hovered element's height where the `inside` band starts.
const INSIDE_BAND_LOWER: f32 = 0.3;
/// Fraction of the hovered element's height where the `inside` band ends.
const INSIDE_BAND_UPPER: f32 = 0.7;

/// Where a drop lands relative to its target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

/// What the pointer is over: a component node, or the canvas root itself.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum DropTarget {
    Root,
    Node(NodeId),
}

impl DropTarget {
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            DropTarget::Node(id) => Some(id),
            DropTarget::Root => None,
        }
    }
}

/// Transient value driving drag feedback and the eventual insert: the
/// hovered target plus the resolved position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropIndicator {
    pub target: DropTarget,
    pub position: DropPosition,
}

/// Vertical extent of an on-screen element, as measured by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverRect {
    pub top: f32,
    pub height: f32,
}

impl HoverRect {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    fn is_valid(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height >= 0.0
    }
}

/// Everything the host reports for one pointer-move tick. `dragged` may be
/// missing while the overlay is still being measured.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverInfo {
    pub target: DropTarget,
    pub rect: HoverRect,
    pub dragged: Option<HoverRect>,
}

impl HoverInfo {
    pub fn new(target: DropTarget, rect: HoverRect) -> Self {
        Self {
            target,
            rect,
            dragged: None,
        }
    }

    pub fn with_dragged(mut self, dragged: HoverRect) -> Self {
        self.dragged = Some(dragged);
        self
    }
}

/// Outcome of one pointer-move tick.
#[derive(Clone, Debug, PartialEq)]
pub enum DropDecision {
    /// Nothing under the pointer; any prior indicator should be cleared.
    Clear,
    /// Geometry was unusable this tick; the prior indicator stands.
    Undecided,
    /// A concrete target and position.
    At(DropIndicator),
}

/// Resolves one tick of hover geometry to a drop decision.
///
/// The hovered element's height is banded: the middle 30%..70% resolves to
/// `inside` when the target can nest (the root always can; nodes ask
/// `is_container`). Outside the band, or for targets that cannot nest, the
/// dragged item's vertical center against the hovered element's midpoint
/// picks `before` or `after`. The band boundaries themselves fall through
/// to the midpoint rule, so a center sitting exactly on 30% resolves to
/// `before`, not `inside`.
pub fn resolve_drop<F>(hover: Option<&HoverInfo>, is_container: F) -> DropDecision
where
    F: FnOnce(&NodeId) -> bool,
{
    let hover = match hover {
        Some(hover) => hover,
        None => return DropDecision::Clear,
    };
    let dragged = match hover.dragged {
        Some(dragged) => dragged,
        None => return DropDecision::Undecided,
    };
    if !hover.rect.is_valid() || !dragged.is_valid() {
        return DropDecision::Undecided;
    }

    let nests = match &hover.target {
        DropTarget::Root => true,
        DropTarget::Node(id) => is_container(id),
    };

    let center = dragged.center_y();
    let top_threshold = hover.rect.top + hover.rect.height * INSIDE_BAND_LOWER;
    let bottom_threshold = hover.rect.top + hover.rect.height * INSIDE_BAND_UPPER;

    let position = if nests && center > top_threshold && center < bottom_threshold {
        DropPosition::Inside
    } else if center <= hover.rect.center_y() {
        DropPosition::Before
    } else {
        DropPosition::After
    };

    DropDecision::At(DropIndicator {
        target: hover.target.clone(),
        position,
    })
}
