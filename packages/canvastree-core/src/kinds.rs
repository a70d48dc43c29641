use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::ids::Kind;

/// Palette section a kind is listed under.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PaletteGroup {
    Layouts,
    Components,
}

/// Capability record for one component kind: whether it accepts children
/// (and thereby `inside` drops), where the palette lists it, and the
/// attribute set a freshly dropped node starts with.
#[derive(Clone, Debug)]
pub struct KindSpec {
    container: bool,
    group: PaletteGroup,
    defaults: Map<String, Value>,
}

impl KindSpec {
    pub fn leaf(group: PaletteGroup) -> Self {
        Self {
            container: false,
            group,
            defaults: Map::new(),
        }
    }

    pub fn container(group: PaletteGroup) -> Self {
        Self {
            container: true,
            group,
            defaults: Map::new(),
        }
    }

    /// Initial attributes as a JSON object literal; non-objects are ignored.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults.as_object().cloned().unwrap_or_default();
        self
    }

    pub fn is_container(&self) -> bool {
        self.container
    }

    pub fn group(&self) -> PaletteGroup {
        self.group
    }

    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }
}

/// Registry of known component kinds. Dispatch that would otherwise branch
/// on kind strings (drop eligibility, default attributes, palette grouping)
/// is data-driven through this table, so hosts can extend the palette
/// without touching the engine.
#[derive(Clone, Debug)]
pub struct KindRegistry {
    specs: HashMap<Kind, KindSpec>,
    // registration order; drives palette listings
    order: Vec<Kind>,
}

impl KindRegistry {
    /// Registry with no kinds at all; every lookup falls back to leaf/empty.
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// The built-in palette: the four layout kinds plus the stock component
    /// set, with the same container capabilities and default attributes the
    /// canvas renderer expects.
    pub fn builtin() -> Self {
        use PaletteGroup::{Components, Layouts};

        let mut reg = Self::empty();

        // layouts
        reg.register(
            "div-container",
            KindSpec::container(Layouts).with_defaults(json!({
                "className": "p-4 min-h-[100px] bg-white/50 rounded-lg flex flex-col gap-4",
            })),
        );
        reg.register(
            "layout-2-cols",
            KindSpec::container(Layouts).with_defaults(json!({
                "className": "grid grid-cols-2 gap-4 p-2 min-h-[100px] rounded-lg",
            })),
        );
        reg.register(
            "layout-3-cols",
            KindSpec::container(Layouts).with_defaults(json!({
                "className": "grid grid-cols-3 gap-4 p-2 min-h-[100px] rounded-lg",
            })),
        );
        reg.register(
            "layout-custom-cols",
            KindSpec::container(Layouts).with_defaults(json!({
                "className": "grid gap-4 p-2 min-h-[100px] rounded-lg",
                "cols": 2,
            })),
        );

        // form components
        reg.register(
            "button",
            KindSpec::leaf(Components).with_defaults(json!({ "label": "Button" })),
        );
        reg.register(
            "input",
            KindSpec::leaf(Components).with_defaults(json!({ "placeholder": "Enter text..." })),
        );
        reg.register(
            "textarea",
            KindSpec::leaf(Components)
                .with_defaults(json!({ "placeholder": "Enter a longer text..." })),
        );
        reg.register(
            "select",
            KindSpec::leaf(Components).with_defaults(json!({
                "placeholder": "Select an option",
                "options": ["Option 1", "Option 2"],
            })),
        );
        reg.register(
            "checkbox",
            KindSpec::leaf(Components).with_defaults(json!({ "label": "Accept terms" })),
        );
        reg.register(
            "radio",
            KindSpec::leaf(Components).with_defaults(json!({ "label": "Option one" })),
        );
        reg.register("switch", KindSpec::leaf(Components));
        reg.register(
            "slider",
            KindSpec::leaf(Components).with_defaults(json!({ "defaultValue": [50] })),
        );

        // containers beyond the layout group
        reg.register(
            "card",
            KindSpec::container(Components).with_defaults(json!({
                "title": "Card Title",
                "description": "Card Description",
            })),
        );

        // display components
        reg.register(
            "alert",
            KindSpec::leaf(Components).with_defaults(json!({
                "title": "Heads up!",
                "description": "You can add details here.",
            })),
        );
        reg.register(
            "badge",
            KindSpec::leaf(Components).with_defaults(json!({ "text": "Badge" })),
        );
        reg.register(
            "avatar",
            KindSpec::leaf(Components).with_defaults(json!({ "fallback": "CN" })),
        );
        reg.register(
            "tooltip",
            KindSpec::leaf(Components).with_defaults(json!({
                "text": "Tooltip content",
                "buttonText": "Hover me",
            })),
        );
        reg.register(
            "accordion",
            KindSpec::container(Components).with_defaults(json!({
                "title": "Section 1",
                "content": "Content for section 1.",
            })),
        );
        reg.register(
            "tabs",
            KindSpec::container(Components).with_defaults(json!({
                "tabs": [{ "value": "tab1", "title": "Tab 1", "content": "Content for tab 1." }],
            })),
        );
        reg.register(
            "dialog",
            KindSpec::container(Components).with_defaults(json!({
                "title": "Dialog Title",
                "description": "This is a dialog description.",
                "buttonText": "Open Dialog",
            })),
        );
        reg.register(
            "popover",
            KindSpec::container(Components).with_defaults(json!({
                "title": "Popover Title",
                "content": "Popover content here.",
                "buttonText": "Open Popover",
            })),
        );
        reg.register(
            "dropdown-menu",
            KindSpec::container(Components).with_defaults(json!({ "buttonText": "Open Menu" })),
        );
        reg.register(
            "hover-card",
            KindSpec::leaf(Components).with_defaults(json!({
                "text": "Hover me",
                "content": "Content for the hover card.",
            })),
        );
        reg.register(
            "progress",
            KindSpec::leaf(Components).with_defaults(json!({ "value": 33 })),
        );
        reg.register("separator", KindSpec::leaf(Components));
        reg.register(
            "sheet",
            KindSpec::container(Components).with_defaults(json!({
                "title": "Sheet Title",
                "description": "This is a sheet description.",
                "buttonText": "Open Sheet",
            })),
        );
        reg.register(
            "toast",
            KindSpec::leaf(Components).with_defaults(json!({
                "title": "Scheduled: Catch up",
                "description": "Friday, February 10, 2023 at 5:57 PM",
            })),
        );
        reg.register(
            "collapse",
            KindSpec::leaf(Components).with_defaults(json!({
                "title": "Toggle Collapse",
                "content": "This is the collapsible content.",
            })),
        );
        reg.register("scroll-area", KindSpec::container(Components));
        reg.register("menubar", KindSpec::container(Components));

        // navigation
        reg.register(
            "breadcrumb",
            KindSpec::leaf(Components)
                .with_defaults(json!({ "links": ["Home", "Components", "Breadcrumb"] })),
        );
        reg.register(
            "pagination",
            KindSpec::leaf(Components).with_defaults(json!({ "total": 5 })),
        );

        // data & misc
        reg.register("table", KindSpec::leaf(Components));
        reg.register("form", KindSpec::container(Components));
        reg.register(
            "label",
            KindSpec::leaf(Components).with_defaults(json!({ "text": "Your Label" })),
        );
        reg.register("calendar", KindSpec::leaf(Components));
        reg.register(
            "command",
            KindSpec::leaf(Components).with_defaults(json!({ "placeholder": "Search..." })),
        );
        reg.register(
            "skeleton",
            KindSpec::leaf(Components).with_defaults(json!({
                "width": "100px",
                "height": "20px",
            })),
        );

        reg
    }

    /// Adds or replaces a kind. Re-registering keeps the original palette
    /// position.
    pub fn register(&mut self, kind: impl Into<Kind>, spec: KindSpec) {
        let kind = kind.into();
        if !self.specs.contains_key(&kind) {
            self.order.push(kind.clone());
        }
        self.specs.insert(kind, spec);
    }

    pub fn spec(&self, kind: &Kind) -> Option<&KindSpec> {
        self.specs.get(kind)
    }

    /// Whether nodes of this kind accept children. Unknown kinds do not.
    pub fn is_container(&self, kind: &Kind) -> bool {
        self.specs.get(kind).map(KindSpec::is_container).unwrap_or(false)
    }

    /// Initial attributes for a freshly created node of `kind`. Total over
    /// all inputs: unknown kinds get an empty map. Each call returns a fresh
    /// copy, so callers may mutate the result freely.
    pub fn default_attributes(&self, kind: &Kind) -> Map<String, Value> {
        self.specs
            .get(kind)
            .map(|spec| spec.defaults.clone())
            .unwrap_or_default()
    }

    /// All registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.order.iter()
    }

    /// Kinds listed under one palette section, in registration order.
    pub fn palette(&self, group: PaletteGroup) -> impl Iterator<Item = &Kind> {
        self.order
            .iter()
            .filter(move |kind| self.specs.get(*kind).map(|s| s.group == group).unwrap_or(false))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_marks_layouts_as_containers() {
        let reg = KindRegistry::builtin();
        for kind in ["div-container", "layout-2-cols", "layout-3-cols", "layout-custom-cols"] {
            assert!(reg.is_container(&Kind::new(kind)), "{kind} should nest");
        }
        for kind in ["button", "badge", "progress", "separator"] {
            assert!(!reg.is_container(&Kind::new(kind)), "{kind} should not nest");
        }
    }

    #[test]
    fn unknown_kind_is_leaf_with_empty_defaults() {
        let reg = KindRegistry::builtin();
        let custom = Kind::new("not-registered");
        assert!(!reg.is_container(&custom));
        assert!(reg.default_attributes(&custom).is_empty());
    }

    #[test]
    fn default_attributes_are_fresh_copies() {
        let reg = KindRegistry::builtin();
        let kind = Kind::new("button");
        let mut first = reg.default_attributes(&kind);
        first.insert("label".into(), "mutated".into());
        let second = reg.default_attributes(&kind);
        assert_eq!(second.get("label").and_then(|v| v.as_str()), Some("Button"));
    }

    #[test]
    fn palette_groups_preserve_registration_order() {
        let reg = KindRegistry::builtin();
        let layouts: Vec<_> = reg.palette(PaletteGroup::Layouts).map(Kind::as_str).collect();
        assert_eq!(
            layouts,
            ["div-container", "layout-2-cols", "layout-3-cols", "layout-custom-cols"]
        );
        let components: Vec<_> = reg.palette(PaletteGroup::Components).map(Kind::as_str).collect();
        assert_eq!(components.first().copied(), Some("button"));
        assert_eq!(components.last().copied(), Some("skeleton"));
    }

    #[test]
    fn register_overrides_capability_in_place() {
        let mut reg = KindRegistry::builtin();
        reg.register("button", KindSpec::container(PaletteGroup::Components));
        assert!(reg.is_container(&Kind::new("button")));
        // still listed once, in the original slot
        let listed = reg.kinds().filter(|k| k.as_str() == "button").count();
        assert_eq!(listed, 1);
    }
}
