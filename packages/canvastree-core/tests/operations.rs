use canvastree_core::{ComponentNode, Document, DropPosition, NodeId};

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

fn page() -> Document {
    // canvas with a two-column layout holding a form, plus a trailing button
    let layout = ComponentNode::new("layout", "layout-2-cols").with_children(vec![
        ComponentNode::new("form", "form").with_children(vec![
            ComponentNode::new("name", "input"),
            ComponentNode::new("submit", "button"),
        ]),
        ComponentNode::new("hint", "alert"),
    ]);
    let mut doc = Document::new();
    assert!(doc.insert_under(None, layout));
    assert!(doc.insert_under(None, ComponentNode::new("cta", "button")));
    doc.validate().unwrap();
    doc
}

#[test]
fn lookups_reach_every_depth() {
    let doc = page();
    assert_eq!(doc.get(&id("cta")).unwrap().kind.as_str(), "button");
    assert_eq!(doc.get(&id("submit")).unwrap().kind.as_str(), "button");
    assert_eq!(doc.parent_of(&id("submit")), Some(&id("form")));
    assert!(doc.get(&id("nope")).is_none());
}

#[test]
fn drop_inside_lands_as_last_child() {
    let mut doc = page();
    let badge = ComponentNode::new("badge", "badge");
    assert!(doc.insert_relative(badge, &id("form"), DropPosition::Inside));
    assert_eq!(
        doc.children_of(&id("form")).unwrap(),
        &[id("name"), id("submit"), id("badge")]
    );
    doc.validate().unwrap();
}

#[test]
fn drop_before_and_after_splice_the_sibling_level() {
    let mut doc = page();
    assert!(doc.insert_relative(
        ComponentNode::new("above", "separator"),
        &id("submit"),
        DropPosition::Before,
    ));
    assert!(doc.insert_relative(
        ComponentNode::new("below", "separator"),
        &id("submit"),
        DropPosition::After,
    ));
    assert_eq!(
        doc.children_of(&id("form")).unwrap(),
        &[id("name"), id("above"), id("submit"), id("below")]
    );
    doc.validate().unwrap();
}

#[test]
fn deleting_a_branch_spares_the_rest() {
    let mut doc = page();
    let before_len = doc.len();
    assert!(doc.remove(&id("form")));
    assert_eq!(doc.len(), before_len - 3);
    assert!(!doc.contains(&id("name")));
    assert!(!doc.contains(&id("submit")));
    assert_eq!(doc.children_of(&id("layout")).unwrap(), &[id("hint")]);
    assert!(doc.contains(&id("cta")));
    doc.validate().unwrap();
}

#[test]
fn edits_relink_a_rewritten_branch() {
    let mut doc = page();
    // the edit surface sends the form back with a reordered, renamed body
    let rewritten = ComponentNode::new("form", "form").with_children(vec![
        ComponentNode::new("submit", "button"),
        ComponentNode::new("email", "input"),
    ]);
    assert!(doc.update(&id("form"), rewritten));
    assert_eq!(
        doc.children_of(&id("form")).unwrap(),
        &[id("submit"), id("email")]
    );
    assert!(!doc.contains(&id("name")));
    // slot within the layout did not change
    assert_eq!(doc.children_of(&id("layout")).unwrap(), &[id("form"), id("hint")]);
    doc.validate().unwrap();
}

#[test]
fn absent_targets_leave_the_document_alone() {
    let mut doc = page();
    let before = doc.clone();
    assert!(!doc.update(&id("ghost"), ComponentNode::new("ghost", "badge")));
    assert!(!doc.remove(&id("ghost")));
    assert!(!doc.move_relative(&id("ghost"), &id("cta"), DropPosition::Before));
    assert!(!doc.insert_relative(
        ComponentNode::new("new", "badge"),
        &id("ghost"),
        DropPosition::After,
    ));
    assert_eq!(doc, before);
}

#[test]
fn reparenting_moves_the_whole_branch() {
    let mut doc = page();
    // drag the form out of the layout, after the trailing button
    assert!(doc.move_relative(&id("form"), &id("cta"), DropPosition::After));
    assert_eq!(doc.roots(), &[id("layout"), id("cta"), id("form")]);
    assert_eq!(doc.parent_of(&id("form")), None);
    // grandchildren came along
    assert_eq!(doc.parent_of(&id("submit")), Some(&id("form")));
    assert_eq!(doc.children_of(&id("layout")).unwrap(), &[id("hint")]);
    doc.validate().unwrap();
}

#[test]
fn persistence_shape_survives_a_full_cycle() {
    let doc = page();
    let exported = doc.nodes();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].children.len(), 2);
    let restored = Document::from_nodes(exported);
    assert_eq!(restored, doc);
}
