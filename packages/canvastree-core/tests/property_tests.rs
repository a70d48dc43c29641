use canvastree_core::{ComponentNode, Document, DropPosition, NodeId};
use proptest::prelude::*;

/// Editing steps over a small id universe. Indices are resolved against
/// `ids()` at apply time, so generated steps freely reference ids that may
/// or may not exist yet; the document must tolerate every combination.
#[derive(Clone, Debug)]
enum Step {
    Insert { parent: Option<usize>, node: usize },
    InsertRelative { node: usize, target: usize, position: DropPosition },
    Move { node: usize, target: usize, position: DropPosition },
    Update { target: usize, replacement: usize },
    Remove { node: usize },
}

const UNIVERSE: usize = 8;

fn ids() -> Vec<NodeId> {
    (0..UNIVERSE).map(|i| NodeId::new(format!("n{i}"))).collect()
}

fn positions() -> impl Strategy<Value = DropPosition> {
    prop_oneof![
        Just(DropPosition::Before),
        Just(DropPosition::After),
        Just(DropPosition::Inside),
    ]
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    let step = prop_oneof![
        (prop::option::of(0..UNIVERSE), 0..UNIVERSE)
            .prop_map(|(parent, node)| Step::Insert { parent, node }),
        (0..UNIVERSE, 0..UNIVERSE, positions())
            .prop_map(|(node, target, position)| Step::InsertRelative { node, target, position }),
        (0..UNIVERSE, 0..UNIVERSE, positions())
            .prop_map(|(node, target, position)| Step::Move { node, target, position }),
        (0..UNIVERSE, 0..UNIVERSE)
            .prop_map(|(target, replacement)| Step::Update { target, replacement }),
        (0..UNIVERSE).prop_map(|node| Step::Remove { node }),
    ];
    prop::collection::vec(step, 1..40)
}

fn apply(doc: &mut Document, step: &Step, ids: &[NodeId]) {
    // every generated node nests, so Inside placements are exercised
    match step {
        Step::Insert { parent, node } => {
            let parent = parent.map(|p| ids[p].clone());
            doc.insert_under(
                parent.as_ref(),
                ComponentNode::new(ids[*node].clone(), "div-container"),
            );
        }
        Step::InsertRelative { node, target, position } => {
            doc.insert_relative(
                ComponentNode::new(ids[*node].clone(), "div-container"),
                &ids[*target],
                *position,
            );
        }
        Step::Move { node, target, position } => {
            doc.move_relative(&ids[*node], &ids[*target], *position);
        }
        Step::Update { target, replacement } => {
            doc.update(
                &ids[*target],
                ComponentNode::new(ids[*replacement].clone(), "card"),
            );
        }
        Step::Remove { node } => {
            doc.remove(&ids[*node]);
        }
    }
}

proptest! {
    #[test]
    fn arbitrary_edit_sequences_keep_the_arena_consistent(steps in steps()) {
        let ids = ids();
        let mut doc = Document::new();
        for step in &steps {
            apply(&mut doc, step, &ids);
            prop_assert!(doc.validate().is_ok(), "after {step:?}");
        }
    }

    #[test]
    fn edits_are_deterministic(steps in steps()) {
        let ids = ids();
        let mut first = Document::new();
        let mut second = Document::new();
        for step in &steps {
            apply(&mut first, step, &ids);
            apply(&mut second, step, &ids);
        }
        prop_assert_eq!(first, second);
    }

    #[test]
    fn export_import_round_trip_is_lossless(steps in steps()) {
        let ids = ids();
        let mut doc = Document::new();
        for step in &steps {
            apply(&mut doc, step, &ids);
        }
        let restored = Document::from_nodes(doc.nodes());
        prop_assert_eq!(&restored, &doc);
        prop_assert!(restored.validate().is_ok());
    }

    #[test]
    fn operations_on_absent_ids_are_identities(steps in steps()) {
        let ids = ids();
        let mut doc = Document::new();
        for step in &steps {
            apply(&mut doc, step, &ids);
        }
        let ghost = NodeId::new("ghost");
        let before = doc.clone();
        prop_assert!(!doc.remove(&ghost));
        prop_assert!(!doc.update(&ghost, ComponentNode::new("ghost", "badge")));
        prop_assert!(!doc.move_relative(&ghost, &ids[0], DropPosition::Before));
        prop_assert!(!doc.insert_relative(
            ComponentNode::new("fresh", "badge"),
            &ghost,
            DropPosition::After,
        ));
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn inserted_ids_are_always_findable_and_unique(steps in steps()) {
        let ids = ids();
        let mut doc = Document::new();
        for step in &steps {
            apply(&mut doc, step, &ids);
        }
        // every exported node is findable by its id, and ids never repeat
        let mut seen = std::collections::HashSet::new();
        for node in doc.iter() {
            prop_assert!(seen.insert(node.id.clone()));
            prop_assert!(doc.get(node.id).is_some());
        }
        prop_assert_eq!(seen.len(), doc.len());
    }
}
