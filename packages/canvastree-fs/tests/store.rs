use canvastree_fs::{FileStore, DEFAULT_FILE};

use canvastree_core::{
    Builder, ComponentNode, DocumentStore, DropOutcome, DropTarget, Error, HoverInfo, HoverRect,
    KindRegistry, NoopDispatcher, SequentialIds,
};

fn sample_nodes() -> Vec<ComponentNode> {
    vec![
        ComponentNode::new("c", "div-container").with_children(vec![
            ComponentNode::new("b", "button").with_attribute("label", "Button"),
        ]),
        ComponentNode::new("s", "separator"),
    ]
}

#[test]
fn load_before_any_save_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::in_dir(dir.path());
    let nodes = sample_nodes();
    store.save(&nodes).unwrap();
    assert_eq!(store.load().unwrap().unwrap(), nodes);
    assert!(dir.path().join(DEFAULT_FILE).exists());
}

#[test]
fn saves_overwrite_the_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::in_dir(dir.path());
    store.save(&sample_nodes()).unwrap();
    let replacement = vec![ComponentNode::new("only", "badge")];
    store.save(&replacement).unwrap();
    assert_eq!(store.load().unwrap().unwrap(), replacement);
}

#[test]
fn save_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::at(dir.path().join("nested/deeper/ui.json"));
    store.save(&sample_nodes()).unwrap();
    assert_eq!(store.load().unwrap().unwrap(), sample_nodes());
}

#[test]
fn corrupt_files_surface_as_persistence_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_FILE);
    std::fs::write(&path, b"{ not json ").unwrap();
    let store = FileStore::at(path);
    let err = store.load().unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));
}

#[test]
fn a_session_survives_a_restart_through_the_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = Builder::new(
        FileStore::in_dir(dir.path()),
        SequentialIds::new("n"),
        NoopDispatcher,
        KindRegistry::builtin(),
    );
    first.drag_start("card");
    let hover = HoverInfo::new(DropTarget::Root, HoverRect::new(0.0, 600.0))
        .with_dragged(HoverRect::new(290.0, 20.0));
    first.drag_over(Some(hover));
    let DropOutcome::Dropped(card) = first.drag_end().unwrap() else {
        panic!("expected a drop");
    };

    // a later session sees exactly what the first one rendered
    let second = Builder::open(
        FileStore::in_dir(dir.path()),
        SequentialIds::new("m"),
        NoopDispatcher,
        KindRegistry::builtin(),
    )
    .unwrap();
    assert_eq!(second.document(), first.document());
    assert_eq!(
        second.document().node(&card).unwrap().attr_str("title"),
        Some("Card Title")
    );
}
