use floorstack::EditorSession;
use floorstack::editor::BufferAction;
use floorstack::model::Element;

fn session_with_table() -> EditorSession {
    let mut session = EditorSession::new();
    session.add_element(
        Element::new("mesa_1", "mesa")
            .with_name("Mesa de trabajo")
            .with_category("mesas")
            .with_dimensions(120.0, 80.0, 75.0)
            .at(40.0, 60.0),
    );
    session
}

#[test]
fn move_then_restore_reproduces_element() {
    let mut session = session_with_table();
    let before = session.document.element("mesa_1").cloned().unwrap();

    let buffer_id = session.move_to_buffer("mesa_1").unwrap();
    assert!(session.document.element("mesa_1").is_none());
    assert_eq!(
        session.buffer.get(&buffer_id).map(|i| i.source.action),
        Some(BufferAction::Moved)
    );

    assert!(session.restore_from_buffer(&buffer_id));
    let after = session.document.element("mesa_1").unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.floor_id, before.floor_id);
    assert_eq!(after.position, before.position);
    assert!(session.buffer.is_empty());
}

#[test]
fn copy_then_paste_adds_new_element() {
    let mut session = session_with_table();
    let original = session.document.element("mesa_1").cloned().unwrap();

    let buffer_id = session.copy_to_buffer("mesa_1").unwrap();
    let pasted = session.paste_from_buffer(&buffer_id, Some((5.0, 5.0))).unwrap();

    assert_ne!(pasted, "mesa_1");
    assert_eq!(session.document.element("mesa_1"), Some(&original));
    let copy = session.document.element(&pasted).unwrap();
    assert_eq!((copy.position.x, copy.position.y), (5.0, 5.0));
    assert_eq!(copy.dimensions, original.dimensions);
    assert!(session.buffer.get(&buffer_id).is_some());

    let again = session.paste_from_buffer(&buffer_id, Some((9.0, 9.0))).unwrap();
    assert_ne!(again, pasted);
    assert_eq!(session.document.elements.len(), 3);
}

#[test]
fn buffer_survives_undo() {
    let mut session = session_with_table();
    let buffer_id = session.move_to_buffer("mesa_1").unwrap();
    assert!(session.undo());
    assert!(session.document.element("mesa_1").is_some());
    assert!(session.buffer.get(&buffer_id).is_some());
}

#[test]
fn unknown_ids_fail_without_changes() {
    let mut session = session_with_table();
    let history = session.history.len();
    assert!(session.move_to_buffer("ghost").is_none());
    assert!(session.copy_to_buffer("ghost").is_none());
    assert!(!session.restore_from_buffer("buffer_0"));
    assert!(session.paste_from_buffer("buffer_0", None).is_none());
    assert!(!session.remove_from_buffer("buffer_0"));
    assert_eq!(session.history.len(), history);
    assert_eq!(session.document.elements.len(), 1);
}

#[test]
fn clear_reports_count() {
    let mut session = session_with_table();
    session.add_element(Element::new("caja_1", "caja"));
    session.copy_to_buffer("mesa_1");
    session.copy_to_buffer("caja_1");
    session.copy_to_buffer("mesa_1");
    assert_eq!(session.buffer.len(), 2);
    assert!(session.buffer.contains_original("caja_1"));
    assert_eq!(session.clear_buffer(), 2);
    assert_eq!(session.clear_buffer(), 0);
}
