use camino::Utf8PathBuf;
use floorstack::model::{Element, FloorSpec};
use floorstack::source::{DirSink, FsSource};
use floorstack::{DocumentKind, EditorConfig, EditorError, EditorSession, validate};

fn tmp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    (tmp, path)
}

#[test]
fn export_then_import_through_files() {
    let (_tmp, dir) = tmp_dir();
    let mut session = EditorSession::new();
    session.add_floor(&FloorSpec::named("Sótano"));
    session.add_element(Element::new("rack", "anaquel").with_dimensions(200.0, 50.0, 180.0));
    session.enter_element("rack");
    session.add_element(Element::new("bin", "caja"));

    let path = session
        .export_to(&mut DirSink::new(dir.clone()), Some("layout.json"))
        .unwrap();
    assert_eq!(path, dir.join("layout.json"));

    let mut other = EditorSession::new();
    other.import_from(&mut FsSource, &path).unwrap();
    assert_eq!(other.document.floors.len(), 4);
    assert_eq!(other.document.elements.len(), 2);
    assert_eq!(
        other.document.element("bin").and_then(|e| e.parent.as_deref()),
        Some("rack")
    );
    // Importing always lands on the active floor's root.
    assert_eq!(other.document.navigation().path().len(), 1);
    assert_eq!(other.history_entries().last().unwrap().description, "Imported document");
}

#[test]
fn floors_only_export_is_recognized() {
    let (_tmp, dir) = tmp_dir();
    let session = EditorSession::new();
    let path = session
        .export_floors_to(&mut DirSink::new(dir), None)
        .unwrap();
    assert!(path.file_name().unwrap().starts_with("plantas-"));

    let text = std::fs::read_to_string(&path).unwrap();
    let report = validate(&text);
    assert!(report.valid);
    assert_eq!(report.kind, DocumentKind::FloorsOnly);

    // Not importable as a whole document.
    let mut other = EditorSession::new();
    assert!(other.import_from(&mut FsSource, &path).is_err());
    assert_eq!(other.history.len(), 1);
}

#[test]
fn import_rejects_other_extensions() {
    let (_tmp, dir) = tmp_dir();
    let path = dir.join("layout.xml");
    std::fs::write(&path, "{}").unwrap();
    let mut session = EditorSession::new();
    let err = session.import_from(&mut FsSource, &path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EditorError>(),
        Some(EditorError::UnsupportedExtension(_))
    ));
}

#[test]
fn import_missing_file_fails() {
    let (_tmp, dir) = tmp_dir();
    let mut session = EditorSession::new();
    assert!(session.import_from(&mut FsSource, &dir.join("nope.json")).is_err());
    assert_eq!(session.document.floors.len(), 3);
}

#[test]
fn legacy_document_imports() {
    let text = r##"{
        "meta": {"version": "0.9.0"},
        "plantas": [{"id": "p1", "nombre": "Nave", "dimensiones": {"ancho": 500}}],
        "elementos": [
            {"id": "a", "nombre": "Estante", "tipo": "estante", "plantaId": "p1",
             "x": 10, "y": 20, "width": 30, "height": 40, "visible": false,
             "ubicacion": "pared", "padre": null, "hijos": ["b"]},
            {"id": "b", "tipo": "caja", "plantaId": "p1", "padre": "a"}
        ],
        "configuracion": {"plantaActiva": "p1", "vistaActiva": "ZY", "zoom": 9}
    }"##;
    let mut session = EditorSession::new();
    session.deserialize(text).unwrap();
    let doc = &session.document;
    let a = doc.element("a").unwrap();
    assert_eq!((a.position.x, a.position.y), (10.0, 20.0));
    assert_eq!((a.dimensions.width, a.dimensions.length), (30.0, 40.0));
    assert!(!a.is_visible());
    assert_eq!(a.children, vec!["b".to_string()]);
    assert_eq!(doc.element("b").unwrap().parent.as_deref(), Some("a"));
    assert_eq!(doc.floor("p1").unwrap().dimensions.width, 500.0);
    assert_eq!(doc.view.label(), "ZY");
    assert_eq!(doc.zoom, 5.0);
}

#[test]
fn history_limit_comes_from_config() {
    let config = EditorConfig {
        history_limit: 3,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::with_config(config);
    for i in 0..5 {
        session.add_element(Element::new(format!("e{}", i), "caja"));
    }
    assert_eq!(session.history.len(), 3);
}
