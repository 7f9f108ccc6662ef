//! Property-based invariant tests for the document and navigation.
//!
//! Verifies:
//! 1. Floor deletion guard: floors holding elements cannot be removed,
//!    empty ones always can
//! 2. Visibility partition: at a floor only its root elements are visible;
//!    inside an element exactly its children, in order
//! 3. Serialization round-trip keeps ids, types, geometry and hierarchy

use floorstack::editor::Location;
use floorstack::model::Element;
use floorstack::{Document, EditorConfig, EditorError, EditorSession};
use proptest::prelude::*;

const FLOORS: [&str; 3] = ["planta_1", "planta_2", "planta_3"];

/// One element to add: target floor, optional parent pick, geometry.
#[derive(Debug, Clone)]
struct Seed {
    floor: usize,
    parent: Option<usize>,
    x: f64,
    y: f64,
    width: f64,
    length: f64,
}

fn arb_seed() -> impl Strategy<Value = Seed> {
    (
        0usize..3,
        prop::option::of(any::<usize>()),
        0i32..4000,
        0i32..4000,
        1i32..400,
        1i32..400,
    )
        .prop_map(|(floor, parent, x, y, w, l)| Seed {
            floor,
            parent,
            x: x as f64 / 4.0,
            y: y as f64 / 4.0,
            width: w as f64 / 2.0,
            length: l as f64 / 2.0,
        })
}

fn build(doc: &mut Document, seeds: &[Seed]) {
    for (i, seed) in seeds.iter().enumerate() {
        match seed.parent {
            Some(pick) if !doc.elements.is_empty() => {
                let parent = doc.elements[pick % doc.elements.len()].id.clone();
                doc.enter_element(&parent);
            }
            _ => {
                doc.go_to_floor(FLOORS[seed.floor]);
            }
        }
        let kind = if i % 2 == 0 { "contenedor" } else { "caja" };
        doc.add_element(
            Element::new(format!("e{}", i), kind)
                .with_dimensions(seed.width, seed.length, 10.0)
                .at(seed.x, seed.y),
        );
    }
}

proptest! {
    #[test]
    fn floor_removal_guard(seeds in prop::collection::vec(arb_seed(), 0..12)) {
        let mut doc = Document::with_default_floors(EditorConfig::default());
        build(&mut doc, &seeds);
        for floor in FLOORS {
            let before = doc.floors.len();
            let count = doc.elements_on_floor(floor).count();
            match doc.remove_floor(floor) {
                Err(EditorError::FloorNotEmpty { element_count, .. }) => {
                    prop_assert!(count > 0);
                    prop_assert_eq!(element_count, count);
                    prop_assert_eq!(doc.floors.len(), before);
                }
                Ok(Some(_)) => {
                    prop_assert_eq!(count, 0);
                    prop_assert_eq!(doc.floors.len(), before - 1);
                }
                other => prop_assert!(false, "unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn visibility_partition(seeds in prop::collection::vec(arb_seed(), 0..16)) {
        let mut doc = Document::with_default_floors(EditorConfig::default());
        build(&mut doc, &seeds);

        for floor in FLOORS {
            doc.go_to_floor(floor);
            let visible: Vec<String> = doc.visible_elements().iter().map(|e| e.id.clone()).collect();
            let expected: Vec<String> = doc
                .elements
                .iter()
                .filter(|e| e.floor_id == floor && e.parent.is_none())
                .map(|e| e.id.clone())
                .collect();
            prop_assert_eq!(visible, expected);
        }

        let ids: Vec<String> = doc.elements.iter().map(|e| e.id.clone()).collect();
        for id in ids {
            prop_assert!(doc.enter_element(&id));
            prop_assert_eq!(doc.navigation().location(), Some(&Location::Element(id.clone())));
            let visible: Vec<String> = doc.visible_elements().iter().map(|e| e.id.clone()).collect();
            let children = doc.element(&id).map(|e| e.children.clone()).unwrap_or_default();
            prop_assert_eq!(visible, children);
        }
    }

    #[test]
    fn serialization_round_trip(seeds in prop::collection::vec(arb_seed(), 0..16)) {
        let mut session = EditorSession::new();
        build(&mut session.document, &seeds);
        let text = session.serialize().unwrap();

        let mut restored = EditorSession::new();
        restored.deserialize(&text).unwrap();
        let (a, b) = (&session.document, &restored.document);
        prop_assert_eq!(a.floors.len(), b.floors.len());
        prop_assert_eq!(a.elements.len(), b.elements.len());
        for (x, y) in a.elements.iter().zip(&b.elements) {
            prop_assert_eq!(&x.id, &y.id);
            prop_assert_eq!(&x.element_type, &y.element_type);
            prop_assert_eq!(&x.floor_id, &y.floor_id);
            prop_assert_eq!(x.position, y.position);
            prop_assert_eq!(x.dimensions, y.dimensions);
            prop_assert_eq!(&x.parent, &y.parent);
            prop_assert_eq!(&x.children, &y.children);
        }
    }
}
