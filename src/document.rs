//! The live document: elements, floors, view state and navigation.
//!
//! Mutators here never record history themselves. [`EditorSession`]
//! wraps the undoable ones and records a snapshot after they succeed.
//!
//! [`EditorSession`]: crate::editor::EditorSession

use tracing::debug;

use crate::config::EditorConfig;
use crate::editor::history::Restorable;
use crate::editor::navigation::{AdaptiveCanvas, Location, NavigationContext};
use crate::error::{EditorError, EditorResult};
use crate::ids::{element_prefix, unique_id};
use crate::model::{Element, ElementPatch, Floor, FloorPatch, FloorSpec, Pan, ViewPlane};

/// Immutable copy of the undoable part of a [`Document`].
///
/// Navigation and canvas sizing are not part of it: undo moves the data,
/// not the viewpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub elements: Vec<Element>,
    pub floors: Vec<Floor>,
    pub active_floor: Option<String>,
    pub selection: Option<String>,
    pub view: ViewPlane,
    pub zoom: f64,
    pub pan: Pan,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub elements: Vec<Element>,
    pub floors: Vec<Floor>,
    pub active_floor: Option<String>,
    /// Selected element id. Not validated against `elements`.
    pub selection: Option<String>,
    pub view: ViewPlane,
    pub zoom: f64,
    pub pan: Pan,
    pub(crate) navigation: NavigationContext,
    pub(crate) canvas: AdaptiveCanvas,
    pub(crate) config: EditorConfig,
}

impl Document {
    /// An empty document with no floors.
    pub fn new(config: EditorConfig) -> Self {
        let canvas = AdaptiveCanvas::floor_default(&config);
        Self {
            elements: Vec::new(),
            floors: Vec::new(),
            active_floor: None,
            selection: None,
            view: ViewPlane::Xy,
            zoom: 1.0,
            pan: Pan::default(),
            navigation: NavigationContext::default(),
            canvas,
            config,
        }
    }

    /// A document with the three standard floors, positioned on the first.
    pub fn with_default_floors(config: EditorConfig) -> Self {
        let mut doc = Self::new(config);
        let seeds = [
            ("planta_1", "Planta Baja", "Nivel principal del edificio"),
            ("planta_2", "Primer Piso", "Segundo nivel del edificio"),
            ("planta_3", "Segundo Piso", "Tercer nivel del edificio"),
        ];
        for (id, name, description) in seeds {
            let spec = FloorSpec {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                ..Default::default()
            };
            doc.floors
                .push(Floor::from_spec(id, &spec, &doc.config.floor_defaults));
        }
        doc.go_to_floor("planta_1");
        doc
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationContext {
        &self.navigation
    }

    pub fn canvas(&self) -> AdaptiveCanvas {
        self.canvas
    }

    // ── Queries ────────────────────────────────────────────────────────────

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn floor(&self, id: &str) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id == id)
    }

    /// Every element placed on `floor_id`, nested ones included.
    pub fn elements_on_floor<'a>(&'a self, floor_id: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |e| e.floor_id == floor_id)
    }

    pub fn active_floor_data(&self) -> Option<&Floor> {
        self.active_floor.as_deref().and_then(|id| self.floor(id))
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_deref().and_then(|id| self.element(id))
    }

    /// Nesting depth of an element: 0 at the root of its floor.
    pub fn depth_of(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.element(id).and_then(|e| e.parent.as_deref());
        // Bounded walk in case of a parent cycle in imported data.
        while let Some(parent_id) = current {
            if depth >= self.elements.len() {
                break;
            }
            depth += 1;
            current = self.element(parent_id).and_then(|e| e.parent.as_deref());
        }
        depth
    }

    // ── View state ─────────────────────────────────────────────────────────

    pub fn select_element(&mut self, id: Option<&str>) {
        self.selection = id.map(str::to_string);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.config.clamp_zoom(zoom);
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan = Pan { x, y };
    }

    /// Returns true if the view actually changed.
    pub fn set_view(&mut self, view: ViewPlane) -> bool {
        let changed = self.view != view;
        self.view = view;
        changed
    }

    // ── Elements ───────────────────────────────────────────────────────────

    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.position.x = x;
                element.position.y = y;
                element.touch();
                true
            }
            None => false,
        }
    }

    /// Merge `patch` into the element. Returns the written field names, or
    /// `None` when the element does not exist.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> Option<Vec<&'static str>> {
        self.element_mut(id).map(|element| patch.apply(element))
    }

    /// Add an element at the current navigation location.
    ///
    /// At a floor the element becomes a root element of that floor. Inside a
    /// container it becomes the container's last child and inherits its
    /// floor. Returns the element's id (regenerated if empty or taken).
    pub fn add_element(&mut self, mut element: Element) -> String {
        let container = match self.navigation.location() {
            Some(Location::Floor(floor_id)) if self.floor(floor_id).is_some() => {
                element.floor_id = floor_id.clone();
                element.parent = None;
                None
            }
            Some(Location::Element(container_id)) => match self.element(container_id) {
                Some(container) => {
                    element.floor_id = container.floor_id.clone();
                    element.parent = Some(container.id.clone());
                    Some(container.id.clone())
                }
                None => {
                    self.place_at_active_root(&mut element);
                    None
                }
            },
            _ => {
                self.place_at_active_root(&mut element);
                None
            }
        };
        let id = self.insert_element(element);
        if let Some(container_id) = container {
            if let Some(container) = self.element_mut(&container_id) {
                container.children.push(id.clone());
            }
        }
        id
    }

    /// Stale or missing locations put new elements at the active floor's root.
    fn place_at_active_root(&self, element: &mut Element) {
        let active = self
            .active_floor
            .as_ref()
            .filter(|id| self.floor(id).is_some())
            .or_else(|| self.floors.first().map(|f| &f.id));
        if let Some(floor_id) = active {
            element.floor_id = floor_id.clone();
        }
        element.parent = None;
    }

    /// Append an element as-is, without consulting the navigation context.
    /// The id is kept unless it is empty or already used.
    pub(crate) fn insert_element(&mut self, mut element: Element) -> String {
        if element.id.is_empty() || self.element(&element.id).is_some() {
            let prefix = format!("elem_{}", element_prefix(&element.element_type));
            element.id = unique_id(&prefix, |candidate| self.element(candidate).is_some());
        }
        let id = element.id.clone();
        debug!(id = %id, floor = %element.floor_id, "element inserted");
        self.elements.push(element);
        id
    }

    /// Remove an element, clearing the selection if it pointed at it.
    ///
    /// Other elements are not touched: the former parent keeps the id in its
    /// `children`, and children keep pointing at the removed parent. Use
    /// [`Document::remove_element_cascade`] to repair both sides.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        let removed = self.elements.remove(index);
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
        Some(removed)
    }

    /// Remove an element and repair the hierarchy around it: the id leaves
    /// its parent's `children`, and its children become root elements.
    pub fn remove_element_cascade(&mut self, id: &str) -> Option<Element> {
        let removed = self.remove_element(id)?;
        if let Some(parent_id) = &removed.parent {
            if let Some(parent) = self.element_mut(parent_id) {
                parent.children.retain(|child| child != id);
            }
        }
        for element in &mut self.elements {
            if element.parent.as_deref() == Some(id) {
                element.parent = None;
            }
        }
        Some(removed)
    }

    /// Flip visibility (absent counts as visible). Returns the new state.
    pub fn toggle_visibility(&mut self, id: &str) -> Option<bool> {
        let element = self.element_mut(id)?;
        let visible = !element.is_visible();
        element.visible = Some(visible);
        element.touch();
        Some(visible)
    }

    // ── Floors ─────────────────────────────────────────────────────────────

    /// Make `floor_id` the active floor and clear the selection.
    pub fn select_floor(&mut self, floor_id: &str) -> bool {
        if self.floor(floor_id).is_none() {
            return false;
        }
        self.active_floor = Some(floor_id.to_string());
        self.selection = None;
        true
    }

    pub fn add_floor(&mut self, spec: &FloorSpec) -> String {
        let id = unique_id("planta", |candidate| self.floor(candidate).is_some());
        let floor = Floor::from_spec(id.clone(), spec, &self.config.floor_defaults);
        self.floors.push(floor);
        id
    }

    pub fn edit_floor(&mut self, id: &str, patch: &FloorPatch) -> Option<Vec<&'static str>> {
        self.floors
            .iter_mut()
            .find(|f| f.id == id)
            .map(|floor| patch.apply(floor))
    }

    /// Remove a floor that no element references.
    ///
    /// Fails with [`EditorError::FloorNotEmpty`] otherwise, leaving the
    /// floor list untouched. `Ok(None)` means no such floor. When the
    /// active floor goes away, the first remaining floor becomes active.
    pub fn remove_floor(&mut self, id: &str) -> EditorResult<Option<Floor>> {
        let element_count = self.elements_on_floor(id).count();
        if element_count > 0 {
            return Err(EditorError::FloorNotEmpty {
                floor_id: id.to_string(),
                element_count,
            });
        }
        let Some(index) = self.floors.iter().position(|f| f.id == id) else {
            return Ok(None);
        };
        let removed = self.floors.remove(index);
        if self.active_floor.as_deref() == Some(id) {
            self.active_floor = self.floors.first().map(|f| f.id.clone());
        }
        if self.navigation.root_floor() == Some(id) {
            match self.active_floor.clone() {
                Some(next) => {
                    self.go_to_floor(&next);
                }
                None => {
                    self.navigation = NavigationContext::default();
                    self.canvas = AdaptiveCanvas::floor_default(&self.config);
                }
            }
        }
        Ok(Some(removed))
    }
}

impl Restorable for Document {
    type State = DocumentSnapshot;

    fn capture(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.elements.clone(),
            floors: self.floors.clone(),
            active_floor: self.active_floor.clone(),
            selection: self.selection.clone(),
            view: self.view,
            zoom: self.zoom,
            pan: self.pan,
        }
    }

    fn restore(&mut self, state: &DocumentSnapshot) {
        self.elements = state.elements.clone();
        self.floors = state.floors.clone();
        self.active_floor = state.active_floor.clone();
        self.selection = state.selection.clone();
        self.view = state.view;
        self.zoom = state.zoom;
        self.pan = state.pan;
    }
}
