//! Hierarchical navigation: floors and containers.
//!
//! The current location is either a floor or an element opened as a
//! container. The path records how it was reached, starting at a floor:
//!
//! ```text
//! [planta_1] -> [armario_3] -> [caja_7]
//! ```
//!
//! Navigation changes what is visible and how large the canvas is, never the
//! persisted element/floor data.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::model::{Element, Pan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Floor(String),
    Element(String),
}

impl Location {
    pub fn kind(&self) -> EntryKind {
        match self {
            Location::Floor(_) => EntryKind::Floor,
            Location::Element(_) => EntryKind::Element,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Location::Floor(id) | Location::Element(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "planta")]
    Floor,
    #[serde(rename = "elemento")]
    Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub kind: EntryKind,
    pub id: String,
    pub name: String,
}

/// Where the editor is looking, and how it got there.
///
/// Once initialized, `path` is never empty, `path[0]` is a floor and the
/// last entry names the current location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationContext {
    location: Option<Location>,
    path: Vec<PathEntry>,
}

impl NavigationContext {
    fn at_floor(id: &str, name: &str) -> Self {
        Self {
            location: Some(Location::Floor(id.to_string())),
            path: vec![PathEntry {
                kind: EntryKind::Floor,
                id: id.to_string(),
                name: name.to_string(),
            }],
        }
    }

    /// Rebuild a context from a stored path. Returns `None` if the path does
    /// not start with a floor entry.
    pub fn from_path(path: Vec<PathEntry>) -> Option<Self> {
        let first = path.first()?;
        if first.kind != EntryKind::Floor {
            return None;
        }
        let last = path.last()?;
        let location = match last.kind {
            EntryKind::Floor => Location::Floor(last.id.clone()),
            EntryKind::Element => Location::Element(last.id.clone()),
        };
        Some(Self {
            location: Some(location),
            path,
        })
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.location.is_some()
    }

    /// Floor at the root of the path.
    pub fn root_floor(&self) -> Option<&str> {
        self.path.first().map(|entry| entry.id.as_str())
    }

    pub fn is_at_root(&self) -> bool {
        self.path.len() <= 1
    }
}

/// Canvas dimensions for the current location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveCanvas {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl AdaptiveCanvas {
    pub fn floor_default(config: &EditorConfig) -> Self {
        Self {
            width: config.default_canvas.width,
            height: config.default_canvas.height,
            scale: 1.0,
        }
    }

    /// Canvas for the inside of `container`: its plan footprint scaled up,
    /// never smaller than the configured minimum.
    pub fn for_container(container: &Element, config: &EditorConfig) -> Self {
        let scale = config.canvas_scale;
        Self {
            width: (container.dimensions.width * scale).max(config.min_canvas.width),
            height: (container.dimensions.length * scale).max(config.min_canvas.height),
            scale,
        }
    }
}

/// One breadcrumb in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub kind: EntryKind,
    pub id: String,
    pub name: String,
    pub icon: &'static str,
}

/// Icon tag for a category.
pub fn category_icon(category: &str) -> &'static str {
    match category {
        "anaqueles" => "rack",
        "estantes" => "shelf",
        "mesas" => "table",
        "armarios" => "cabinet",
        "contenedores" => "container",
        _ => "box",
    }
}

impl Document {
    /// Open an element as a container. Returns false (and changes nothing)
    /// if the element does not exist.
    pub fn enter_element(&mut self, element_id: &str) -> bool {
        let Some(element) = self.element(element_id) else {
            warn!(element_id, "cannot enter unknown element");
            return false;
        };
        let entry = PathEntry {
            kind: EntryKind::Element,
            id: element.id.clone(),
            name: element.display_name().to_string(),
        };
        let canvas = AdaptiveCanvas::for_container(element, &self.config);
        if !self.navigation.is_initialized() {
            let floor_id = element.floor_id.clone();
            let floor_name = self
                .floor(&floor_id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| floor_id.clone());
            self.navigation = NavigationContext::at_floor(&floor_id, &floor_name);
        }
        self.navigation.path.push(entry);
        self.navigation.location = Some(Location::Element(element_id.to_string()));
        self.canvas = canvas;
        self.reset_viewport();
        debug!(element_id, depth = self.navigation.path.len(), "entered element");
        true
    }

    /// Go up one level. Returns false when already at the floor root.
    pub fn exit_to_parent(&mut self) -> bool {
        if self.navigation.is_at_root() {
            return false;
        }
        self.navigation.path.pop();
        let Some(tail) = self.navigation.path.last() else {
            return false;
        };
        match tail.kind {
            EntryKind::Floor => {
                self.navigation.location = Some(Location::Floor(tail.id.clone()));
                self.canvas = AdaptiveCanvas::floor_default(&self.config);
            }
            EntryKind::Element => {
                let id = tail.id.clone();
                self.canvas = match self.element(&id) {
                    Some(element) => AdaptiveCanvas::for_container(element, &self.config),
                    None => AdaptiveCanvas::floor_default(&self.config),
                };
                self.navigation.location = Some(Location::Element(id));
            }
        }
        self.reset_viewport();
        true
    }

    /// Jump to the root of a floor and make it the active floor.
    pub fn go_to_floor(&mut self, floor_id: &str) -> bool {
        let Some(floor) = self.floor(floor_id) else {
            warn!(floor_id, "cannot navigate to unknown floor");
            return false;
        };
        self.navigation = NavigationContext::at_floor(&floor.id, &floor.name);
        self.active_floor = Some(floor_id.to_string());
        self.canvas = AdaptiveCanvas::floor_default(&self.config);
        self.reset_viewport();
        true
    }

    /// Elements shown at the current location.
    ///
    /// At a floor: root elements of that floor. Inside a container: its
    /// children in order, skipping ids that no longer resolve.
    pub fn visible_elements(&self) -> Vec<&Element> {
        match self.navigation.location() {
            Some(Location::Floor(floor_id)) => self
                .elements
                .iter()
                .filter(|e| &e.floor_id == floor_id && e.parent.is_none())
                .collect(),
            Some(Location::Element(container_id)) => match self.element(container_id) {
                Some(container) => container
                    .children
                    .iter()
                    .filter_map(|id| self.element(id))
                    .collect(),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    /// Breadcrumbs for the current path, re-resolved against the live data.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.navigation
            .path
            .iter()
            .filter_map(|entry| match entry.kind {
                EntryKind::Floor => self.floor(&entry.id).map(|floor| Breadcrumb {
                    kind: EntryKind::Floor,
                    id: floor.id.clone(),
                    name: floor.name.clone(),
                    icon: "floor",
                }),
                EntryKind::Element => self.element(&entry.id).map(|element| Breadcrumb {
                    kind: EntryKind::Element,
                    id: element.id.clone(),
                    name: element.display_name().to_string(),
                    icon: category_icon(&element.category),
                }),
            })
            .collect()
    }

    /// Make sure navigation points somewhere valid.
    ///
    /// If the root floor is gone, navigation moves to the active (or first)
    /// floor. Otherwise the path is cut at its first element that no longer
    /// exists and the location moves to the new tail.
    pub fn ensure_navigation(&mut self) {
        let root_ok = self
            .navigation
            .root_floor()
            .is_some_and(|id| self.floor(id).is_some());
        if root_ok {
            self.truncate_stale_path();
            return;
        }
        let target = self
            .active_floor
            .clone()
            .filter(|id| self.floor(id).is_some())
            .or_else(|| self.floors.first().map(|f| f.id.clone()));
        match target {
            Some(id) => {
                self.go_to_floor(&id);
            }
            None => {
                self.navigation = NavigationContext::default();
                self.canvas = AdaptiveCanvas::floor_default(&self.config);
            }
        }
    }

    fn truncate_stale_path(&mut self) {
        let Some(stale) = self
            .navigation
            .path
            .iter()
            .position(|entry| entry.kind == EntryKind::Element && self.element(&entry.id).is_none())
        else {
            return;
        };
        self.navigation.path.truncate(stale);
        let Some(tail) = self.navigation.path.last() else {
            return;
        };
        debug!(tail = %tail.id, depth = self.navigation.path.len(), "dropped stale navigation entries");
        match tail.kind {
            EntryKind::Floor => {
                self.navigation.location = Some(Location::Floor(tail.id.clone()));
                self.canvas = AdaptiveCanvas::floor_default(&self.config);
            }
            EntryKind::Element => {
                let id = tail.id.clone();
                if let Some(container) = self.element(&id) {
                    self.canvas = AdaptiveCanvas::for_container(container, &self.config);
                }
                self.navigation.location = Some(Location::Element(id));
            }
        }
    }

    pub(crate) fn set_navigation(&mut self, navigation: NavigationContext, canvas: AdaptiveCanvas) {
        self.navigation = navigation;
        self.canvas = canvas;
    }

    fn reset_viewport(&mut self) {
        self.zoom = 1.0;
        self.pan = Pan::default();
        self.selection = None;
    }
}
