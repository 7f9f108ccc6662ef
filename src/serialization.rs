//! JSON import/export of a whole [`Document`].
//!
//! The persisted format is versioned through `meta.version`:
//!
//! ```text
//! {
//!   meta:          { version, timestamp, app },
//!   plantas:       [ { id, nombre, descripcion, dimensiones, pesoMaximoSoportado,
//!                      elementos, activa, propiedadesPersonalizadas } ],
//!   elementos:     [ { id, nombre, tipo, categoria, plantaId, dimensiones, posicion,
//!                      visual, propiedades, jerarquia, propiedadesPersonalizadas,
//!                      metadatos } ],
//!   configuracion: { plantaActiva, elementoSeleccionado, vistaActiva, zoom, panX, panY,
//!                    contextoNavegacion, canvasAdaptativo }
//! }
//! ```
//!
//! Older files stored geometry and presentation as flat element fields
//! (`x`, `y`, `width`, `height`, `colorBase`...). Those are still read; when
//! both shapes are present the nested group wins.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::document::Document;
use crate::editor::navigation::{AdaptiveCanvas, EntryKind, Location, NavigationContext, PathEntry};
use crate::error::{EditorError, EditorResult};
use crate::ids::unique_id;
use crate::model::{
    DEFAULT_ELEMENT_COLOR, DEFAULT_ELEMENT_SHAPE, Dimensions, Element, Floor, FloorDimensions,
    Metadata, MountLocation, Pan, Position, Properties, ViewPlane,
};

pub const FORMAT_VERSION: &str = "1.0.0";
pub const FLOORS_ONLY_KIND: &str = "plantas-only";

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Meta {
    version: Option<String>,
    timestamp: Option<String>,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireDocument {
    meta: Meta,
    plantas: Vec<WireFloor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elementos: Option<Vec<WireElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    configuracion: Option<WireConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireFloorDimensions {
    alto: Option<f64>,
    ancho: Option<f64>,
    largo: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireFloor {
    id: String,
    #[serde(rename = "nombre")]
    name: Option<String>,
    #[serde(rename = "descripcion")]
    description: Option<String>,
    #[serde(rename = "dimensiones")]
    dimensions: WireFloorDimensions,
    #[serde(rename = "pesoMaximoSoportado")]
    max_load: Option<f64>,
    #[serde(rename = "elementos", skip_serializing_if = "Option::is_none")]
    elements: Option<Vec<String>>,
    #[serde(rename = "activa", skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    #[serde(rename = "propiedadesPersonalizadas")]
    custom_properties: Properties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireDimensions {
    ancho: Option<f64>,
    largo: Option<f64>,
    alto: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WirePosition {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    rotation: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireVisual {
    #[serde(rename = "colorBase")]
    color: Option<String>,
    #[serde(rename = "forma")]
    shape: Option<String>,
    visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireProperties {
    #[serde(rename = "pesoMaximo")]
    max_weight: Option<f64>,
    #[serde(rename = "ubicacion")]
    mount: Option<String>,
    #[serde(rename = "descripcion")]
    description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireHierarchy {
    #[serde(rename = "padre")]
    parent: Option<String>,
    #[serde(rename = "hijos")]
    children: Option<Vec<String>>,
    #[serde(rename = "nivel")]
    level: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireMetadata {
    #[serde(rename = "fechaCreacion")]
    created_at: Option<String>,
    #[serde(rename = "fechaModificacion")]
    modified_at: Option<String>,
    #[serde(rename = "creador")]
    creator: Option<String>,
}

/// An element as stored on disk. The flat fields at the bottom are the
/// legacy shape: read on import, never written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireElement {
    id: String,
    #[serde(rename = "nombre")]
    name: Option<String>,
    #[serde(rename = "tipo")]
    element_type: Option<String>,
    #[serde(rename = "categoria")]
    category: Option<String>,
    #[serde(rename = "plantaId")]
    floor_id: Option<String>,
    #[serde(rename = "dimensiones")]
    dimensions: Option<WireDimensions>,
    #[serde(rename = "posicion")]
    position: Option<WirePosition>,
    visual: Option<WireVisual>,
    #[serde(rename = "propiedades")]
    properties: Option<WireProperties>,
    #[serde(rename = "jerarquia")]
    hierarchy: Option<WireHierarchy>,
    #[serde(rename = "propiedadesPersonalizadas")]
    custom_properties: Option<Properties>,
    #[serde(rename = "metadatos")]
    metadata: Option<WireMetadata>,

    #[serde(skip_serializing)]
    x: Option<f64>,
    #[serde(skip_serializing)]
    y: Option<f64>,
    #[serde(skip_serializing)]
    z: Option<f64>,
    #[serde(skip_serializing)]
    rotation: Option<f64>,
    #[serde(skip_serializing)]
    width: Option<f64>,
    #[serde(skip_serializing)]
    height: Option<f64>,
    #[serde(skip_serializing)]
    ancho: Option<f64>,
    #[serde(skip_serializing)]
    largo: Option<f64>,
    #[serde(skip_serializing)]
    alto: Option<f64>,
    #[serde(rename = "colorBase", skip_serializing)]
    color: Option<String>,
    #[serde(rename = "forma", skip_serializing)]
    shape: Option<String>,
    #[serde(skip_serializing)]
    visible: Option<bool>,
    #[serde(rename = "pesoMaximo", skip_serializing)]
    max_weight: Option<f64>,
    #[serde(rename = "ubicacion", skip_serializing)]
    mount: Option<String>,
    #[serde(rename = "descripcion", skip_serializing)]
    description: Option<String>,
    #[serde(rename = "padre", skip_serializing)]
    parent: Option<String>,
    #[serde(rename = "hijos", skip_serializing)]
    children: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WirePathEntry {
    #[serde(rename = "tipo")]
    kind: Option<EntryKind>,
    id: String,
    #[serde(rename = "nombre")]
    name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireNavigation {
    #[serde(rename = "tipo")]
    kind: Option<EntryKind>,
    id: Option<String>,
    path: Vec<WirePathEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireCanvas {
    width: Option<f64>,
    height: Option<f64>,
    #[serde(rename = "escala")]
    scale: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireConfig {
    #[serde(rename = "plantaActiva")]
    active_floor: Option<String>,
    #[serde(rename = "elementoSeleccionado")]
    selection: Option<String>,
    #[serde(rename = "vistaActiva")]
    view: Option<String>,
    zoom: Option<f64>,
    #[serde(rename = "panX")]
    pan_x: Option<f64>,
    #[serde(rename = "panY")]
    pan_y: Option<f64>,
    /// Parsed on its own so a damaged context falls back to the default
    /// location instead of rejecting the whole file.
    #[serde(rename = "contextoNavegacion")]
    navigation: Option<Value>,
    #[serde(rename = "canvasAdaptativo")]
    canvas: Option<WireCanvas>,
}

// ────────────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────────────

fn meta(doc: &Document, kind: Option<&str>) -> Meta {
    Meta {
        version: Some(FORMAT_VERSION.to_string()),
        timestamp: Some(Utc::now().to_rfc3339()),
        kind: kind.map(str::to_string),
        app: Some(doc.config().app_name.clone()),
    }
}

fn floor_to_wire(floor: &Floor) -> WireFloor {
    WireFloor {
        id: floor.id.clone(),
        name: Some(floor.name.clone()),
        description: Some(floor.description.clone()),
        dimensions: WireFloorDimensions {
            alto: Some(floor.dimensions.height),
            ancho: Some(floor.dimensions.width),
            largo: Some(floor.dimensions.depth),
        },
        max_load: Some(floor.max_load),
        elements: None,
        active: None,
        custom_properties: floor.custom_properties.clone(),
    }
}

fn element_to_wire(doc: &Document, element: &Element) -> WireElement {
    WireElement {
        id: element.id.clone(),
        name: Some(element.name.clone()),
        element_type: Some(element.element_type.clone()),
        category: Some(element.category.clone()),
        floor_id: Some(element.floor_id.clone()),
        dimensions: Some(WireDimensions {
            ancho: Some(element.dimensions.width),
            largo: Some(element.dimensions.length),
            alto: Some(element.dimensions.height),
        }),
        position: Some(WirePosition {
            x: Some(element.position.x),
            y: Some(element.position.y),
            z: Some(element.position.z),
            rotation: Some(element.position.rotation),
        }),
        visual: Some(WireVisual {
            color: Some(element.color.clone()),
            shape: Some(element.shape.clone()),
            visible: Some(element.is_visible()),
        }),
        properties: Some(WireProperties {
            max_weight: Some(element.max_weight),
            mount: Some(element.mount.label().to_string()),
            description: Some(element.description.clone()),
        }),
        hierarchy: Some(WireHierarchy {
            parent: element.parent.clone(),
            children: Some(element.children.clone()),
            level: Some(doc.depth_of(&element.id)),
        }),
        custom_properties: Some(element.custom_properties.clone()),
        metadata: Some(WireMetadata {
            created_at: Some(element.metadata.created_at.to_rfc3339()),
            modified_at: Some(element.metadata.modified_at.to_rfc3339()),
            creator: Some(element.metadata.creator.clone()),
        }),
        ..Default::default()
    }
}

fn navigation_to_wire(navigation: &NavigationContext) -> Option<WireNavigation> {
    let location = navigation.location()?;
    Some(WireNavigation {
        kind: Some(location.kind()),
        id: Some(location.id().to_string()),
        path: navigation
            .path()
            .iter()
            .map(|entry| WirePathEntry {
                kind: Some(entry.kind),
                id: entry.id.clone(),
                name: entry.name.clone(),
            })
            .collect(),
    })
}

impl Document {
    /// Serialize the whole document, navigation and view state included.
    pub fn to_json(&self) -> EditorResult<String> {
        let plantas = self
            .floors
            .iter()
            .map(|floor| {
                let mut wire = floor_to_wire(floor);
                wire.elements = Some(
                    self.elements_on_floor(&floor.id)
                        .map(|e| e.id.clone())
                        .collect(),
                );
                wire.active = Some(self.active_floor.as_deref() == Some(floor.id.as_str()));
                wire
            })
            .collect();
        let elementos = self
            .elements
            .iter()
            .map(|e| element_to_wire(self, e))
            .collect();
        let navigation = navigation_to_wire(&self.navigation)
            .map(serde_json::to_value)
            .transpose()?;
        let configuracion = WireConfig {
            active_floor: self.active_floor.clone(),
            selection: self.selection.clone(),
            view: Some(self.view.label().to_string()),
            zoom: Some(self.zoom),
            pan_x: Some(self.pan.x),
            pan_y: Some(self.pan.y),
            navigation,
            canvas: Some(WireCanvas {
                width: Some(self.canvas.width),
                height: Some(self.canvas.height),
                scale: Some(self.canvas.scale),
            }),
        };
        let wire = WireDocument {
            meta: meta(self, None),
            plantas,
            elementos: Some(elementos),
            configuracion: Some(configuracion),
        };
        Ok(serde_json::to_string_pretty(&wire)?)
    }

    /// Serialize only the floors, tagged `meta.tipo = "plantas-only"`.
    pub fn floors_to_json(&self) -> EditorResult<String> {
        let wire = WireDocument {
            meta: meta(self, Some(FLOORS_ONLY_KIND)),
            plantas: self.floors.iter().map(floor_to_wire).collect(),
            elementos: None,
            configuracion: None,
        };
        Ok(serde_json::to_string_pretty(&wire)?)
    }

    /// Replace the document's floors, elements and view state with the
    /// contents of `text`.
    ///
    /// Nothing is changed unless the whole document parses and has non-null
    /// `plantas`, `elementos` and `configuracion` sections.
    pub fn load_json(&mut self, text: &str) -> EditorResult<()> {
        let value: Value = serde_json::from_str(text)?;
        for section in ["plantas", "elementos", "configuracion"] {
            if !section_present(&value, section) {
                return Err(EditorError::MissingSection(section));
            }
        }
        let wire: WireDocument = serde_json::from_value(value)?;
        if let Some(version) = wire.meta.version.as_deref() {
            if version != FORMAT_VERSION {
                warn!(version, expected = FORMAT_VERSION, "importing a different format version");
            }
        }

        let floors = floors_from_wire(&wire.plantas, self);
        let config = wire.configuracion.unwrap_or_default();
        let active_floor = config
            .active_floor
            .clone()
            .filter(|id| floors.iter().any(|f| &f.id == id))
            .or_else(|| floors.first().map(|f| f.id.clone()));
        let elements = elements_from_wire(
            wire.elementos.unwrap_or_default(),
            active_floor.as_deref().unwrap_or_default(),
        );

        self.floors = floors;
        self.elements = elements;
        self.active_floor = active_floor;
        self.selection = config.selection.clone();
        self.view = config
            .view
            .as_deref()
            .and_then(ViewPlane::from_label)
            .unwrap_or_default();
        self.zoom = self.config.clamp_zoom(config.zoom.unwrap_or(1.0));
        self.pan = Pan {
            x: config.pan_x.unwrap_or(0.0),
            y: config.pan_y.unwrap_or(0.0),
        };
        self.restore_navigation(config.navigation, config.canvas);
        debug!(
            floors = self.floors.len(),
            elements = self.elements.len(),
            "document imported"
        );
        Ok(())
    }

    fn restore_navigation(&mut self, navigation: Option<Value>, canvas: Option<WireCanvas>) {
        let context = navigation
            .and_then(|value| match serde_json::from_value::<WireNavigation>(value) {
                Ok(wire) => Some(wire),
                Err(err) => {
                    warn!(%err, "ignoring unreadable navigation context");
                    None
                }
            })
            .and_then(|wire| self.navigation_from_wire(wire))
            .or_else(|| self.active_floor_navigation());
        let Some(context) = context else {
            self.set_navigation(
                NavigationContext::default(),
                AdaptiveCanvas::floor_default(&self.config),
            );
            return;
        };
        let computed = match context.location() {
            Some(Location::Element(id)) => self
                .element(id)
                .map(|e| AdaptiveCanvas::for_container(e, &self.config))
                .unwrap_or_else(|| AdaptiveCanvas::floor_default(&self.config)),
            _ => AdaptiveCanvas::floor_default(&self.config),
        };
        let canvas = match canvas {
            Some(WireCanvas {
                width: Some(width),
                height: Some(height),
                scale,
            }) => AdaptiveCanvas {
                width,
                height,
                scale: scale.unwrap_or(computed.scale),
            },
            _ => computed,
        };
        self.set_navigation(context, canvas);
    }

    /// Root of the active floor, without touching the imported viewport.
    fn active_floor_navigation(&self) -> Option<NavigationContext> {
        let floor = self.active_floor_data()?;
        NavigationContext::from_path(vec![PathEntry {
            kind: EntryKind::Floor,
            id: floor.id.clone(),
            name: floor.name.clone(),
        }])
    }

    /// Keep the stored path up to its first entry that no longer resolves.
    fn navigation_from_wire(&self, wire: WireNavigation) -> Option<NavigationContext> {
        let mut path: Vec<PathEntry> = Vec::new();
        let entries = if wire.path.is_empty() {
            match (wire.kind, wire.id) {
                (Some(EntryKind::Floor), Some(id)) => vec![WirePathEntry {
                    kind: Some(EntryKind::Floor),
                    id,
                    name: String::new(),
                }],
                _ => Vec::new(),
            }
        } else {
            wire.path
        };
        for entry in entries {
            let resolved = match entry.kind {
                Some(EntryKind::Floor) if path.is_empty() => {
                    self.floor(&entry.id).map(|f| (EntryKind::Floor, f.name.clone()))
                }
                Some(EntryKind::Element) if !path.is_empty() => self
                    .element(&entry.id)
                    .map(|e| (EntryKind::Element, e.display_name().to_string())),
                _ => None,
            };
            let Some((kind, live_name)) = resolved else {
                break;
            };
            let name = if entry.name.is_empty() {
                live_name
            } else {
                entry.name
            };
            path.push(PathEntry {
                kind,
                id: entry.id,
                name,
            });
        }
        NavigationContext::from_path(path)
    }
}

fn floors_from_wire(wire: &[WireFloor], doc: &Document) -> Vec<Floor> {
    let defaults = doc.config().floor_defaults;
    let mut seen: HashSet<String> = HashSet::new();
    let mut floors = Vec::with_capacity(wire.len());
    for w in wire {
        let id = if w.id.is_empty() || seen.contains(&w.id) {
            unique_id("planta", |candidate| seen.contains(candidate))
        } else {
            w.id.clone()
        };
        seen.insert(id.clone());
        floors.push(Floor {
            id,
            name: w.name.clone().unwrap_or_else(|| "Nueva Planta".to_string()),
            description: w.description.clone().unwrap_or_default(),
            dimensions: FloorDimensions {
                height: w.dimensions.alto.unwrap_or(defaults.height),
                width: w.dimensions.ancho.unwrap_or(defaults.width),
                depth: w.dimensions.largo.unwrap_or(defaults.depth),
            },
            max_load: w.max_load.unwrap_or(defaults.max_load),
            custom_properties: w.custom_properties.clone(),
        });
    }
    floors
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn elements_from_wire(wire: Vec<WireElement>, fallback_floor: &str) -> Vec<Element> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut elements = Vec::with_capacity(wire.len());
    for w in wire {
        let dims = w.dimensions.unwrap_or_default();
        let pos = w.position.unwrap_or_default();
        let visual = w.visual.unwrap_or_default();
        let props = w.properties.unwrap_or_default();
        let hierarchy = w.hierarchy.unwrap_or_default();
        let meta = w.metadata.unwrap_or_default();

        let element_type = w.element_type.unwrap_or_default();
        // A repeated id keeps its first element.
        if seen.contains(&w.id) {
            warn!(id = %w.id, "dropping element with duplicate id");
            continue;
        }
        let id = if w.id.is_empty() {
            let prefix = format!("elem_{}", crate::ids::element_prefix(&element_type));
            unique_id(&prefix, |candidate| seen.contains(candidate))
        } else {
            w.id
        };
        seen.insert(id.clone());

        let mount_label = props.mount.or(w.mount);
        let mount = match mount_label.as_deref() {
            Some(label) => MountLocation::from_label(label).unwrap_or_else(|| {
                warn!(id = %id, label, "unknown mount location, using floor");
                MountLocation::Floor
            }),
            None => MountLocation::Floor,
        };
        let now = Metadata::now();
        let created_at = parse_timestamp(meta.created_at.as_deref()).unwrap_or(now.created_at);
        let modified_at = parse_timestamp(meta.modified_at.as_deref()).unwrap_or(created_at);

        elements.push(Element {
            id,
            name: w.name.unwrap_or_default(),
            element_type,
            category: w.category.unwrap_or_default(),
            floor_id: w.floor_id.unwrap_or_else(|| fallback_floor.to_string()),
            parent: hierarchy.parent.or(w.parent),
            children: hierarchy.children.or(w.children).unwrap_or_default(),
            dimensions: Dimensions {
                width: dims.ancho.or(w.ancho).or(w.width).unwrap_or(0.0),
                length: dims.largo.or(w.largo).or(w.height).unwrap_or(0.0),
                height: dims.alto.or(w.alto).unwrap_or(0.0),
            },
            position: Position {
                x: pos.x.or(w.x).unwrap_or(0.0),
                y: pos.y.or(w.y).unwrap_or(0.0),
                z: pos.z.or(w.z).unwrap_or(0.0),
                rotation: pos.rotation.or(w.rotation).unwrap_or(0.0),
            },
            color: visual
                .color
                .or(w.color)
                .unwrap_or_else(|| DEFAULT_ELEMENT_COLOR.to_string()),
            shape: visual
                .shape
                .or(w.shape)
                .unwrap_or_else(|| DEFAULT_ELEMENT_SHAPE.to_string()),
            visible: visual.visible.or(w.visible),
            max_weight: props.max_weight.or(w.max_weight).unwrap_or(0.0),
            mount,
            description: props.description.or(w.description).unwrap_or_default(),
            custom_properties: w.custom_properties.unwrap_or_default(),
            metadata: Metadata {
                created_at,
                modified_at,
                creator: meta.creator.unwrap_or(now.creator),
            },
        });
    }
    elements
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Complete,
    FloorsOnly,
    Unknown,
}

/// Result of inspecting a document without importing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub kind: DocumentKind,
    pub version: Option<String>,
    pub floors: usize,
    pub elements: usize,
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A section counts only when it is present and not `null`.
fn section_present(value: &Value, key: &str) -> bool {
    value.get(key).is_some_and(|v| !v.is_null())
}

/// Check whether `text` is a complete or floors-only document.
pub fn validate(text: &str) -> ValidationReport {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            return ValidationReport {
                valid: false,
                kind: DocumentKind::Unknown,
                version: None,
                floors: 0,
                elements: 0,
                timestamp: None,
                error: Some(err.to_string()),
            };
        }
    };
    let present = |key: &str| section_present(&value, key);
    let meta_str = |key: &str| {
        value
            .get("meta")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let count = |key: &str| value.get(key).and_then(Value::as_array).map_or(0, Vec::len);

    let kind = if present("plantas") && present("elementos") && present("configuracion") {
        DocumentKind::Complete
    } else if present("plantas") && meta_str("tipo").as_deref() == Some(FLOORS_ONLY_KIND) {
        DocumentKind::FloorsOnly
    } else {
        DocumentKind::Unknown
    };
    ValidationReport {
        valid: kind != DocumentKind::Unknown,
        kind,
        version: meta_str("version"),
        floors: count("plantas"),
        elements: count("elementos"),
        timestamp: meta_str("timestamp"),
        error: None,
    }
}
