use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::FloorDefaults;

/// User-defined key/value properties, kept in insertion order so exports
/// round-trip with the same key order the user entered.
pub type Properties = IndexMap<String, serde_json::Value>;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Physical size of an element. `width` and `length` span the plan (XY)
/// view, `height` is the vertical extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Rotation around the vertical axis, in degrees.
    pub rotation: f64,
}

impl Position {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }
}

/// Canvas pan offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

/// Viewing plane of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewPlane {
    #[default]
    #[serde(rename = "XY")]
    Xy,
    #[serde(rename = "ZX")]
    Zx,
    #[serde(rename = "ZY")]
    Zy,
}

impl ViewPlane {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "XY" => Some(ViewPlane::Xy),
            "ZX" => Some(ViewPlane::Zx),
            "ZY" => Some(ViewPlane::Zy),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewPlane::Xy => "XY",
            ViewPlane::Zx => "ZX",
            ViewPlane::Zy => "ZY",
        }
    }
}

impl std::fmt::Display for ViewPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an element is mounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountLocation {
    #[default]
    #[serde(rename = "suelo")]
    Floor,
    #[serde(rename = "pared")]
    Wall,
}

impl MountLocation {
    /// Parse the persisted label (`"suelo"` / `"pared"`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "suelo" | "floor" => Some(MountLocation::Floor),
            "pared" | "wall" => Some(MountLocation::Wall),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MountLocation::Floor => "suelo",
            MountLocation::Wall => "pared",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Element
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub creator: String,
}

impl Metadata {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            modified_at: now,
            creator: "user".to_string(),
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::now()
    }
}

/// A placeable unit on a floor: shelf, table, cabinet, container...
///
/// Elements form a tree per floor through `parent` / `children`. When
/// `parent` is set, the parent's `children` list contains this element's id
/// and both share the same `floor_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub category: String,
    /// Owning floor.
    pub floor_id: String,
    /// Containing element, `None` for elements at the root of their floor.
    pub parent: Option<String>,
    /// Ordered ids of contained elements.
    pub children: Vec<String>,
    pub dimensions: Dimensions,
    pub position: Position,
    pub color: String,
    pub shape: String,
    /// Absent means visible.
    pub visible: Option<bool>,
    /// Maximum supported weight in kg.
    pub max_weight: f64,
    pub mount: MountLocation,
    pub description: String,
    pub custom_properties: Properties,
    pub metadata: Metadata,
}

pub const DEFAULT_ELEMENT_COLOR: &str = "#3b82f6";
pub const DEFAULT_ELEMENT_SHAPE: &str = "rectangular";

impl Element {
    pub fn new(id: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            element_type: element_type.into(),
            category: String::new(),
            floor_id: String::new(),
            parent: None,
            children: Vec::new(),
            dimensions: Dimensions::default(),
            position: Position::default(),
            color: DEFAULT_ELEMENT_COLOR.to_string(),
            shape: DEFAULT_ELEMENT_SHAPE.to_string(),
            visible: None,
            max_weight: 0.0,
            mount: MountLocation::Floor,
            description: String::new(),
            custom_properties: Properties::new(),
            metadata: Metadata::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_dimensions(mut self, width: f64, length: f64, height: f64) -> Self {
        self.dimensions = Dimensions::new(width, length, height);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position.x = x;
        self.position.y = y;
        self
    }

    pub fn on_floor(mut self, floor_id: impl Into<String>) -> Self {
        self.floor_id = floor_id.into();
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Name for messages and breadcrumbs: the name, else the type, else the id.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.element_type.is_empty() {
            &self.element_type
        } else {
            &self.id
        }
    }

    pub fn touch(&mut self) {
        self.metadata.modified_at = Utc::now();
    }
}

/// Typed partial update for an [`Element`].
///
/// Has no `parent` / `children`: hierarchy only changes through the
/// document's add/remove operations. Unknown fields are rejected when a
/// patch is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub category: Option<String>,
    pub floor_id: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub position: Option<Position>,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub visible: Option<bool>,
    pub max_weight: Option<f64>,
    pub mount: Option<MountLocation>,
    pub description: Option<String>,
    pub custom_properties: Option<Properties>,
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        self == &ElementPatch::default()
    }

    /// Merge the set fields into `element`, returning the names of the
    /// fields that were written.
    pub fn apply(&self, element: &mut Element) -> Vec<&'static str> {
        let mut changed = Vec::new();
        macro_rules! merge {
            ($field:ident, $label:literal) => {
                if let Some(value) = &self.$field {
                    element.$field = value.clone();
                    changed.push($label);
                }
            };
        }
        merge!(name, "name");
        merge!(element_type, "type");
        merge!(category, "category");
        merge!(floor_id, "floor_id");
        merge!(dimensions, "dimensions");
        merge!(position, "position");
        merge!(color, "color");
        merge!(shape, "shape");
        merge!(max_weight, "max_weight");
        merge!(mount, "mount");
        merge!(description, "description");
        merge!(custom_properties, "custom_properties");
        if let Some(visible) = self.visible {
            element.visible = Some(visible);
            changed.push("visible");
        }
        if !changed.is_empty() {
            element.touch();
        }
        changed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Floor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorDimensions {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
}

/// A named level of the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub dimensions: FloorDimensions,
    /// Maximum load capacity in kg.
    pub max_load: f64,
    pub custom_properties: Properties,
}

impl Floor {
    /// Build a floor from a creation request, filling unset fields from `defaults`.
    pub fn from_spec(id: impl Into<String>, spec: &FloorSpec, defaults: &FloorDefaults) -> Self {
        Self {
            id: id.into(),
            name: spec
                .name
                .clone()
                .unwrap_or_else(|| "Nueva Planta".to_string()),
            description: spec.description.clone().unwrap_or_default(),
            dimensions: FloorDimensions {
                height: spec.height.unwrap_or(defaults.height),
                width: spec.width.unwrap_or(defaults.width),
                depth: spec.depth.unwrap_or(defaults.depth),
            },
            max_load: spec.max_load.unwrap_or(defaults.max_load),
            custom_properties: spec.custom_properties.clone(),
        }
    }
}

/// Request to create a floor. Unset fields get the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub max_load: Option<f64>,
    pub custom_properties: Properties,
}

impl FloorSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Typed partial update for a [`Floor`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub dimensions: Option<FloorDimensions>,
    pub max_load: Option<f64>,
    pub custom_properties: Option<Properties>,
}

impl FloorPatch {
    pub fn apply(&self, floor: &mut Floor) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if let Some(name) = &self.name {
            floor.name = name.clone();
            changed.push("name");
        }
        if let Some(description) = &self.description {
            floor.description = description.clone();
            changed.push("description");
        }
        if let Some(dimensions) = self.dimensions {
            floor.dimensions = dimensions;
            changed.push("dimensions");
        }
        if let Some(max_load) = self.max_load {
            floor.max_load = max_load;
            changed.push("max_load");
        }
        if let Some(props) = &self.custom_properties {
            floor.custom_properties = props.clone();
            changed.push("custom_properties");
        }
        changed
    }
}
