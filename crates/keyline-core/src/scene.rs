//! # Scene Model
//!
//! The editor's document structure: a [`Project`] owning an ordered list of
//! [`Layer`]s, each wrapping exactly one renderable [`Element`]. Elements are
//! a tagged shape union; the `Group` variant owns its children, so the model
//! is a tree and plain recursive traversals cover rendering and export.
//!
//! The model is pure data. Mutation goes through the named operations on
//! `Project` (see `keyframes.rs`) so there is a single source of truth
//! without a global store.

use serde::{Deserialize, Serialize};

use crate::keyframes::Keyframe;

/// The root aggregate: canvas, timing, layers and the flat keyframe list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frame_rate: f64,
    /// Total duration in seconds.
    pub duration: f64,
    /// Current playback time in seconds, always within `[0, duration]`.
    pub current_time: f64,
    pub playing: bool,
    /// Paint order: first layer is the bottom of the stack.
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub selected_layer: Option<String>,
    /// Flat keyframe list; keyframes reference layers by id, not by pointer.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    /// Monotonic counter backing id minting. Not persisted; rebuilt on load.
    #[serde(skip)]
    id_counter: u64,
}

impl Project {
    pub fn new(name: &str, width: u32, height: u32, frame_rate: f64, duration: f64) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            frame_rate,
            duration,
            current_time: 0.0,
            playing: false,
            layers: Vec::new(),
            selected_layer: None,
            keyframes: Vec::new(),
            id_counter: 0,
        }
    }

    /// Mints a fresh id with the given prefix (`layer`, `kf`, `el`, ...).
    pub fn alloc_id(&mut self, prefix: &str) -> String {
        self.id_counter += 1;
        format!("{}-{}", prefix, self.id_counter)
    }

    /// Advances the id counter past every `prefix-N` shaped id already in
    /// the project, so future mints never collide with adopted ids. Called
    /// after adopting foreign layers (import) or loading a persisted
    /// project, since the counter itself is not serialized.
    pub fn rebuild_id_counter(&mut self) {
        fn trailing_number(id: &str) -> Option<u64> {
            id.rsplit_once('-').and_then(|(_, n)| n.parse().ok())
        }
        fn walk(element: &Element, max: &mut u64) {
            if let Some(n) = trailing_number(&element.id) {
                *max = (*max).max(n);
            }
            if let Shape::Group { children } = &element.shape {
                for child in children {
                    walk(child, max);
                }
            }
        }
        let mut max = self.id_counter;
        for layer in &self.layers {
            if let Some(n) = trailing_number(&layer.id) {
                max = max.max(n);
            }
            walk(&layer.element, &mut max);
        }
        for k in &self.keyframes {
            if let Some(n) = trailing_number(&k.id) {
                max = max.max(n);
            }
        }
        self.id_counter = max;
    }

    /// Sets the playhead, clamped to `[0, duration]`.
    pub fn set_current_time(&mut self, t: f64) {
        self.current_time = t.clamp(0.0, self.duration);
    }

    /// Number of frames in the valid index range `[0, round(duration * fps)]`.
    pub fn frame_count(&self) -> u32 {
        (self.duration * self.frame_rate).round().max(0.0) as u32
    }

    /// Wraps an element in a new layer appended to the top of the stack.
    pub fn add_layer(&mut self, name: &str, element: Element) -> String {
        let id = self.alloc_id("layer");
        self.layers.push(Layer {
            id: id.clone(),
            name: name.to_string(),
            visible: true,
            locked: false,
            element,
        });
        id
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }
}

/// Editor-level wrapper around one renderable element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    /// Exclusively owned; layers never share elements.
    pub element: Element,
}

impl Layer {
    pub fn new(id: &str, name: &str, element: Element) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            visible: true,
            locked: false,
            element,
        }
    }
}

/// A renderable node: shape geometry plus transform and style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub style: Style,
    pub shape: Shape,
}

impl Element {
    pub fn new(id: &str, name: &str, shape: Shape) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            transform: Transform::default(),
            style: Style::default(),
            shape,
        }
    }
}

/// Shape geometry variants. `Group` is the one recursive case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        radius: Option<f64>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Path {
        /// SVG-style geometry command string.
        data: String,
    },
    Polygon {
        /// Flat coordinate list, space/comma delimited.
        points: String,
    },
    Polyline {
        points: String,
    },
    Group {
        /// Ordered, exclusively owned children; arbitrary nesting depth.
        children: Vec<Element>,
    },
}

/// 2D transform; rotation in degrees, independent per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Paint style. `None` fill/stroke means "none" (the entry is omitted on
/// export rather than emitted as a zero-alpha placeholder).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    pub stroke_width: f64,
    /// Nominally in `[0,1]`. Transient out-of-range input is tolerated here
    /// and clamped at the serialization boundary.
    pub opacity: f64,
}

impl Style {
    /// Opacity clamped into `[0,1]` for serialization.
    pub fn clamped_opacity(&self) -> f64 {
        self.opacity.clamp(0.0, 1.0)
    }

    /// True when the paint slot is set to a real color (not absent, not "none").
    pub fn paint_color(slot: &Option<String>) -> Option<&str> {
        match slot.as_deref() {
            None | Some("none") => None,
            Some(c) => Some(c),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}
