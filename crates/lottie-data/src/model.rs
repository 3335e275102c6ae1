use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Root interchange document. Field names follow the format's short keys
/// exactly; this struct is the bit-exact boundary, so nothing here is
/// renamed or reordered casually.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LottieJson {
    /// Format version string.
    pub v: String,
    /// Frame rate (frames per second).
    pub fr: f64,
    /// In point (first frame), fixed at 0 for exported documents.
    pub ip: f64,
    /// Out point (last frame).
    pub op: f64,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub nm: String,
    #[serde(default)]
    pub ddd: u8,
    /// Always present (and empty) on export; foreign documents may carry
    /// precomp/image assets which this editor does not consume.
    #[serde(default)]
    pub assets: Vec<serde_json::Value>,
    pub layers: Vec<ShapeLayer>,
}

pub const SHAPE_LAYER_TYPE: u8 = 4;

/// A shape layer (`ty: 4`), the only layer type the editor emits.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShapeLayer {
    pub ty: u8,
    #[serde(default)]
    pub nm: String,
    /// 1-based layer index.
    pub ind: u32,
    #[serde(default)]
    pub ip: f64,
    #[serde(default)]
    pub op: f64,
    #[serde(default)]
    pub st: f64,
    #[serde(default)]
    pub ks: Transform,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Hidden flag; only serialized when the layer is actually hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd: Option<bool>,
}

/// The animatable transform bundle (`ks` on layers, `tr` in groups).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Transform {
    /// Anchor point.
    #[serde(default = "Transform::default_anchor")]
    pub a: Property<Vec<f64>>,
    /// Position, a combined x/y pair.
    #[serde(default = "Transform::default_position")]
    pub p: Property<Vec<f64>>,
    /// Scale in percent.
    #[serde(default = "Transform::default_scale")]
    pub s: Property<Vec<f64>>,
    /// Rotation in degrees.
    #[serde(default = "Transform::default_rotation")]
    pub r: Property<f64>,
    /// Opacity in percent.
    #[serde(default = "Transform::default_opacity")]
    pub o: Property<f64>,
}

impl Transform {
    fn default_anchor() -> Property<Vec<f64>> {
        Property::fixed(vec![0.0, 0.0])
    }
    fn default_position() -> Property<Vec<f64>> {
        Property::fixed(vec![0.0, 0.0])
    }
    fn default_scale() -> Property<Vec<f64>> {
        Property::fixed(vec![100.0, 100.0])
    }
    fn default_rotation() -> Property<f64> {
        Property::fixed(0.0)
    }
    fn default_opacity() -> Property<f64> {
        Property::fixed(100.0)
    }
}

impl Default for Transform {
    /// The identity transform (also the closing `tr` of an exported group).
    fn default() -> Self {
        Self {
            a: Self::default_anchor(),
            p: Self::default_position(),
            s: Self::default_scale(),
            r: Self::default_rotation(),
            o: Self::default_opacity(),
        }
    }
}

/// An animatable property: `a` discriminates static (`0`) from animated
/// (`1`), `k` holds either the raw value or the keyframe list.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Property<T> {
    pub a: u8,
    #[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
    pub k: PropertyValue<T>,
}

impl<T> Property<T> {
    pub fn fixed(value: T) -> Self {
        Property {
            a: 0,
            k: PropertyValue::Static(value),
        }
    }

    pub fn animated(keyframes: Vec<Keyframe<T>>) -> Self {
        Property {
            a: 1,
            k: PropertyValue::Animated(keyframes),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.k, PropertyValue::Animated(_))
    }

    pub fn static_value(&self) -> Option<&T> {
        match &self.k {
            PropertyValue::Static(v) => Some(v),
            PropertyValue::Animated(_) => None,
        }
    }

    pub fn keyframes(&self) -> Option<&[Keyframe<T>]> {
        match &self.k {
            PropertyValue::Static(_) => None,
            PropertyValue::Animated(frames) => Some(frames),
        }
    }
}

/// The `k` payload of a property.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum PropertyValue<T> {
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for PropertyValue<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Keyframe lists and static vector values are both JSON arrays, so
        // try the keyframe shape first and fall back to a static value.
        let v = serde_json::Value::deserialize(deserializer)?;
        if let Ok(keyframes) = serde_json::from_value::<Vec<Keyframe<T>>>(v.clone()) {
            return Ok(PropertyValue::Animated(keyframes));
        }
        match serde_json::from_value::<T>(v) {
            Ok(value) => Ok(PropertyValue::Static(value)),
            Err(e) => Err(serde::de::Error::custom(e)),
        }
    }
}

/// One keyframe of an animated property. `s`/`e` are the segment's start and
/// end values; `o`/`i` the optional timing-curve handles; `h: 1` marks a
/// hold keyframe.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct Keyframe<T> {
    /// Time as a frame index.
    pub t: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<EasingHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<EasingHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u8>,
}

/// A cubic-bezier timing handle. Foreign exporters write the coordinates
/// either as scalars or as single-element arrays; both parse.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct EasingHandle {
    #[serde(deserialize_with = "scalar_or_first")]
    pub x: f64,
    #[serde(deserialize_with = "scalar_or_first")]
    pub y: f64,
}

fn scalar_or_first<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    let picked = match &v {
        serde_json::Value::Array(arr) => arr.first().cloned().unwrap_or(v.clone()),
        _ => v,
    };
    picked
        .as_f64()
        .ok_or_else(|| serde::de::Error::custom("expected a number or an array of numbers"))
}

/// Shape items, tagged by `ty`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "ty")]
pub enum Shape {
    #[serde(rename = "gr")]
    Group(GroupShape),
    #[serde(rename = "rc")]
    Rect(RectShape),
    #[serde(rename = "el")]
    Ellipse(EllipseShape),
    #[serde(rename = "sh")]
    Path(PathShape),
    #[serde(rename = "fl")]
    Fill(FillShape),
    #[serde(rename = "st")]
    Stroke(StrokeShape),
    #[serde(rename = "tr")]
    Transform(TransformShape),
    /// Anything this editor does not model (trim, repeater, gradients, ...).
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroupShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    /// Ordered group items; the closing item is the group's transform.
    pub it: Vec<Shape>,
}

/// Rectangle primitive: `p` is the center, `s` the [width, height] pair,
/// `r` the corner radius.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RectShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub p: Property<Vec<f64>>,
    pub s: Property<Vec<f64>>,
    pub r: Property<f64>,
}

/// Ellipse primitive: `p` center, `s` diameters.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EllipseShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub p: Property<Vec<f64>>,
    pub s: Property<Vec<f64>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub ks: Property<BezierPath>,
}

/// Solid fill: color channels normalized to 0-1, opacity in percent.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FillShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub c: Property<Vec<f64>>,
    pub o: Property<f64>,
}

/// Solid stroke; `lc`/`lj` are cap/join (2 = round).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StrokeShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub c: Property<Vec<f64>>,
    pub o: Property<f64>,
    pub w: Property<f64>,
    #[serde(default)]
    pub lc: u8,
    #[serde(default)]
    pub lj: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransformShape {
    #[serde(flatten)]
    pub t: Transform,
}

/// Bezier path geometry: `v` vertices, `i`/`o` in/out tangents relative to
/// each vertex, `c` closed flag.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    #[serde(default)]
    pub i: Vec<[f64; 2]>,
    #[serde(default)]
    pub o: Vec<[f64; 2]>,
    #[serde(default)]
    pub v: Vec<[f64; 2]>,
}

impl BezierPath {
    /// True when every tangent is zero, i.e. the path is a polyline.
    pub fn is_polyline(&self) -> bool {
        let flat = |handles: &[[f64; 2]]| handles.iter().all(|h| h[0] == 0.0 && h[1] == 0.0);
        flat(&self.i) && flat(&self.o)
    }
}
