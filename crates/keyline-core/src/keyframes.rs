//! # Keyframe Store
//!
//! Keyframes live in a single flat list on the [`Project`] and reference
//! their layer by id (a denormalized foreign key, never a pointer). The
//! store operations here are the only sanctioned mutations; queries are
//! pure and sorted, cheap enough to run on every playback tick.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::easing::Easing;
use crate::scene::Project;

/// The fixed set of animatable properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimProperty {
    PositionX,
    PositionY,
    Rotation,
    ScaleX,
    ScaleY,
    Opacity,
    Fill,
    Stroke,
    StrokeWidth,
}

impl AnimProperty {
    /// Color-valued properties interpolate in RGB channel space.
    pub fn is_color(&self) -> bool {
        matches!(self, AnimProperty::Fill | AnimProperty::Stroke)
    }
}

/// A keyframe value: a number or a color string, depending on the property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Number(f64),
    Color(String),
}

impl KeyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            KeyValue::Number(n) => Some(*n),
            KeyValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<&str> {
        match self {
            KeyValue::Color(c) => Some(c),
            KeyValue::Number(_) => None,
        }
    }
}

/// A timestamped value + easing for one animatable property of one layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: String,
    pub layer_id: String,
    pub property: AnimProperty,
    /// Time in seconds, >= 0.
    pub time: f64,
    pub value: KeyValue,
    #[serde(default)]
    pub easing: Easing,
}

/// Partial update for [`Project::update_keyframe`]; absent fields keep
/// their current value.
#[derive(Clone, Debug, Default)]
pub struct KeyframePatch {
    pub value: Option<KeyValue>,
    pub easing: Option<Easing>,
    pub time: Option<f64>,
}

impl Project {
    /// Creates a keyframe at the current playback time.
    ///
    /// At most one keyframe exists per (layer, property, time): an existing
    /// entry at that exact triple is replaced in place, and the replacement
    /// is minted a fresh id.
    pub fn upsert_keyframe(
        &mut self,
        layer_id: &str,
        property: AnimProperty,
        value: KeyValue,
        easing: Easing,
    ) -> String {
        let time = self.current_time;
        self.keyframes
            .retain(|k| !(k.layer_id == layer_id && k.property == property && k.time == time));
        let id = self.alloc_id("kf");
        debug!(layer = layer_id, ?property, time, "keyframe upsert");
        self.keyframes.push(Keyframe {
            id: id.clone(),
            layer_id: layer_id.to_string(),
            property,
            time,
            value,
            easing,
        });
        id
    }

    /// Removes a keyframe by id. No-op when absent.
    pub fn delete_keyframe(&mut self, id: &str) {
        self.keyframes.retain(|k| k.id != id);
    }

    /// Merges `patch` into the keyframe with the given id. No-op when absent.
    /// A time change that lands on another keyframe of the same (layer,
    /// property) displaces that one, preserving the uniqueness invariant.
    pub fn update_keyframe(&mut self, id: &str, patch: KeyframePatch) {
        let Some(idx) = self.keyframes.iter().position(|k| k.id == id) else {
            return;
        };
        if let Some(value) = patch.value {
            self.keyframes[idx].value = value;
        }
        if let Some(easing) = patch.easing {
            self.keyframes[idx].easing = easing;
        }
        if let Some(time) = patch.time {
            let time = time.max(0.0);
            let (layer_id, property) = {
                let k = &self.keyframes[idx];
                (k.layer_id.clone(), k.property)
            };
            self.keyframes[idx].time = time;
            let kept = self.keyframes[idx].id.clone();
            self.keyframes.retain(|k| {
                k.id == kept || !(k.layer_id == layer_id && k.property == property && k.time == time)
            });
        }
    }

    /// All keyframes for a layer, optionally filtered to one property,
    /// sorted ascending by time. Pure query; O(k) over the flat list.
    pub fn keyframes_for(&self, layer_id: &str, property: Option<AnimProperty>) -> Vec<&Keyframe> {
        let mut out: Vec<&Keyframe> = self
            .keyframes
            .iter()
            .filter(|k| k.layer_id == layer_id && property.map_or(true, |p| k.property == p))
            .collect();
        out.sort_by(|a, b| a.time.total_cmp(&b.time));
        out
    }
}
