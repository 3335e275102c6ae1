//! # Interpolation Engine
//!
//! Pure evaluation of a sorted, single-property keyframe sequence at a
//! query time. Numbers lerp; colors are decoded to RGB, lerped per channel
//! and re-encoded as canonical `#rrggbb`. Easing is applied from the left
//! keyframe of the bracketing segment.

use std::borrow::Borrow;

use crate::keyframes::{KeyValue, Keyframe};
use crate::types::Rgb;

/// Evaluates `keyframes` at time `t` (seconds).
///
/// Preconditions: the slice shares one (layer, property) and is sorted
/// ascending by time. An empty slice returns `None`; falling back to the
/// element's static value is the caller's job, not the engine's.
///
/// Outside the keyed range the boundary value is returned unchanged (clamp,
/// no extrapolation). A zero-length interval snaps to the right keyframe.
pub fn value_at<K: Borrow<Keyframe>>(keyframes: &[K], t: f64) -> Option<KeyValue> {
    let first = keyframes.first()?.borrow();
    let last = keyframes.last()?.borrow();
    if t <= first.time {
        return Some(first.value.clone());
    }
    if t >= last.time {
        return Some(last.value.clone());
    }

    // First keyframe strictly after t; the segment is [idx-1, idx].
    let idx = keyframes.partition_point(|k| k.borrow().time <= t);
    let k0 = keyframes[idx - 1].borrow();
    let k1 = keyframes[idx].borrow();

    let span = k1.time - k0.time;
    let p = if span <= 0.0 {
        1.0
    } else {
        (t - k0.time) / span
    };
    let eased = k0.easing.eval(p);

    Some(match (&k0.value, &k1.value) {
        (KeyValue::Number(a), KeyValue::Number(b)) => KeyValue::Number(a + (b - a) * eased),
        (a, b) => {
            let from = color_of(a);
            let to = color_of(b);
            KeyValue::Color(from.lerp(to, eased).to_hex())
        }
    })
}

/// Resolves a keyframe value as a color; anything unresolvable is black.
fn color_of(value: &KeyValue) -> Rgb {
    match value {
        KeyValue::Color(s) => Rgb::parse_or_black(s),
        KeyValue::Number(_) => Rgb::BLACK,
    }
}
